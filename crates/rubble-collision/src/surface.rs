use rubble_core::types::Vec3;

/// Geometric part of a contact. `normal` points from geometry 2 into
/// geometry 1; `depth` is the penetration along it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContactGeom {
    pub pos: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

/// Surface response shared by every contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceParams {
    /// Coulomb friction coefficient (pyramid approximation, scaled by the normal impulse).
    pub mu: f32,
    /// Force-dependent slip along the first / second friction direction.
    pub slip1: f32,
    pub slip2: f32,
    pub soft_erp: f32,
    pub soft_cfm: f32,
    pub bounce: f32,
    /// Minimum approach speed for restitution to apply.
    pub bounce_vel: f32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            mu: 1000.0,
            slip1: 0.0001,
            slip2: 0.001,
            soft_erp: 0.05,
            soft_cfm: 0.0003,
            bounce: 0.1,
            bounce_vel: 0.1,
        }
    }
}
