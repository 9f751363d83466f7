use rubble_core::{BodyId, Isometry};
use rubble_geom::{Aabb, Shape};

/// Collision shape owned by exactly one body, placed at `offset` in the body frame.
#[derive(Copy, Clone, Debug)]
pub struct Geometry {
    pub body: BodyId,
    pub shape: Shape,
    pub offset: Isometry,
    /// Cleared geometries are skipped by the default collidability predicate.
    pub collidable: bool,
    pub aabb: Aabb,
}

impl Geometry {
    #[inline]
    pub fn world_pose(&self, body_pose: &Isometry) -> Isometry {
        body_pose.compose(&self.offset)
    }
}
