use rubble_collision::{ContactGeom, SurfaceParams};
use rubble_core::types::Vec3;
use rubble_core::{BodyId, GeomId, Scalar};
use rubble_dynamics::{Bodies, Row, RowBound};

/// One contact point between two bodies. Lives for a single tick.
#[derive(Copy, Clone, Debug)]
pub struct ContactConstraint {
    pub body1: BodyId,
    pub body2: BodyId,
    pub geom1: GeomId,
    pub geom2: GeomId,
    pub contact: ContactGeom,
    pub surface: SurfaceParams,
}

/// Scratch group of contact constraints, refilled each tick.
#[derive(Default)]
pub struct ContactGroup {
    items: Vec<ContactConstraint>,
}

impl ContactGroup {
    pub fn with_capacity(cap: usize) -> Self { Self { items: Vec::with_capacity(cap) } }
    #[inline] pub fn push(&mut self, c: ContactConstraint) { self.items.push(c); }
    #[inline] pub fn len(&self) -> usize { self.items.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.items.is_empty() }
    #[inline] pub fn iter(&self) -> core::slice::Iter<'_, ContactConstraint> { self.items.iter() }
    /// Destroys every constraint; capacity is kept.
    #[inline] pub fn empty(&mut self) { self.items.clear(); }
}

pub(crate) fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let ax = n.x.abs(); let ay = n.y.abs(); let az = n.z.abs();
    let base = if ax <= ay && ax <= az { Vec3::X }
    else if ay <= az        { Vec3::Y }
    else                    { Vec3::Z };
    let t1 = base.cross(n).normalize_or_zero();
    let t2 = n.cross(t1);
    (t1, t2)
}

/// Normal row plus two friction rows for one contact.
pub(crate) fn push_contact_rows(c: &ContactConstraint, bodies: &Bodies, h: Scalar, rows: &mut Vec<Row>) {
    let s = &c.surface;
    let (p, n) = (c.contact.pos, c.contact.normal);

    let normal = Row::linear(bodies, c.body1, p, c.body2, p, n);
    let approach = normal.velocity(bodies);
    let mut target = s.soft_erp / h * c.contact.depth;
    if s.bounce > 0.0 && approach < -s.bounce_vel {
        target = target.max(-s.bounce * approach);
    }
    let idx = rows.len();
    rows.push(
        normal
            .with_rhs(target)
            .with_cfm(s.soft_cfm / h)
            .with_bound(RowBound::Range { lo: 0.0, hi: Scalar::INFINITY }),
    );

    let (t1, t2) = orthonormal_basis(n);
    for (t, slip) in [(t1, s.slip1), (t2, s.slip2)] {
        rows.push(
            Row::linear(bodies, c.body1, p, c.body2, p, t)
                .with_cfm(slip / h)
                .with_bound(RowBound::Friction { normal: idx, mu: s.mu }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rubble_core::vec3;

    #[test]
    fn basis_is_orthonormal() {
        for n in [Vec3::Y, Vec3::X, -Vec3::Z, vec3(0.3, -0.8, 0.52).normalize()] {
            let (t1, t2) = orthonormal_basis(n);
            assert_abs_diff_eq!(t1.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t2.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t1.dot(n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t2.dot(n), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(t1.dot(t2), 0.0, epsilon = 1e-5);
        }
    }
}
