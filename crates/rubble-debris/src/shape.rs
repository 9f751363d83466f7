use rand::Rng;
use rubble_core::{uniform, vec3, Isometry, Quat, Scalar, Vec3};
use rubble_geom::{MassProps, Shape};

/// Density of plain boxes, spheres and cylinders.
pub const DEBRIS_DENSITY: Scalar = 10.0;
const COMPOUND_DENSITY: Scalar = 5.0;
const COMPOUND_RADIUS: Scalar = 0.125;
// the capsule's cylinder is massed as if twice as thick as it collides
const COMPOUND_MASS_RADIUS: Scalar = 0.25;

/// One debris kind with only the dimensions it needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DebrisShape {
    /// Full side lengths.
    Box { sides: Vec3 },
    Sphere { r: Scalar },
    /// Axis along local Z.
    Cylinder { r: Scalar, len: Scalar },
    /// Capsule-like: a thin cylinder along Z closed by two spheres of radius `len / 2`.
    Compound { len: Scalar },
}

impl DebrisShape {
    /// Draws a kind with equal odds, then its dimensions.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let u: Scalar = rng.gen();
        if u < 0.25 {
            DebrisShape::Box {
                sides: vec3(uniform(rng, 0.25, 0.5), uniform(rng, 0.25, 0.5), uniform(rng, 0.25, 0.5)),
            }
        } else if u < 0.5 {
            DebrisShape::Sphere { r: uniform(rng, 0.125, 0.25) }
        } else if u < 0.75 {
            let len = uniform(rng, 0.125, 0.5);
            let r = uniform(rng, 0.125, 0.5);
            DebrisShape::Cylinder { r, len }
        } else {
            DebrisShape::Compound { len: uniform(rng, 0.25, 0.5) }
        }
    }

    /// Offset of each end sphere of a compound along Z.
    #[inline]
    fn cap_offset(len: Scalar) -> Scalar { len - COMPOUND_RADIUS }

    pub fn mass_props(&self) -> MassProps {
        match *self {
            DebrisShape::Box { sides } => MassProps::from_box(sides, DEBRIS_DENSITY),
            DebrisShape::Sphere { r } => MassProps::from_sphere(r, DEBRIS_DENSITY),
            DebrisShape::Cylinder { r, len } => MassProps::from_cylinder(r, len, DEBRIS_DENSITY),
            DebrisShape::Compound { len } => {
                let mut m = MassProps::from_cylinder(COMPOUND_MASS_RADIUS, len, COMPOUND_DENSITY);
                let z = Self::cap_offset(len);
                for s in [z, -z] {
                    let cap = MassProps::from_sphere(len * 0.5, COMPOUND_DENSITY).translated(vec3(0.0, 0.0, s));
                    m.add(&cap);
                }
                m
            }
        }
    }

    /// Collision shapes with their offsets in body space.
    pub fn geometries(&self) -> Vec<(Shape, Isometry)> {
        let here = Isometry::default();
        match *self {
            DebrisShape::Box { sides } => vec![(Shape::cuboid(sides), here)],
            DebrisShape::Sphere { r } => vec![(Shape::Sphere { r }, here)],
            DebrisShape::Cylinder { r, len } => vec![(Shape::cylinder(r, len), here)],
            DebrisShape::Compound { len } => {
                let z = Self::cap_offset(len);
                let cap = Shape::Sphere { r: len * 0.5 };
                let at = |z: Scalar| Isometry { pos: vec3(0.0, 0.0, z), rot: Quat::IDENTITY };
                vec![(Shape::cylinder(COMPOUND_RADIUS, len), here), (cap, at(z)), (cap, at(-z))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn compound_mass_is_cylinder_plus_caps() {
        let len = 0.4;
        let m = DebrisShape::Compound { len }.mass_props();
        let cyl = MassProps::from_cylinder(0.25, len, 5.0);
        let cap = MassProps::from_sphere(0.2, 5.0);
        assert_relative_eq!(m.mass, cyl.mass + 2.0 * cap.mass, max_relative = 1e-5);
        // symmetric caps keep the centre of mass at the origin
        assert!(m.com.length() < 1e-6);

        let z = len - 0.125;
        let up = cap.translated(vec3(0.0, 0.0, z));
        let down = cap.translated(vec3(0.0, 0.0, -z));
        let expect = cyl.inertia + up.inertia + down.inertia;
        for c in 0..3 {
            for r in 0..3 {
                assert_relative_eq!(m.inertia.col(c)[r], expect.col(c)[r], max_relative = 1e-4, epsilon = 1e-7);
            }
        }
        // parallel axis: the caps push inertia across the long axis up
        assert!(m.inertia.col(0).x > cyl.inertia.col(0).x + 2.0 * cap.inertia.col(0).x);
    }

    #[test]
    fn sampled_dimensions_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..400 {
            match DebrisShape::sample(&mut rng) {
                DebrisShape::Box { sides } => {
                    seen[0] = true;
                    for s in sides.to_array() { assert!((0.25..0.5).contains(&s)); }
                }
                DebrisShape::Sphere { r } => {
                    seen[1] = true;
                    assert!((0.125..0.25).contains(&r));
                }
                DebrisShape::Cylinder { r, len } => {
                    seen[2] = true;
                    assert!((0.125..0.5).contains(&r) && (0.125..0.5).contains(&len));
                }
                DebrisShape::Compound { len } => {
                    seen[3] = true;
                    assert!((0.25..0.5).contains(&len));
                }
            }
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn compound_has_three_parts() {
        let g = DebrisShape::Compound { len: 0.5 }.geometries();
        assert_eq!(g.len(), 3);
        assert_relative_eq!(g[1].1.pos.z, 0.375);
        assert_relative_eq!(g[2].1.pos.z, -0.375);
        assert_eq!(g[1].0, Shape::Sphere { r: 0.25 });
    }
}
