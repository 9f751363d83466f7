use rubble_core::types::{Isometry, Vec3, Mat3};
use glam::Mat3A;
use crate::aabb::Aabb;

/// Collision primitive in its local frame. Cylinders run along local Z.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere { r: f32 },
    Box { hx: f32, hy: f32, hz: f32 },
    Cylinder { r: f32, hh: f32 }, // half-length along local Z
}

/// Corners of a box, or two rims of eight points for a cylinder.
pub const MAX_FEATURE_POINTS: usize = 16;
const RIM_POINTS: usize = 8;

impl Shape {
    /// Box from full side lengths.
    pub fn cuboid(sides: Vec3) -> Self {
        Shape::Box { hx: sides.x * 0.5, hy: sides.y * 0.5, hz: sides.z * 0.5 }
    }
    /// Cylinder from radius and full length.
    pub fn cylinder(r: f32, len: f32) -> Self { Shape::Cylinder { r, hh: len * 0.5 } }

    /// Distance from the local origin to the farthest surface point.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Sphere { r } => r,
            Shape::Box { hx, hy, hz } => Vec3::new(hx, hy, hz).length(),
            Shape::Cylinder { r, hh } => (r * r + hh * hh).sqrt(),
        }
    }
}

#[inline]
pub fn aabb_of(shape: &Shape, xf: &Isometry) -> Aabb {
    match *shape {
        Shape::Sphere { r } => Aabb::from_center_half_extents(xf.pos, Vec3::splat(r)),
        Shape::Box { hx, hy, hz } => {
            let he = Vec3::new(hx, hy, hz);
            let rot = Mat3A::from_quat(xf.rot);
            let m = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
            Aabb::from_center_half_extents(xf.pos, m * he)
        }
        Shape::Cylinder { r, hh } => {
            // caps are discs: per world axis the disc extent is r * sqrt(1 - a²)
            let a = xf.rot * Vec3::Z;
            let disc = (Vec3::ONE - a * a).max(Vec3::ZERO);
            let he = a.abs() * hh + Vec3::new(disc.x.sqrt(), disc.y.sqrt(), disc.z.sqrt()) * r;
            Aabb::from_center_half_extents(xf.pos, he)
        }
    }
}

/// Local-space sample points used by the solid-vs-solid narrow phase.
/// Returns how many entries of `out` were written. Spheres have none.
pub fn feature_points(shape: &Shape, out: &mut [Vec3; MAX_FEATURE_POINTS]) -> usize {
    match *shape {
        Shape::Sphere { .. } => 0,
        Shape::Box { hx, hy, hz } => {
            let mut n = 0;
            for sx in [-1.0f32, 1.0] {
                for sy in [-1.0f32, 1.0] {
                    for sz in [-1.0f32, 1.0] {
                        out[n] = Vec3::new(sx * hx, sy * hy, sz * hz);
                        n += 1;
                    }
                }
            }
            n
        }
        Shape::Cylinder { r, hh } => {
            let mut n = 0;
            for z in [-hh, hh] {
                for k in 0..RIM_POINTS {
                    let t = k as f32 * core::f32::consts::TAU / RIM_POINTS as f32;
                    out[n] = Vec3::new(r * t.cos(), r * t.sin(), z);
                    n += 1;
                }
            }
            n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Quat;
    use rubble_core::{iso, vec3};

    #[test]
    fn rotated_box_aabb_grows() {
        let s = Shape::Box { hx: 1.0, hy: 0.5, hz: 0.5 };
        let a = aabb_of(&s, &iso(Vec3::ZERO, Quat::from_rotation_z(core::f32::consts::FRAC_PI_2)));
        assert_abs_diff_eq!(a.max.x, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(a.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn upright_cylinder_aabb_is_tight() {
        let s = Shape::cylinder(0.5, 2.0);
        let a = aabb_of(&s, &iso(vec3(0.0, 3.0, 0.0), Quat::IDENTITY));
        assert_abs_diff_eq!(a.min.z, -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(a.max.x, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(a.min.y, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn feature_point_counts() {
        let mut buf = [Vec3::ZERO; MAX_FEATURE_POINTS];
        assert_eq!(feature_points(&Shape::Sphere { r: 1.0 }, &mut buf), 0);
        assert_eq!(feature_points(&Shape::cuboid(Vec3::ONE), &mut buf), 8);
        assert_eq!(feature_points(&Shape::cylinder(0.3, 1.0), &mut buf), 16);
        for p in &buf[..16] {
            assert_abs_diff_eq!(p.truncate().length(), 0.3, epsilon = 1e-5);
        }
    }
}
