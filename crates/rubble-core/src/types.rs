use glam::{Vec3A, Mat3A, Quat};
use crate::Scalar;

pub type Vec3 = Vec3A;
pub type Mat3 = Mat3A;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }

/// a * bᵀ
#[inline]
pub fn outer(a: Vec3, b: Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// Rigid transform. Rotation first, then translation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

impl Isometry {
    #[inline] pub fn from_pos(pos: Vec3) -> Self { Self { pos, rot: Quat::IDENTITY } }

    #[inline] pub fn transform_point(&self, p: Vec3) -> Vec3 { self.rot * p + self.pos }
    #[inline] pub fn transform_vector(&self, v: Vec3) -> Vec3 { self.rot * v }

    #[inline]
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        self.rot.conjugate() * (p - self.pos)
    }
    #[inline] pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 { self.rot.conjugate() * v }

    /// `self ∘ local`: places a frame given relative to `self` into world space.
    #[inline]
    pub fn compose(&self, local: &Isometry) -> Isometry {
        Isometry { pos: self.transform_point(local.pos), rot: (self.rot * local.rot).normalize() }
    }
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { lin: Vec3::ZERO, ang: Vec3::ZERO };
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn compose_then_invert_returns_local_point() {
        let a = iso(vec3(1.0, 2.0, 3.0), Quat::from_rotation_y(0.7));
        let local = iso(vec3(0.0, 0.0, 0.5), Quat::from_rotation_x(0.3));
        let w = a.compose(&local);
        let p = vec3(0.2, -0.1, 0.4);
        let back = a.inverse_transform_point(w.transform_point(p));
        let expect = local.transform_point(p);
        assert_relative_eq!(back.x, expect.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, expect.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, expect.z, epsilon = 1e-5);
    }

    #[test]
    fn outer_product_columns() {
        let m = outer(vec3(1.0, 2.0, 3.0), vec3(0.0, 1.0, 0.0));
        assert_eq!(m.x_axis, Vec3::ZERO);
        assert_eq!(m.y_axis, vec3(1.0, 2.0, 3.0));
        assert_eq!(m.z_axis, Vec3::ZERO);
    }

    #[test]
    fn inverse_vector_undoes_rotation() {
        let a = iso(vec3(4.0, 0.0, -1.0), Quat::from_rotation_z(1.1));
        let v = vec3(0.3, -0.7, 0.2);
        let back = a.inverse_transform_vector(a.transform_vector(v));
        assert_relative_eq!(back.x, v.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, v.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, v.z, epsilon = 1e-5);
    }
}
