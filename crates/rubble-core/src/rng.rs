use glam::Quat;
use rand::Rng;
use crate::{Scalar, Vec3};

/// Uniform sample in `[lo, hi)`. Degenerate ranges return `lo`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: Scalar, hi: Scalar) -> Scalar {
    lo + rng.gen::<Scalar>() * (hi - lo)
}

/// Random axis with components in [-1, 1) and an angle in [-π, π).
/// A zero-length axis falls back to +Y.
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    let axis = Vec3::new(
        uniform(rng, -1.0, 1.0),
        uniform(rng, -1.0, 1.0),
        uniform(rng, -1.0, 1.0),
    );
    let angle = uniform(rng, -core::f32::consts::PI, core::f32::consts::PI);
    let axis = axis.try_normalize().unwrap_or(Vec3::Y);
    Quat::from_axis_angle(axis.into(), angle)
}
