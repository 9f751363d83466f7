pub mod aabb;
pub mod shape;
pub mod sdf;
pub mod mass;

pub use aabb::Aabb;
pub use shape::{Shape, aabb_of, feature_points, MAX_FEATURE_POINTS};
pub use sdf::{signed_distance, SurfaceSample};
pub use mass::MassProps;
