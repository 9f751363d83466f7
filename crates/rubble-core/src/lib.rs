pub mod scalar;
pub mod ids;
pub mod types;
pub mod hash;
pub mod time;
pub mod rng;

pub use scalar::Scalar;
pub use ids::{BodyId, GeomId, JointId};
pub use types::{Vec3, Mat3, Isometry, Velocity, vec3, iso, outer};
pub use hash::{StepHasher, hash_vec3, hash_quat};
pub use time::StepStats;
pub use rng::{uniform, random_rotation};
pub use glam::Quat;
