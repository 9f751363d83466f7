pub mod broadphase;
pub mod buffer;
pub mod narrow;
pub mod surface;

pub use broadphase::SweepAndPrune;
pub use buffer::{ContactBuffer, MAX_CONTACTS};
pub use narrow::{collide, GeomView};
pub use surface::{ContactGeom, SurfaceParams};
