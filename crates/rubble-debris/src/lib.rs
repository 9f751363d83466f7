//! Falling debris: random shapes dropped over the arena, an upward impulse
//! field and recycling of whatever falls off the edge.

mod field;
mod shape;

pub use field::{DebrisBody, DebrisField, DebrisParams};
pub use shape::{DebrisShape, DEBRIS_DENSITY};
