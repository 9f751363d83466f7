mod actuation;
mod flip;

pub use actuation::{Actuation, ActuationTuning, DriverInput};
pub use flip::{roll_of, FlipMonitor, FlipParams, FlipState};
