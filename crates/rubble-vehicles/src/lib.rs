#![deny(missing_docs)]
//! Four-wheeled car built from rigid bodies and hinge-2 style wheel joints.
//!
//! Usage:
//! - build a `Vehicle` with `Vehicle::spawn(&mut world, params)`;
//! - once per frame call `VehicleController::update` with the driver input
//!   and `VehicleController::check_flip`;
//! - the world ticks apply the resulting motor, steering and anti-sway state.

pub mod vehicle;
pub mod controller;

pub use controller::VehicleController;
pub use vehicle::{Vehicle, VehicleParams, WheelSlot, MPH_PER_MPS};
