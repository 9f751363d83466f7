//! The sandbox: world, car and debris owned together and advanced one
//! rendered frame at a time through a fixed-tick stepper.

pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod sandbox;
pub mod stepper;

pub use config::{SandboxConfig, SleepConfig};
pub use error::SandboxError;
pub use host::{run, Host};
pub use input::FrameInput;
pub use sandbox::Sandbox;
pub use stepper::{FixedStepper, FrameReport};
