//! Per-frame driver logic on top of a spawned `Vehicle`.

use rubble_controllers::{Actuation, ActuationTuning, DriverInput, FlipMonitor, FlipParams};
use rubble_core::Scalar;
use rubble_world::World;
use tracing::warn;

use crate::vehicle::Vehicle;

/// Owns the actuation state, the flip monitor and the anti-sway switch of one car.
#[derive(Clone, Debug)]
pub struct VehicleController {
    /// The controlled car.
    pub vehicle: Vehicle,
    /// Smoothed accel / steer.
    pub actuation: Actuation,
    /// Smoothing constants.
    pub tuning: ActuationTuning,
    /// Inverted-orientation watchdog.
    pub flip: FlipMonitor,
    /// Drive motor torque limit.
    pub max_accel_force: Scalar,
    /// Steering servo gain.
    pub steer_gain: Scalar,
    anti_sway: bool,
}

impl VehicleController {
    /// Wraps a spawned vehicle; anti-sway starts enabled.
    pub fn new(vehicle: Vehicle, tuning: ActuationTuning, flip: FlipParams, max_accel_force: Scalar, steer_gain: Scalar) -> Self {
        Self {
            vehicle,
            actuation: Actuation::default(),
            tuning,
            flip: FlipMonitor::new(flip),
            max_accel_force,
            steer_gain,
            anti_sway: true,
        }
    }

    /// Consumes one frame of driver intent and hands the smoothed values to the car.
    pub fn update(&mut self, world: &mut World, input: &DriverInput) {
        self.actuation.update(input, &self.tuning);
        self.vehicle.update(world, self.actuation.accel, self.max_accel_force, self.actuation.steer, self.steer_gain);
    }

    /// Observes the chassis roll once; runs `unflip` when the car has been
    /// inverted for too long. Returns whether recovery ran.
    pub fn check_flip(&mut self, world: &mut World) -> bool {
        let q = self.vehicle.pose(world).rot;
        if !self.flip.observe_orientation(q) { return false; }
        warn!(frames = self.flip.params.max_inverted + 1, "vehicle inverted, recovering");
        self.vehicle.unflip(world);
        true
    }

    /// Flips the anti-sway switch; returns the new state.
    pub fn toggle_anti_sway(&mut self, world: &mut World) -> bool {
        self.anti_sway = !self.anti_sway;
        self.vehicle.set_anti_sway(world, self.anti_sway);
        self.anti_sway
    }

    /// Whether the sway bars are active.
    pub fn anti_sway(&self) -> bool { self.anti_sway }
}
