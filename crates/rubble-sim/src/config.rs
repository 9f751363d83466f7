use std::path::Path;

use rubble_controllers::{ActuationTuning, FlipParams};
use rubble_core::{Scalar, Vec3};
use rubble_debris::DebrisParams;
use rubble_dynamics::AutoDisable;
use rubble_vehicles::VehicleParams;
use rubble_world::DebugSettings;
use serde::{Deserialize, Serialize};

use crate::error::SandboxError;

/// Sleep thresholds as they appear in config files.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    pub enabled: bool,
    pub linear: Scalar,
    pub angular: Scalar,
    pub steps: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        let d = AutoDisable::default();
        Self { enabled: d.enabled, linear: d.linear, angular: d.angular, steps: d.steps }
    }
}

impl From<SleepConfig> for AutoDisable {
    fn from(c: SleepConfig) -> Self {
        AutoDisable { enabled: c.enabled, linear: c.linear, angular: c.angular, steps: c.steps }
    }
}

/// Startup parameters of a sandbox run. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Fixed tick length (s).
    pub phys_slice: f64,
    /// Ticks allowed per frame before the backlog is dropped.
    pub max_steps: u32,
    /// RNG seed; taken from the clock when absent.
    pub seed: Option<u64>,
    pub gravity: [Scalar; 3],
    /// Half extents of the ground slab; its top face sits at y = 0.
    pub ground_half_extents: [Scalar; 3],
    pub solver_iterations: u32,
    pub sleep: SleepConfig,
    pub debris: DebrisParams,
    pub vehicle: VehicleParams,
    pub actuation: ActuationTuning,
    pub flip: FlipParams,
    /// Torque limit of the drive motors.
    pub max_accel_force: Scalar,
    pub steer_gain: Scalar,
    pub debug: DebugSettings,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            phys_slice: 1.0 / 240.0,
            max_steps: 6,
            seed: None,
            gravity: [0.0, -9.8, 0.0],
            ground_half_extents: [40.0, 5.0, 40.0],
            solver_iterations: 20,
            sleep: SleepConfig::default(),
            debris: DebrisParams::default(),
            vehicle: VehicleParams::default(),
            actuation: ActuationTuning::default(),
            flip: FlipParams::default(),
            max_accel_force: 800.0,
            steer_gain: 10.0,
            debug: DebugSettings::default(),
        }
    }
}

impl SandboxConfig {
    /// Reads a JSON config; missing fields keep their defaults. The result is validated.
    pub fn load(path: &Path) -> Result<Self, SandboxError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SandboxError::ConfigIo { path: path.to_owned(), source })?;
        let cfg: SandboxConfig = serde_json::from_str(&text)
            .map_err(|source| SandboxError::ConfigParse { path: path.to_owned(), source })?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[inline] pub fn gravity_vec(&self) -> Vec3 { Vec3::from_array(self.gravity) }

    /// Rejects values that would make the frame loop or spawn ill-defined.
    pub fn validate(&self) -> Result<(), SandboxError> {
        if !(self.phys_slice.is_finite() && self.phys_slice > 0.0) {
            return Err(SandboxError::invalid("phys_slice", format!("must be positive, got {}", self.phys_slice)));
        }
        if self.max_steps == 0 {
            return Err(SandboxError::invalid("max_steps", "must be at least 1"));
        }
        if self.solver_iterations == 0 {
            return Err(SandboxError::invalid("solver_iterations", "must be at least 1"));
        }
        if self.debris.count == 0 {
            return Err(SandboxError::invalid("debris.count", "must be at least 1"));
        }
        if self.debris.layer_size == 0 {
            return Err(SandboxError::invalid("debris.layer_size", "must be at least 1"));
        }
        let ranges = [
            ("debris.spawn_xz", self.debris.spawn_xz),
            ("debris.respawn_xz", self.debris.respawn_xz),
            ("debris.respawn_y", self.debris.respawn_y),
        ];
        for (field, [lo, hi]) in ranges {
            if !(lo < hi) {
                return Err(SandboxError::invalid(field, format!("range [{lo}, {hi}) is empty")));
            }
        }
        if self.ground_half_extents.iter().any(|&h| !(h > 0.0)) {
            return Err(SandboxError::invalid("ground_half_extents", "must all be positive"));
        }
        if self.debris.respawn_y[0] <= self.debris.floor_y {
            return Err(SandboxError::invalid("debris.respawn_y", "must lie above debris.floor_y"));
        }
        if !(self.max_accel_force >= 0.0) || !(self.steer_gain >= 0.0) {
            return Err(SandboxError::invalid("max_accel_force/steer_gain", "must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SandboxConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SandboxConfig = serde_json::from_str(r#"{ "seed": 42, "debris": { "count": 12 } }"#).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.debris.count, 12);
        assert_eq!(cfg.debris.floor_y, -10.0);
        assert_eq!(cfg.max_steps, 6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_ill_defined_values() {
        let bad = |f: fn(&mut SandboxConfig)| {
            let mut c = SandboxConfig::default();
            f(&mut c);
            c.validate().unwrap_err()
        };
        let e = bad(|c| c.phys_slice = 0.0);
        assert!(matches!(e, SandboxError::InvalidConfig { field: "phys_slice", .. }));
        let e = bad(|c| c.debris.count = 0);
        assert!(matches!(e, SandboxError::InvalidConfig { field: "debris.count", .. }));
        let e = bad(|c| c.debris.respawn_xz = [5.0, -5.0]);
        assert!(matches!(e, SandboxError::InvalidConfig { field: "debris.respawn_xz", .. }));
        let e = bad(|c| c.phys_slice = f64::NAN);
        assert!(e.to_string().contains("phys_slice"));
    }

    #[test]
    fn load_reports_missing_file() {
        let e = SandboxConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(e, SandboxError::ConfigIo { .. }));
    }
}
