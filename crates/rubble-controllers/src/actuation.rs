use rubble_core::Scalar;
use serde::{Deserialize, Serialize};

/// Held driver signals for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverInput {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuationTuning {
    pub accel_decay: Scalar,   // multiplier applied every frame
    pub accel_step: Scalar,    // added while accelerate/brake is held
    pub accel_min: Scalar,
    pub accel_max: Scalar,
    pub steer_step: Scalar,
    pub steer_return: Scalar,  // multiplier when no steering key is held
    pub steer_max: Scalar,     // symmetric clamp
}

impl Default for ActuationTuning {
    fn default() -> Self {
        Self {
            accel_decay: 0.99,
            accel_step: 2.5,
            accel_min: -25.0,
            accel_max: 75.0,
            steer_step: 0.1,
            steer_return: 0.5,
            steer_max: 0.5,
        }
    }
}

/// Damped, clamped accel/steer state. Updated once per frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Actuation {
    pub accel: Scalar,
    pub steer: Scalar,
}

impl Actuation {
    pub fn update(&mut self, input: &DriverInput, t: &ActuationTuning) {
        self.accel *= t.accel_decay;
        if input.accelerate { self.accel += t.accel_step; }
        if input.brake { self.accel -= t.accel_step; }
        self.accel = self.accel.clamp(t.accel_min, t.accel_max);

        if input.steer_right { self.steer -= t.steer_step; }
        if input.steer_left { self.steer += t.steer_step; }
        if !input.steer_left && !input.steer_right { self.steer *= t.steer_return; }
        self.steer = self.steer.clamp(-t.steer_max, t.steer_max);
    }

    pub fn reset(&mut self) { *self = Self::default(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const GAS: DriverInput = DriverInput { accelerate: true, brake: false, steer_left: false, steer_right: false };
    const IDLE: DriverInput = DriverInput { accelerate: false, brake: false, steer_left: false, steer_right: false };

    #[test]
    fn held_accelerate_converges_to_max() {
        let t = ActuationTuning::default();
        let mut a = Actuation::default();
        let mut prev = 0.0;
        for _ in 0..2000 {
            a.update(&GAS, &t);
            assert!(a.accel <= t.accel_max);
            assert!(a.accel >= prev);
            prev = a.accel;
        }
        assert_abs_diff_eq!(a.accel, t.accel_max);
    }

    #[test]
    fn release_decays_without_crossing_zero() {
        let t = ActuationTuning::default();
        for start in [75.0f32, -25.0, 0.3] {
            let mut a = Actuation { accel: start, steer: 0.0 };
            let mut prev = start.abs();
            for _ in 0..5000 {
                a.update(&IDLE, &t);
                assert_eq!(a.accel.signum(), start.signum());
                assert!(a.accel.abs() <= prev);
                prev = a.accel.abs();
            }
            assert!(a.accel.abs() < 1e-9 || a.accel.abs() < start.abs() * 1e-6);
        }
    }

    #[test]
    fn brake_clamps_at_min() {
        let t = ActuationTuning::default();
        let mut a = Actuation::default();
        let brake = DriverInput { brake: true, ..IDLE };
        for _ in 0..500 { a.update(&brake, &t); }
        assert_abs_diff_eq!(a.accel, t.accel_min);
    }

    #[test]
    fn steering_clamps_and_recentres() {
        let t = ActuationTuning::default();
        let mut a = Actuation::default();
        let left = DriverInput { steer_left: true, ..IDLE };
        for _ in 0..3 { a.update(&left, &t); }
        assert_abs_diff_eq!(a.steer, 0.3, epsilon = 1e-6);
        for _ in 0..10 { a.update(&left, &t); }
        assert_abs_diff_eq!(a.steer, 0.5);

        a.update(&IDLE, &t);
        assert_abs_diff_eq!(a.steer, 0.25);

        let right = DriverInput { steer_right: true, ..IDLE };
        for _ in 0..20 { a.update(&right, &t); }
        assert_abs_diff_eq!(a.steer, -0.5);
    }

    #[test]
    fn both_steer_keys_hold_position() {
        let t = ActuationTuning::default();
        let mut a = Actuation { accel: 0.0, steer: 0.2 };
        let both = DriverInput { steer_left: true, steer_right: true, ..IDLE };
        a.update(&both, &t);
        assert_abs_diff_eq!(a.steer, 0.2, epsilon = 1e-6);
    }
}
