use glam::Quat;
use rubble_core::Scalar;
use serde::{Deserialize, Serialize};

/// Roll angle watched by the flip monitor, with q0 = w:
/// atan2(2(q0 q3 + q1 q2), 1 − 2(q1² + q3²)).
/// This is atan2 of the heights of the body's X and Y axes, so its magnitude
/// passes π/2 exactly when the body's up axis dips below the horizon.
pub fn roll_of(q: Quat) -> Scalar {
    let (q0, q1, q2, q3) = (q.w, q.x, q.y, q.z);
    (2.0 * (q0 * q3 + q1 * q2)).atan2(1.0 - 2.0 * (q1 * q1 + q3 * q3))
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipParams {
    /// |roll| above this counts as inverted.
    pub roll_limit: Scalar,
    /// Recovery fires once the inverted streak exceeds this many observations.
    pub max_inverted: u32,
}

impl Default for FlipParams {
    fn default() -> Self {
        Self { roll_limit: core::f32::consts::FRAC_PI_2 - 0.001, max_inverted: 100 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipState { Upright, Inverted(u32) }

#[derive(Copy, Clone, Debug)]
pub struct FlipMonitor {
    pub params: FlipParams,
    pub state: FlipState,
}

impl FlipMonitor {
    pub fn new(params: FlipParams) -> Self {
        Self { params, state: FlipState::Upright }
    }

    /// Feeds one roll observation. Returns true when recovery must run now.
    pub fn observe(&mut self, roll: Scalar) -> bool {
        if roll.abs() <= self.params.roll_limit {
            self.state = FlipState::Upright;
            return false;
        }
        let n = match self.state {
            FlipState::Upright => 1,
            FlipState::Inverted(n) => n + 1,
        };
        if n > self.params.max_inverted {
            self.state = FlipState::Upright;
            true
        } else {
            self.state = FlipState::Inverted(n);
            false
        }
    }

    pub fn observe_orientation(&mut self, q: Quat) -> bool { self.observe(roll_of(q)) }

    pub fn inverted_count(&self) -> u32 {
        match self.state { FlipState::Upright => 0, FlipState::Inverted(n) => n }
    }
}

impl Default for FlipMonitor {
    fn default() -> Self { Self::new(FlipParams::default()) }
}
