pub mod wheel;
pub mod sway;

use rubble_core::{BodyId, JointId, Scalar};
use rubble_dynamics::{Bodies, Row};

pub use wheel::{WheelJoint, WheelJointDesc};
pub use sway::SwayBar;

/// Global constraint softness for rigid joint rows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointParams {
    pub erp: Scalar,
    pub cfm: Scalar,
}

impl Default for JointParams {
    fn default() -> Self { Self { erp: 0.2, cfm: 1e-5 } }
}

#[derive(Default)]
pub struct Joints {
    wheels: Vec<WheelJoint>,
    sway: Vec<SwayBar>,
}

impl Joints {
    pub fn new() -> Self { Self::default() }

    pub fn add_wheel_joint(&mut self, desc: WheelJointDesc) -> JointId {
        self.wheels.push(WheelJoint::new(desc));
        JointId((self.wheels.len() as u32) - 1)
    }

    /// Couples the suspension travel of two wheel joints on one axle.
    pub fn add_sway_bar(&mut self, left: JointId, right: JointId, stiffness: Scalar) -> usize {
        self.sway.push(SwayBar { left, right, stiffness, enabled: true });
        self.sway.len() - 1
    }

    #[inline] pub fn wheel(&self, id: JointId) -> &WheelJoint { &self.wheels[id.index()] }
    #[inline] pub fn wheel_mut(&mut self, id: JointId) -> &mut WheelJoint { &mut self.wheels[id.index()] }
    #[inline] pub fn len(&self) -> usize { self.wheels.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.wheels.is_empty() }

    pub fn set_sway_enabled(&mut self, on: bool) {
        for s in &mut self.sway { s.enabled = on; }
    }
    pub fn sway_enabled(&self) -> bool { self.sway.iter().any(|s| s.enabled) }

    /// True when a persistent joint links `a` and `b`, in either order.
    pub fn are_connected(&self, a: BodyId, b: BodyId) -> bool {
        self.wheels.iter().any(|j| {
            let (c, w) = (j.desc.chassis, j.desc.wheel);
            (c == a && w == b) || (c == b && w == a)
        })
    }

    /// Per-tick joint work that happens before velocities are integrated:
    /// steering servos advance and sway bars add their forces.
    pub fn pre_step(&mut self, bodies: &mut Bodies, h: Scalar) {
        for j in &mut self.wheels { j.advance_steering(h); }
        for s in &self.sway {
            if s.enabled { s.apply(&self.wheels, bodies); }
        }
    }

    /// Appends the velocity rows of every joint. Returns how many were added.
    pub fn build_rows(&self, bodies: &Bodies, params: &JointParams, h: Scalar, rows: &mut Vec<Row>) -> usize {
        let before = rows.len();
        for j in &self.wheels { j.push_rows(bodies, params, h, rows); }
        rows.len() - before
    }
}
