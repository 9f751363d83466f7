use glam::Quat;
use rubble_core::types::Vec3;
use rubble_core::{BodyId, Scalar};
use rubble_dynamics::{Bodies, Row, RowBound};
use crate::JointParams;

/// Static description of a hinge-2 style wheel joint.
#[derive(Copy, Clone, Debug)]
pub struct WheelJointDesc {
    pub chassis: BodyId,
    pub wheel: BodyId,
    /// Rest position of the wheel centre in chassis space.
    pub anchor: Vec3,
    /// Suspension / steering axis in chassis space.
    pub suspension_axis: Vec3,
    /// Spin axis in chassis space before steering. Positive spin rolls the car forward.
    pub axle: Vec3,
    /// Spring rate (N/m) along the suspension axis.
    pub stiffness: Scalar,
    /// Damping (N·s/m) along the suspension axis.
    pub damping: Scalar,
    pub steerable: bool,
    /// Largest steering angle magnitude (rad).
    pub max_steer: Scalar,
}

impl WheelJointDesc {
    pub fn new(chassis: BodyId, wheel: BodyId, anchor: Vec3) -> Self {
        Self {
            chassis, wheel, anchor,
            suspension_axis: Vec3::Y,
            axle: Vec3::NEG_Z,
            stiffness: 4000.0,
            damping: 300.0,
            steerable: false,
            max_steer: 0.75,
        }
    }
}

/// Wheel centre held on the suspension axis, sprung along it, free to spin
/// about a steerable axle and optionally motor-driven.
#[derive(Copy, Clone, Debug)]
pub struct WheelJoint {
    pub desc: WheelJointDesc,
    steer_angle: Scalar,
    steer_target: Scalar,
    steer_gain: Scalar,
    motor_velocity: Scalar,
    motor_max_force: Scalar,
}

impl WheelJoint {
    pub fn new(desc: WheelJointDesc) -> Self {
        Self { desc, steer_angle: 0.0, steer_target: 0.0, steer_gain: 0.0, motor_velocity: 0.0, motor_max_force: 0.0 }
    }

    /// Target steering angle, reached by a proportional servo with `gain` (1/s).
    pub fn set_steer(&mut self, target: Scalar, gain: Scalar) {
        if !self.desc.steerable { return; }
        self.steer_target = target.clamp(-self.desc.max_steer, self.desc.max_steer);
        self.steer_gain = gain.max(0.0);
    }

    /// Target spin rate of the wheel relative to the chassis, with a torque limit.
    /// A zero limit leaves the wheel free.
    pub fn set_motor(&mut self, velocity: Scalar, max_force: Scalar) {
        self.motor_velocity = velocity;
        self.motor_max_force = max_force.max(0.0);
    }

    pub fn reset_steering(&mut self) { self.steer_angle = 0.0; }

    #[inline] pub fn steer_angle(&self) -> Scalar { self.steer_angle }
    #[inline] pub fn motor(&self) -> (Scalar, Scalar) { (self.motor_velocity, self.motor_max_force) }

    pub(crate) fn advance_steering(&mut self, h: Scalar) {
        if !self.desc.steerable { return; }
        let step = self.steer_gain * (self.steer_target - self.steer_angle) * h;
        self.steer_angle = (self.steer_angle + step).clamp(-self.desc.max_steer, self.desc.max_steer);
    }

    /// World-space anchor (rest wheel centre).
    pub fn anchor_world(&self, bodies: &Bodies) -> Vec3 {
        bodies.pose(self.desc.chassis).transform_point(self.desc.anchor)
    }

    pub fn suspension_axis_world(&self, bodies: &Bodies) -> Vec3 {
        bodies.pose(self.desc.chassis).transform_vector(self.desc.suspension_axis)
    }

    /// Spin axis after steering, in world space.
    pub fn axle_world(&self, bodies: &Bodies) -> Vec3 {
        let steer = Quat::from_axis_angle(self.desc.suspension_axis.into(), self.steer_angle);
        bodies.pose(self.desc.chassis).transform_vector(steer * self.desc.axle)
    }

    /// Signed displacement of the wheel centre from its rest position along the
    /// suspension axis; positive when compressed toward the chassis.
    pub fn suspension_travel(&self, bodies: &Bodies) -> Scalar {
        let d = bodies.pose(self.desc.wheel).pos - self.anchor_world(bodies);
        d.dot(self.suspension_axis_world(bodies))
    }

    pub(crate) fn push_rows(&self, bodies: &Bodies, params: &JointParams, h: Scalar, rows: &mut Vec<Row>) {
        let (c, w) = (self.desc.chassis, self.desc.wheel);
        let centre = bodies.pose(w).pos;
        let offset = centre - self.anchor_world(bodies);
        let up = self.suspension_axis_world(bodies);
        let axle = self.axle_world(bodies);
        let fwd = axle.cross(up).normalize_or_zero();
        let rigid_cfm = params.cfm / h;

        // wheel centre stays on the suspension axis
        for dir in [fwd, axle] {
            let err = offset.dot(dir);
            rows.push(
                Row::linear(bodies, w, centre, c, centre, dir)
                    .with_rhs(-params.erp / h * err)
                    .with_cfm(rigid_cfm),
            );
        }

        // spring-damper along it
        let kh = h * self.desc.stiffness;
        let denom = kh + self.desc.damping;
        if denom > 0.0 {
            let erp = kh / denom;
            let cfm = 1.0 / denom;
            rows.push(
                Row::linear(bodies, w, centre, c, centre, up)
                    .with_rhs(-erp / h * offset.dot(up))
                    .with_cfm(cfm / h),
            );
        }

        // relative spin only about the axle
        for dir in [up, fwd] {
            rows.push(Row::angular(c, w, dir).with_cfm(rigid_cfm));
        }

        if self.motor_max_force > 0.0 {
            let limit = self.motor_max_force * h;
            rows.push(
                Row::angular(c, w, axle)
                    .with_rhs(self.motor_velocity)
                    .with_bound(RowBound::Range { lo: -limit, hi: limit }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rubble_core::{vec3, Isometry};
    use rubble_dynamics::BodyDesc;
    use rubble_geom::MassProps;

    fn rig() -> (Bodies, WheelJoint) {
        let mut bodies = Bodies::default();
        let c = bodies.add(BodyDesc::dynamic(Isometry::from_pos(vec3(0.0, 1.0, 0.0)), MassProps::from_box(vec3(2.0, 0.5, 1.0), 100.0)));
        let anchor = vec3(0.9, -0.4, 0.7);
        let w = bodies.add(BodyDesc::dynamic(Isometry::from_pos(vec3(0.9, 0.6, 0.7)), MassProps::from_sphere(0.5, 10.0)));
        let mut desc = WheelJointDesc::new(c, w, anchor);
        desc.steerable = true;
        (bodies, WheelJoint::new(desc))
    }

    #[test]
    fn steering_servo_converges_and_clamps() {
        let (_, mut j) = rig();
        j.set_steer(0.5, 10.0);
        for _ in 0..2400 { j.advance_steering(1.0 / 240.0); }
        assert_abs_diff_eq!(j.steer_angle(), 0.5, epsilon = 1e-4);

        j.set_steer(5.0, 10.0);
        for _ in 0..2400 { j.advance_steering(1.0 / 240.0); }
        assert_abs_diff_eq!(j.steer_angle(), j.desc.max_steer, epsilon = 1e-4);
    }

    #[test]
    fn fixed_wheels_ignore_steering() {
        let (_, mut j) = rig();
        j.desc.steerable = false;
        j.set_steer(0.5, 10.0);
        j.advance_steering(1.0);
        assert_eq!(j.steer_angle(), 0.0);
    }

    #[test]
    fn positive_steer_turns_axle_left() {
        let (bodies, mut j) = rig();
        j.set_steer(0.3, 240.0);
        j.advance_steering(1.0 / 240.0);
        let axle = j.axle_world(&bodies);
        // forward = axle × up; left of +X is -Z
        let fwd = axle.cross(Vec3::Y);
        assert!(fwd.x > 0.9);
        assert!(fwd.z < -0.1);
    }

    #[test]
    fn rows_per_wheel() {
        let (bodies, mut j) = rig();
        let mut rows = Vec::new();
        j.push_rows(&bodies, &JointParams::default(), 1.0 / 240.0, &mut rows);
        assert_eq!(rows.len(), 5);
        j.set_motor(10.0, 800.0);
        rows.clear();
        j.push_rows(&bodies, &JointParams::default(), 1.0 / 240.0, &mut rows);
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn travel_is_zero_at_rest() {
        let (bodies, j) = rig();
        assert_abs_diff_eq!(j.suspension_travel(&bodies), 0.0, epsilon = 1e-6);
    }
}
