use rubble_core::{JointId, Scalar};
use rubble_dynamics::Bodies;
use crate::wheel::WheelJoint;

/// Anti-roll coupling between the left and right wheel of one axle.
/// Pushes the two wheels toward equal suspension travel, reacting on the chassis.
#[derive(Copy, Clone, Debug)]
pub struct SwayBar {
    pub left: JointId,
    pub right: JointId,
    /// N per metre of travel difference.
    pub stiffness: Scalar,
    pub enabled: bool,
}

impl SwayBar {
    pub(crate) fn apply(&self, wheels: &[WheelJoint], bodies: &mut Bodies) {
        let (l, r) = (&wheels[self.left.index()], &wheels[self.right.index()]);
        let diff = l.suspension_travel(bodies) - r.suspension_travel(bodies);
        if diff == 0.0 { return; }

        let push_l = l.suspension_axis_world(bodies) * (-self.stiffness * diff);
        let push_r = r.suspension_axis_world(bodies) * (self.stiffness * diff);
        let (anchor_l, anchor_r) = (l.anchor_world(bodies), r.anchor_world(bodies));

        bodies.add_force(l.desc.wheel, push_l);
        bodies.add_force(r.desc.wheel, push_r);
        bodies.add_force_at_pos(l.desc.chassis, -push_l, anchor_l);
        bodies.add_force_at_pos(r.desc.chassis, -push_r, anchor_r);
    }
}
