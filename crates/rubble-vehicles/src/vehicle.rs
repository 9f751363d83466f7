//! Chassis + four wheels, their joints, drive application and recovery.

use glam::Quat;
use rubble_articulation::WheelJointDesc;
use rubble_core::{vec3, BodyId, Isometry, JointId, Scalar, Vec3, Velocity};
use rubble_dynamics::BodyDesc;
use rubble_geom::{MassProps, Shape};
use rubble_world::World;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Metres per second to miles per hour.
pub const MPH_PER_MPS: Scalar = 2.236_936_3;

/// Wheel order used by every per-wheel array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WheelSlot {
    /// Front left (steers).
    FrontLeft,
    /// Front right (steers).
    FrontRight,
    /// Rear left (driven).
    RearLeft,
    /// Rear right (driven).
    RearRight,
}

impl WheelSlot {
    /// All slots in storage order.
    pub const ALL: [WheelSlot; 4] = [WheelSlot::FrontLeft, WheelSlot::FrontRight, WheelSlot::RearLeft, WheelSlot::RearRight];

    /// Front wheels steer.
    pub fn steers(self) -> bool { matches!(self, WheelSlot::FrontLeft | WheelSlot::FrontRight) }
    /// Rear wheels carry the drive motors.
    pub fn driven(self) -> bool { !self.steers() }
}

/// Static vehicle description. Chassis space: forward +X, up +Y, right +Z.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    /// Full chassis box size (m).
    pub chassis_size: [Scalar; 3],
    /// Chassis mass (kg).
    pub chassis_mass: Scalar,
    /// Wheel sphere radius (m).
    pub wheel_radius: Scalar,
    /// Mass of one wheel (kg).
    pub wheel_mass: Scalar,
    /// Wheel centre distance from the chassis centre along X.
    pub half_wheelbase: Scalar,
    /// Wheel centre distance from the chassis centre along Z.
    pub half_track: Scalar,
    /// Rest wheel centre below the chassis centre.
    pub wheel_drop: Scalar,
    /// Suspension spring rate (N/m).
    pub suspension_stiffness: Scalar,
    /// Suspension damping (N·s/m).
    pub suspension_damping: Scalar,
    /// Hard limit of the steering servo (rad).
    pub max_steer: Scalar,
    /// Anti-sway stiffness per axle (N/m of travel difference).
    pub sway_stiffness: Scalar,
    /// Chassis spawn position.
    pub spawn: [Scalar; 3],
    /// Extra height given to the chassis by `unflip`.
    pub unflip_lift: Scalar,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            chassis_size: [2.0, 0.5, 1.0],
            chassis_mass: 300.0,
            wheel_radius: 0.5,
            wheel_mass: 15.0,
            half_wheelbase: 1.0,
            half_track: 0.75,
            wheel_drop: 0.4,
            suspension_stiffness: 15_000.0,
            suspension_damping: 1_000.0,
            max_steer: 0.75,
            sway_stiffness: 8_000.0,
            spawn: [-12.0, 1.2, 0.0],
            unflip_lift: 1.5,
        }
    }
}

impl VehicleParams {
    /// Rest wheel centre in chassis space.
    pub fn anchor(&self, slot: WheelSlot) -> Vec3 {
        let (x, z) = match slot {
            WheelSlot::FrontLeft => (self.half_wheelbase, -self.half_track),
            WheelSlot::FrontRight => (self.half_wheelbase, self.half_track),
            WheelSlot::RearLeft => (-self.half_wheelbase, -self.half_track),
            WheelSlot::RearRight => (-self.half_wheelbase, self.half_track),
        };
        vec3(x, -self.wheel_drop, z)
    }
}

/// Handles of a spawned car.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// Chassis body.
    pub chassis: BodyId,
    /// Wheel bodies in `WheelSlot::ALL` order.
    pub wheels: [BodyId; 4],
    /// Wheel joints in `WheelSlot::ALL` order.
    pub joints: [JointId; 4],
    /// Parameters used at spawn.
    pub params: VehicleParams,
}

impl Vehicle {
    /// Creates chassis, wheels, wheel joints and both sway bars.
    /// Vehicle bodies never auto-disable.
    pub fn spawn(world: &mut World, params: VehicleParams) -> Vehicle {
        let size = Vec3::from_array(params.chassis_size);
        let pose = Isometry::from_pos(Vec3::from_array(params.spawn));
        let mut desc = BodyDesc::dynamic(pose, MassProps::from_box(size, 1.0).with_mass(params.chassis_mass));
        desc.auto_disable = false;
        let chassis = world.add_body(desc);
        world.add_geom(chassis, Shape::cuboid(size));

        let wheel_mass = MassProps::from_sphere(params.wheel_radius, 1.0).with_mass(params.wheel_mass);
        let mut wheels = [chassis; 4];
        let mut joints = [JointId(0); 4];
        for (k, slot) in WheelSlot::ALL.into_iter().enumerate() {
            let anchor = params.anchor(slot);
            let mut wd = BodyDesc::dynamic(Isometry::from_pos(pose.transform_point(anchor)), wheel_mass);
            wd.auto_disable = false;
            let wheel = world.add_body(wd);
            world.add_geom(wheel, Shape::Sphere { r: params.wheel_radius });

            let mut jd = WheelJointDesc::new(chassis, wheel, anchor);
            jd.stiffness = params.suspension_stiffness;
            jd.damping = params.suspension_damping;
            jd.steerable = slot.steers();
            jd.max_steer = params.max_steer;
            wheels[k] = wheel;
            joints[k] = world.add_wheel_joint(jd);
        }

        let j = world.joints_mut();
        j.add_sway_bar(joints[0], joints[1], params.sway_stiffness);
        j.add_sway_bar(joints[2], joints[3], params.sway_stiffness);

        info!(%chassis, at = ?params.spawn, "vehicle spawned");
        Vehicle { chassis, wheels, joints, params }
    }

    /// Applies actuation until the next call: `accel` is the target spin rate
    /// of the driven wheels with torque limited by `max_accel_force`; `steer`
    /// is the target steering angle servoed with `steer_gain`.
    pub fn update(&self, world: &mut World, accel: Scalar, max_accel_force: Scalar, steer: Scalar, steer_gain: Scalar) {
        let joints = world.joints_mut();
        for (slot, id) in WheelSlot::ALL.into_iter().zip(self.joints) {
            let j = joints.wheel_mut(id);
            if slot.steers() { j.set_steer(steer, steer_gain); }
            if slot.driven() { j.set_motor(accel, max_accel_force); }
        }
    }

    /// Switches both sway bars.
    pub fn set_anti_sway(&self, world: &mut World, on: bool) {
        world.joints_mut().set_sway_enabled(on);
    }

    /// Chassis pose.
    pub fn pose(&self, world: &World) -> Isometry { world.body_pose(self.chassis) }

    /// Chassis speed in m/s.
    pub fn speed(&self, world: &World) -> Scalar { world.body_vel(self.chassis).lin.length() }

    /// Chassis speed in mph.
    pub fn speed_mph(&self, world: &World) -> Scalar { self.speed(world) * MPH_PER_MPS }

    /// Heading about +Y of the chassis forward axis; 0 when it points straight up or down.
    pub fn yaw(&self, world: &World) -> Scalar {
        let fwd = self.pose(world).rot * Vec3::X;
        if fwd.x * fwd.x + fwd.z * fwd.z < 1e-8 { return 0.0; }
        (-fwd.z).atan2(fwd.x)
    }

    /// Puts the car back on its wheels: upright with the same heading and
    /// horizontal position, lifted by `unflip_lift`, wheels at rest, every
    /// velocity zeroed and every body awake.
    pub fn unflip(&self, world: &mut World) {
        let old = self.pose(world);
        let rot = Quat::from_rotation_y(self.yaw(world));
        let pose = Isometry { pos: vec3(old.pos.x, old.pos.y + self.params.unflip_lift, old.pos.z), rot };

        world.set_body_pose(self.chassis, pose);
        world.set_body_vel(self.chassis, Velocity::ZERO);
        for (k, slot) in WheelSlot::ALL.into_iter().enumerate() {
            let at = Isometry { pos: pose.transform_point(self.params.anchor(slot)), rot };
            world.set_body_pose(self.wheels[k], at);
            world.set_body_vel(self.wheels[k], Velocity::ZERO);
            world.joints_mut().wheel_mut(self.joints[k]).reset_steering();
        }
        info!(x = pose.pos.x, z = pose.pos.z, "vehicle unflipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rubble_controllers::roll_of;
    use rubble_world::{collidable_flag, WorldBuilder};

    const H: f32 = 1.0 / 240.0;

    fn scene() -> (World, Vehicle) {
        let mut w = WorldBuilder::new().build();
        w.add_static_box(Isometry::from_pos(vec3(0.0, -5.0, 0.0)), vec3(40.0, 5.0, 40.0));
        let v = Vehicle::spawn(&mut w, VehicleParams { spawn: [0.0, 1.2, 0.0], ..Default::default() });
        (w, v)
    }

    fn run(w: &mut World, ticks: usize) {
        for _ in 0..ticks { w.step(H, collidable_flag); }
    }

    #[test]
    fn spawn_links_every_wheel() {
        let (w, v) = scene();
        assert_eq!(w.num_bodies(), 6);
        assert_eq!(w.joints().len(), 4);
        for wheel in v.wheels {
            assert!(w.joints().are_connected(v.chassis, wheel));
        }
        assert!(w.joints().sway_enabled());
    }

    #[test]
    fn settles_on_its_wheels() {
        let (mut w, v) = scene();
        run(&mut w, 480);
        let p = v.pose(&w);
        assert!(p.pos.y > 0.6 && p.pos.y < 1.1, "chassis height {}", p.pos.y);
        assert!(roll_of(p.rot).abs() < 0.1);
        assert!(v.speed(&w) < 0.1);
        // never sleeps
        assert!(w.is_awake(v.chassis));
    }

    #[test]
    fn positive_accel_drives_forward() {
        let (mut w, v) = scene();
        run(&mut w, 240);
        let start = v.pose(&w).pos;
        v.update(&mut w, 20.0, 800.0, 0.0, 10.0);
        run(&mut w, 480);
        let moved = v.pose(&w).pos - start;
        assert!(moved.x > 1.0, "moved {moved:?}");
        assert!(moved.z.abs() < moved.x * 0.25);
        assert!(roll_of(v.pose(&w).rot).abs() < 0.5);
    }

    #[test]
    fn steering_left_turns_left() {
        let (mut w, v) = scene();
        run(&mut w, 240);
        v.update(&mut w, 10.0, 800.0, 0.5, 10.0);
        run(&mut w, 180);
        // heading rotates counter-clockwise seen from above
        let yaw = v.yaw(&w);
        assert!(yaw > 0.1 && yaw < 2.5, "yaw {yaw}");
    }

    #[test]
    fn unflip_restores_upright_pose() {
        let (mut w, v) = scene();
        let flipped = Isometry {
            pos: vec3(3.0, 0.3, -2.0),
            rot: Quat::from_rotation_y(0.7) * Quat::from_rotation_x(core::f32::consts::PI),
        };
        w.set_body_pose(v.chassis, flipped);
        w.set_body_vel(v.chassis, Velocity { lin: Vec3::X, ang: Vec3::Y });
        let yaw_before = v.yaw(&w);

        v.unflip(&mut w);
        let p = v.pose(&w);
        assert_abs_diff_eq!(p.pos.x, 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.pos.z, -2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.pos.y, 1.8, epsilon = 1e-5);
        assert_abs_diff_eq!(roll_of(p.rot), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(v.yaw(&w), yaw_before, epsilon = 1e-4);
        assert_eq!(w.body_vel(v.chassis), Velocity::ZERO);
        for (k, slot) in WheelSlot::ALL.into_iter().enumerate() {
            let expect = p.transform_point(v.params.anchor(slot));
            assert!((w.body_pose(v.wheels[k]).pos - expect).length() < 1e-5);
            assert!(w.is_awake(v.wheels[k]));
        }
    }
}
