use rubble_core::types::{Isometry, Velocity, Vec3, Mat3};
use rubble_core::{BodyId, Quat, Scalar};
use rubble_geom::MassProps;

/// Input descriptor when creating a body.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc {
    pub pose: Isometry,
    pub vel: Velocity,
    pub mass: MassProps,
    pub dynamic: bool,
    /// Whether the body may be put to sleep when it comes to rest.
    pub auto_disable: bool,
}

impl BodyDesc {
    /// Integration and the solver treat the body origin as the centre of mass,
    /// so `mass.com` must be at the origin.
    pub fn dynamic(pose: Isometry, mass: MassProps) -> Self {
        debug_assert!(
            mass.com.length_squared() < 1e-6,
            "centre of mass must sit at the body origin, got {:?}",
            mass.com
        );
        Self { pose, vel: Velocity::ZERO, mass, dynamic: true, auto_disable: true }
    }
    pub fn fixed(pose: Isometry) -> Self {
        Self { pose, vel: Velocity::ZERO, mass: MassProps::infinite(), dynamic: false, auto_disable: false }
    }
}

/// Sleep thresholds. A body whose linear and angular speeds stay below the
/// thresholds for `steps` consecutive ticks is disabled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AutoDisable {
    pub enabled: bool,
    pub linear: Scalar,
    pub angular: Scalar,
    pub steps: u32,
}

impl Default for AutoDisable {
    fn default() -> Self { Self { enabled: true, linear: 0.05, angular: 0.05, steps: 4 } }
}

/// SoA body storage with deterministic ID = index semantics.
pub struct Bodies {
    pub(crate) pos: Vec<Vec3>,
    pub(crate) rot: Vec<Quat>,
    pub(crate) linvel: Vec<Vec3>,
    pub(crate) angvel: Vec<Vec3>,
    mass: Vec<MassProps>,
    inv_mass: Vec<Scalar>,
    inv_inertia_local: Vec<Mat3>,
    dynamic: Vec<bool>,
    awake: Vec<bool>,
    auto_disable: Vec<bool>,
    idle_ticks: Vec<u32>,
    force: Vec<Vec3>,
    torque: Vec<Vec3>,
}

impl Bodies {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            pos:     Vec::with_capacity(cap),
            rot:     Vec::with_capacity(cap),
            linvel:  Vec::with_capacity(cap),
            angvel:  Vec::with_capacity(cap),
            mass:    Vec::with_capacity(cap),
            inv_mass: Vec::with_capacity(cap),
            inv_inertia_local: Vec::with_capacity(cap),
            dynamic: Vec::with_capacity(cap),
            awake:   Vec::with_capacity(cap),
            auto_disable: Vec::with_capacity(cap),
            idle_ticks: Vec::with_capacity(cap),
            force:   Vec::with_capacity(cap),
            torque:  Vec::with_capacity(cap),
        }
    }

    pub fn add(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.pos.len() as u32);
        let mass = if desc.dynamic { desc.mass } else { MassProps::infinite() };
        self.pos.push(desc.pose.pos);
        self.rot.push(desc.pose.rot.normalize());
        self.linvel.push(if desc.dynamic { desc.vel.lin } else { Vec3::ZERO });
        self.angvel.push(if desc.dynamic { desc.vel.ang } else { Vec3::ZERO });
        self.inv_mass.push(mass.inv_mass);
        self.inv_inertia_local.push(mass.inv_inertia());
        self.mass.push(mass);
        self.dynamic.push(desc.dynamic);
        self.awake.push(desc.dynamic);
        self.auto_disable.push(desc.dynamic && desc.auto_disable);
        self.idle_ticks.push(0);
        self.force.push(Vec3::ZERO);
        self.torque.push(Vec3::ZERO);
        id
    }

    #[inline] pub fn len(&self) -> usize { self.pos.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.pos.is_empty() }

    // -------- Accessors used by world/solver/hash --------
    #[inline] pub fn pose(&self, id: BodyId) -> Isometry {
        let i = id.index();
        Isometry { pos: self.pos[i], rot: self.rot[i] }
    }
    #[inline] pub fn set_pose(&mut self, id: BodyId, iso: Isometry) {
        let i = id.index();
        self.pos[i] = iso.pos;
        self.rot[i] = iso.rot.normalize();
    }

    #[inline] pub fn vel(&self, id: BodyId) -> Velocity {
        let i = id.index();
        Velocity { lin: self.linvel[i], ang: self.angvel[i] }
    }
    #[inline] pub fn set_vel(&mut self, id: BodyId, v: Velocity) {
        let i = id.index();
        if !self.dynamic[i] { return; }
        self.linvel[i] = v.lin;
        self.angvel[i] = v.ang;
    }

    #[inline] pub fn mass_props(&self, id: BodyId) -> &MassProps { &self.mass[id.index()] }
    #[inline] pub fn inv_mass_of(&self, id: BodyId) -> Scalar { self.inv_mass[id.index()] }
    #[inline] pub fn is_dynamic(&self, id: BodyId) -> bool { self.dynamic[id.index()] }
    #[inline] pub fn is_awake(&self, id: BodyId) -> bool { self.awake[id.index()] }
    /// Dynamic and awake: the body takes part in integration and solving.
    #[inline] pub fn is_active(&self, id: BodyId) -> bool {
        let i = id.index();
        self.dynamic[i] && self.awake[i]
    }

    pub fn set_auto_disable(&mut self, id: BodyId, on: bool) {
        let i = id.index();
        self.auto_disable[i] = on && self.dynamic[i];
        self.idle_ticks[i] = 0;
    }

    // -------- Sleep --------
    pub fn wake(&mut self, id: BodyId) {
        let i = id.index();
        if !self.dynamic[i] { return; }
        self.awake[i] = true;
        self.idle_ticks[i] = 0;
    }

    pub fn sleep(&mut self, id: BodyId) {
        let i = id.index();
        self.awake[i] = false;
        self.idle_ticks[i] = 0;
        self.linvel[i] = Vec3::ZERO;
        self.angvel[i] = Vec3::ZERO;
    }

    /// Advances idle counters of active bodies; returns how many fell asleep.
    pub fn update_sleep(&mut self, params: &AutoDisable) -> u32 {
        if !params.enabled { return 0; }
        let lin2 = params.linear * params.linear;
        let ang2 = params.angular * params.angular;
        let mut slept = 0;
        for i in 0..self.len() {
            if !(self.dynamic[i] && self.awake[i] && self.auto_disable[i]) { continue; }
            if self.linvel[i].length_squared() < lin2 && self.angvel[i].length_squared() < ang2 {
                self.idle_ticks[i] += 1;
                if self.idle_ticks[i] >= params.steps {
                    self.sleep(BodyId(i as u32));
                    slept += 1;
                }
            } else {
                self.idle_ticks[i] = 0;
            }
        }
        slept
    }

    pub fn awake_count(&self) -> u32 {
        (0..self.len()).filter(|&i| self.dynamic[i] && self.awake[i]).count() as u32
    }

    // -------- Forces --------
    #[inline] pub fn add_force(&mut self, id: BodyId, f: Vec3) { self.force[id.index()] += f; }

    /// Force applied at a world-space point; contributes torque about the body origin.
    pub fn add_force_at_pos(&mut self, id: BodyId, f: Vec3, at: Vec3) {
        let i = id.index();
        self.force[i] += f;
        self.torque[i] += (at - self.pos[i]).cross(f);
    }

    #[inline] pub fn force(&self, id: BodyId) -> Vec3 { self.force[id.index()] }

    pub fn clear_forces(&mut self) {
        self.force.iter_mut().for_each(|f| *f = Vec3::ZERO);
        self.torque.iter_mut().for_each(|t| *t = Vec3::ZERO);
    }

    // -------- Inertia --------
    /// World-space inverse inertia: R * I^-1_local * R^T.
    pub fn inv_inertia_world(&self, id: BodyId) -> Mat3 {
        let i = id.index();
        if self.inv_mass[i] == 0.0 { return Mat3::ZERO; }
        let r = Mat3::from_quat(self.rot[i]);
        r * self.inv_inertia_local[i] * r.transpose()
    }

    /// Inverse mass as seen by the solver: sleeping and static bodies are immovable.
    #[inline] pub(crate) fn solver_inv_mass(&self, i: usize) -> Scalar {
        if self.dynamic[i] && self.awake[i] { self.inv_mass[i] } else { 0.0 }
    }

    // -------- Integration --------
    /// v += h (g + F/m), ω += h I⁻¹ τ for every active body.
    pub fn integrate_velocities(&mut self, gravity: Vec3, h: Scalar) {
        for i in 0..self.len() {
            if !(self.dynamic[i] && self.awake[i]) { continue; }
            let id = BodyId(i as u32);
            self.linvel[i] += (gravity + self.force[i] * self.inv_mass[i]) * h;
            let inv_i = self.inv_inertia_world(id);
            self.angvel[i] += inv_i * self.torque[i] * h;
        }
    }

    /// x += h v, q += h/2 (ω ⊗ q), then renormalise.
    pub fn integrate_positions(&mut self, h: Scalar) {
        for i in 0..self.len() {
            if !(self.dynamic[i] && self.awake[i]) { continue; }
            self.pos[i] += self.linvel[i] * h;
            let w = self.angvel[i];
            let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.rot[i];
            self.rot[i] = (self.rot[i] + spin * (0.5 * h)).normalize();
        }
    }

    // Iterator for hashing in stable order
    pub fn ids(&self) -> impl ExactSizeIterator<Item = BodyId> + '_ {
        (0..self.len() as u32).map(BodyId)
    }
}

impl Default for Bodies {
    fn default() -> Self { Self::with_capacity(0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rubble_core::vec3;

    fn ball(bodies: &mut Bodies, y: f32) -> BodyId {
        bodies.add(BodyDesc::dynamic(Isometry::from_pos(vec3(0.0, y, 0.0)), MassProps::from_sphere(0.5, 1.0)))
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "centre of mass")]
    fn off_centre_mass_is_rejected() {
        let lopsided = MassProps::from_sphere(0.5, 1.0).translated(vec3(0.0, 0.0, 0.4));
        let _ = BodyDesc::dynamic(Isometry::default(), lopsided);
    }

    #[test]
    fn free_fall_matches_semi_implicit_euler() {
        let mut b = Bodies::default();
        let id = ball(&mut b, 10.0);
        let g = vec3(0.0, -9.8, 0.0);
        let h = 1.0 / 240.0;
        for _ in 0..240 {
            b.integrate_velocities(g, h);
            b.integrate_positions(h);
        }
        assert_abs_diff_eq!(b.vel(id).lin.y, -9.8, epsilon = 1e-3);
        // Σ v_k h with v_k = -g k h, k = 1..n
        let expect = 10.0 - 9.8 * h * h * (240.0 * 241.0 / 2.0);
        assert_abs_diff_eq!(b.pose(id).pos.y, expect, epsilon = 1e-3);
    }

    #[test]
    fn static_bodies_ignore_forces_and_velocity() {
        let mut b = Bodies::default();
        let id = b.add(BodyDesc::fixed(Isometry::default()));
        b.set_vel(id, Velocity { lin: Vec3::X, ang: Vec3::Y });
        b.add_force(id, Vec3::Y * 100.0);
        b.integrate_velocities(vec3(0.0, -9.8, 0.0), 0.01);
        b.integrate_positions(0.01);
        assert_eq!(b.pose(id).pos, Vec3::ZERO);
        assert!(!b.is_active(id));
    }

    #[test]
    fn orientation_stays_unit_under_spin() {
        let mut b = Bodies::default();
        let id = ball(&mut b, 0.0);
        b.set_vel(id, Velocity { lin: Vec3::ZERO, ang: vec3(3.0, -7.0, 11.0) });
        for _ in 0..10_000 { b.integrate_positions(1.0 / 240.0); }
        assert_abs_diff_eq!(b.pose(id).rot.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rest_for_n_ticks_puts_body_to_sleep() {
        let mut b = Bodies::default();
        let id = ball(&mut b, 0.0);
        let params = AutoDisable::default();
        for _ in 0..3 { assert_eq!(b.update_sleep(&params), 0); }
        assert!(b.is_awake(id));
        assert_eq!(b.update_sleep(&params), 1);
        assert!(!b.is_awake(id));

        b.wake(id);
        b.set_auto_disable(id, false);
        for _ in 0..10 { b.update_sleep(&params); }
        assert!(b.is_awake(id));
    }

    #[test]
    fn motion_resets_idle_counter() {
        let mut b = Bodies::default();
        let id = ball(&mut b, 0.0);
        let params = AutoDisable::default();
        for _ in 0..3 { b.update_sleep(&params); }
        b.set_vel(id, Velocity { lin: Vec3::X, ang: Vec3::ZERO });
        b.update_sleep(&params);
        b.set_vel(id, Velocity::ZERO);
        for _ in 0..3 { b.update_sleep(&params); }
        assert!(b.is_awake(id));
    }

    #[test]
    fn off_centre_force_adds_torque() {
        let mut b = Bodies::default();
        let id = ball(&mut b, 0.0);
        b.add_force_at_pos(id, Vec3::Y, Vec3::X);
        b.integrate_velocities(Vec3::ZERO, 1.0);
        assert!(b.vel(id).ang.z > 0.0);
        b.clear_forces();
        assert_eq!(b.force(id), Vec3::ZERO);
    }
}
