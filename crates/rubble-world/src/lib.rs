//! Rigid-body world: bodies, geometries, wheel joints, the per-tick collision
//! pass and the iterative quick-step solver.

pub mod contact;
pub mod context;
pub mod debug;
pub mod geometry;

use rubble_articulation::{JointParams, Joints, WheelJointDesc};
use rubble_collision::{SurfaceParams, SweepAndPrune};
use rubble_core::{
    hash_quat, hash_vec3, BodyId, GeomId, Isometry, JointId, Scalar, StepHasher, StepStats, Vec3,
    Velocity,
};
use rubble_dynamics::{AutoDisable, Bodies, BodyDesc, Row, solve_rows};
use rubble_geom::{aabb_of, Aabb, MassProps, Shape};
use tracing::{debug, info};

pub use contact::{ContactConstraint, ContactGroup};
pub use context::{CollisionContext, PairFilter};
pub use debug::DebugSettings;
pub use geometry::Geometry;

/// Default collidability predicate: honours each geometry's own flag.
pub fn collidable_flag(_: GeomId, g: &Geometry) -> bool { g.collidable }

/* ---------------- Solver settings ---------------- */
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverSettings {
    /// Gauss-Seidel sweeps per tick.
    pub iterations: u32,
    pub joint: JointParams,
}

impl Default for SolverSettings {
    fn default() -> Self { Self { iterations: 20, joint: JointParams::default() } }
}

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    pub bodies: usize,
    pub geoms: usize,
    pub gravity: Vec3,
    pub auto_disable: AutoDisable,
    pub solver: SolverSettings,
    pub surface: SurfaceParams,
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            bodies: 128,
            geoms: 128,
            gravity: Vec3::new(0.0, -9.8, 0.0),
            auto_disable: AutoDisable::default(),
            solver: SolverSettings::default(),
            surface: SurfaceParams::default(),
        }
    }

    pub fn with_capacity(mut self, bodies: usize, geoms: usize) -> Self {
        self.bodies = bodies;
        self.geoms = geoms;
        self
    }
    pub fn gravity(mut self, g: Vec3) -> Self { self.gravity = g; self }
    pub fn auto_disable(mut self, a: AutoDisable) -> Self { self.auto_disable = a; self }
    pub fn solver(mut self, s: SolverSettings) -> Self { self.solver = s; self }
    pub fn surface(mut self, s: SurfaceParams) -> Self { self.surface = s; self }

    pub fn build(self) -> World {
        World {
            gravity: self.gravity,
            bodies: Bodies::with_capacity(self.bodies),
            geoms: Vec::with_capacity(self.geoms),
            joints: Joints::new(),
            contacts: ContactGroup::with_capacity(self.geoms * 4),
            auto_disable: self.auto_disable,
            solver: self.solver,
            surface: self.surface,
            sap: SweepAndPrune::new(),
            aabbs: Vec::with_capacity(self.geoms),
            pairs: Vec::new(),
            rows: Vec::new(),
            tick: 0,
            debug: DebugSettings::default(),
        }
    }
}

/* ---------------- World ---------------- */
pub struct World {
    pub gravity: Vec3,
    bodies: Bodies,
    geoms: Vec<Geometry>,
    joints: Joints,
    contacts: ContactGroup,
    auto_disable: AutoDisable,
    solver: SolverSettings,
    surface: SurfaceParams,

    // scratch
    sap: SweepAndPrune,
    aabbs: Vec<Aabb>,
    pairs: Vec<(usize, usize)>,
    rows: Vec<Row>,

    tick: u64,
    debug: DebugSettings,
}

impl World {
    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    #[inline] pub fn bodies(&self) -> &Bodies { &self.bodies }
    #[inline] pub fn bodies_mut(&mut self) -> &mut Bodies { &mut self.bodies }
    #[inline] pub fn joints(&self) -> &Joints { &self.joints }
    #[inline] pub fn joints_mut(&mut self) -> &mut Joints { &mut self.joints }
    #[inline] pub fn geoms(&self) -> &[Geometry] { &self.geoms }
    #[inline] pub fn geom(&self, id: GeomId) -> &Geometry { &self.geoms[id.index()] }
    #[inline] pub fn contacts(&self) -> &ContactGroup { &self.contacts }
    #[inline] pub fn auto_disable(&self) -> &AutoDisable { &self.auto_disable }
    #[inline] pub fn num_bodies(&self) -> u32 { self.bodies.len() as u32 }

    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }
    pub fn set_gravity(&mut self, g: Vec3) { self.gravity = g; }

    /* ---------- Bodies ---------- */
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyId { self.bodies.add(desc) }

    /// Static box with its own immovable body; used for ground and scenery.
    pub fn add_static_box(&mut self, pose: Isometry, half: Vec3) -> (BodyId, GeomId) {
        let body = self.bodies.add(BodyDesc::fixed(pose));
        let geom = self.add_geom(body, Shape::Box { hx: half.x, hy: half.y, hz: half.z });
        (body, geom)
    }

    pub fn body_pose(&self, id: BodyId) -> Isometry { self.bodies.pose(id) }
    pub fn body_vel(&self, id: BodyId) -> Velocity { self.bodies.vel(id) }
    pub fn body_mass(&self, id: BodyId) -> &MassProps { self.bodies.mass_props(id) }
    pub fn is_awake(&self, id: BodyId) -> bool { self.bodies.is_awake(id) }

    /// Teleports a body and wakes it.
    pub fn set_body_pose(&mut self, id: BodyId, pose: Isometry) {
        self.bodies.set_pose(id, pose);
        self.bodies.wake(id);
        self.refresh_body_aabbs(id);
    }
    pub fn set_body_vel(&mut self, id: BodyId, vel: Velocity) {
        self.bodies.set_vel(id, vel);
        self.bodies.wake(id);
    }
    pub fn add_force(&mut self, id: BodyId, f: Vec3) { self.bodies.add_force(id, f); }
    pub fn wake(&mut self, id: BodyId) { self.bodies.wake(id); }

    /* ---------- Geometry ---------- */
    pub fn add_geom(&mut self, body: BodyId, shape: Shape) -> GeomId {
        self.add_geom_with_offset(body, shape, Isometry::default())
    }

    pub fn add_geom_with_offset(&mut self, body: BodyId, shape: Shape, offset: Isometry) -> GeomId {
        let pose = self.bodies.pose(body).compose(&offset);
        self.geoms.push(Geometry { body, shape, offset, collidable: true, aabb: aabb_of(&shape, &pose) });
        GeomId((self.geoms.len() as u32) - 1)
    }

    pub fn set_collidable(&mut self, id: GeomId, on: bool) { self.geoms[id.index()].collidable = on; }

    fn refresh_body_aabbs(&mut self, body: BodyId) {
        let pose = self.bodies.pose(body);
        for g in self.geoms.iter_mut().filter(|g| g.body == body) {
            g.aabb = aabb_of(&g.shape, &g.world_pose(&pose));
        }
    }

    /* ---------- Joints ---------- */
    pub fn add_wheel_joint(&mut self, desc: WheelJointDesc) -> JointId { self.joints.add_wheel_joint(desc) }

    /* ---------- Collision pass ---------- */
    /// Broad phase over all geometries, then the near callback for every
    /// candidate pair. Constraints accumulate in the contact group.
    pub fn collide<F>(&mut self, collidable: F) -> StepStats
    where
        F: Fn(GeomId, &Geometry) -> bool,
    {
        self.aabbs.clear();
        for g in &mut self.geoms {
            g.aabb = aabb_of(&g.shape, &g.world_pose(&self.bodies.pose(g.body)));
            self.aabbs.push(g.aabb);
        }
        self.sap.pairs(&self.aabbs, &mut self.pairs);

        let before = self.contacts.len();
        let mut ctx = CollisionContext::new(
            &self.bodies,
            &self.joints,
            &self.geoms,
            &mut self.contacts,
            self.surface,
            collidable,
        );
        for &(i, j) in &self.pairs {
            ctx.near(GeomId(i as u32), GeomId(j as u32));
        }
        let woken = ctx.into_wake_list();
        for b in woken { self.bodies.wake(b); }

        StepStats {
            pairs_tested: self.pairs.len() as u32,
            contacts: (self.contacts.len() - before) as u32,
            ..Default::default()
        }
    }

    /// Destroys all contact constraints of this tick.
    pub fn empty_contacts(&mut self) { self.contacts.empty(); }

    /* ---------- Integration ---------- */
    /// Advances the world by `h` with the iterative solver: joint pre-step,
    /// force integration, constraint solve, position integration, force clear,
    /// auto-disable.
    pub fn quick_step(&mut self, h: Scalar) -> StepStats {
        self.tick = self.tick.wrapping_add(1);

        self.joints.pre_step(&mut self.bodies, h);
        self.bodies.integrate_velocities(self.gravity, h);

        self.rows.clear();
        let joint_rows = self.joints.build_rows(&self.bodies, &self.solver.joint, h, &mut self.rows);
        for c in self.contacts.iter() {
            contact::push_contact_rows(c, &self.bodies, h, &mut self.rows);
        }
        solve_rows(&mut self.rows, &mut self.bodies, self.solver.iterations);

        self.bodies.integrate_positions(h);
        self.bodies.clear_forces();
        let fell_asleep = self.bodies.update_sleep(&self.auto_disable);

        let stats = StepStats {
            contacts: self.contacts.len() as u32,
            joint_rows: joint_rows as u32,
            awake: self.bodies.awake_count(),
            fell_asleep,
            ..Default::default()
        };
        debug!(tick = self.tick, rows = self.rows.len(), awake = stats.awake, "quick_step");

        if self.debug.print_every != 0 && self.tick % self.debug.print_every as u64 == 0 {
            self.print_debug_block();
        }
        stats
    }

    /// One full tick: collision pass, solve, then the contact group is emptied.
    pub fn step<F>(&mut self, h: Scalar, collidable: F) -> StepStats
    where
        F: Fn(GeomId, &Geometry) -> bool,
    {
        let mut stats = self.collide(collidable);
        let solve = self.quick_step(h);
        self.empty_contacts();
        stats.joint_rows = solve.joint_rows;
        stats.awake = solve.awake;
        stats.fell_asleep = solve.fell_asleep;
        stats
    }

    /// Digest of every body pose and velocity, in id order.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_u64(self.tick);
        for id in self.bodies.ids() {
            let pose = self.bodies.pose(id);
            let vel = self.bodies.vel(id);
            h.update_bytes(&id.0.to_le_bytes());
            hash_vec3(&mut h, &pose.pos);
            hash_quat(&mut h, &pose.rot);
            hash_vec3(&mut h, &vel.lin);
            hash_vec3(&mut h, &vel.ang);
        }
        h.finalize()
    }

    fn print_debug_block(&self) {
        info!(tick = self.tick, bodies = self.bodies.len(), awake = self.bodies.awake_count(), "--- debug ---");

        if self.debug.show_energy {
            let mut ke = 0.0f32;
            for id in self.bodies.ids() {
                let im = self.bodies.inv_mass_of(id);
                if im > 0.0 && self.bodies.is_awake(id) {
                    ke += 0.5 * self.bodies.vel(id).lin.length_squared() / im;
                }
            }
            info!("energy: KE_total = {:.6}", ke);
        }

        if self.debug.show_bodies {
            for id in self.bodies.ids().take(self.debug.max_lines) {
                let p = self.bodies.pose(id).pos;
                let v = self.bodies.vel(id).lin;
                info!("{:>9}  pos=({:+.3},{:+.3},{:+.3})  vel=({:+.3},{:+.3},{:+.3})  awake={}",
                      id.to_string(), p.x, p.y, p.z, v.x, v.y, v.z, self.bodies.is_awake(id));
            }
        }

        if self.debug.show_contacts {
            if self.contacts.is_empty() {
                info!("contacts: (none)");
            }
            for c in self.contacts.iter().take(self.debug.max_lines) {
                let n = c.contact.normal;
                info!("contact {} {}  n=({:+.3},{:+.3},{:+.3})  depth={:.5}",
                      c.body1, c.body2, n.x, n.y, n.z, c.contact.depth);
            }
        }
    }
}
