use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, SeedableRng};
use rubble_controllers::roll_of;
use rubble_core::{vec3, BodyId, Isometry, Vec3};
use rubble_debris::DebrisField;
use rubble_vehicles::{Vehicle, VehicleController};
use rubble_viz::{draw_list, DrawItem, HudStats};
use rubble_world::{collidable_flag, SolverSettings, World, WorldBuilder};
use tracing::{info, warn};

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::input::FrameInput;
use crate::stepper::{FixedStepper, FrameReport};

/// Owns the world, the car, the debris and the random stream.
pub struct Sandbox {
    cfg: SandboxConfig,
    seed: u64,
    world: World,
    ground: BodyId,
    controller: VehicleController,
    debris: DebrisField,
    rng: StdRng,
    stepper: FixedStepper,
    last: FrameReport,
    last_dt: f64,
    frames: u64,
}

fn clock_seed() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0)
}

impl Sandbox {
    /// Validates `cfg`, then builds ground, car and debris in that order.
    pub fn new(cfg: SandboxConfig) -> Result<Self, SandboxError> {
        cfg.validate()?;
        let seed = cfg.seed.unwrap_or_else(clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let n = cfg.debris.count as usize;
        let mut world = WorldBuilder::new()
            .with_capacity(n + 6, 3 * n + 6)
            .gravity(cfg.gravity_vec())
            .auto_disable(cfg.sleep.into())
            .solver(SolverSettings { iterations: cfg.solver_iterations, ..Default::default() })
            .build();
        world.set_debug(cfg.debug);

        let half = Vec3::from_array(cfg.ground_half_extents);
        let (ground, _) = world.add_static_box(Isometry::from_pos(vec3(0.0, -half.y, 0.0)), half);

        let vehicle = Vehicle::spawn(&mut world, cfg.vehicle);
        let controller = VehicleController::new(vehicle, cfg.actuation, cfg.flip, cfg.max_accel_force, cfg.steer_gain);
        let debris = DebrisField::spawn(&mut world, cfg.debris, &mut rng);

        info!(seed, bodies = world.num_bodies(), geoms = world.geoms().len(), "sandbox ready");
        Ok(Self {
            stepper: FixedStepper::new(cfg.phys_slice, cfg.max_steps),
            cfg,
            seed,
            world,
            ground,
            controller,
            debris,
            rng,
            last: FrameReport::default(),
            last_dt: 0.0,
            frames: 0,
        })
    }

    /// One rendered frame: flip watchdog, driver input, anti-sway toggle,
    /// debris field and recycling, then as many fixed ticks as `frame_dt` pays for.
    pub fn frame(&mut self, frame_dt: f64, input: &FrameInput) -> FrameReport {
        self.controller.check_flip(&mut self.world);
        self.controller.update(&mut self.world, &input.driver);
        if input.toggle_anti_sway {
            let on = self.controller.toggle_anti_sway(&mut self.world);
            info!(on, "anti-sway toggled");
        }
        if input.impulse {
            self.debris.apply_impulse_field(&mut self.world, &mut self.rng);
        }
        self.debris.recycle_fallen(&mut self.world, &mut self.rng);

        let world = &mut self.world;
        let report = self.stepper.advance(frame_dt, |h| {
            world.step(h, collidable_flag);
        });
        if report.capped {
            warn!(frame = self.frames, steps = report.steps, "step cap hit, dropping backlog");
        }
        self.last = report;
        self.last_dt = frame_dt;
        self.frames += 1;
        report
    }

    /// Diagnostics of the most recent frame.
    pub fn hud(&self) -> HudStats {
        let rot = self.world.body_pose(self.controller.vehicle.chassis).rot;
        let fps = if self.last_dt > 0.0 { (1.0 / self.last_dt).round() as u32 } else { 0 };
        HudStats {
            fps,
            accel: self.controller.actuation.accel,
            steer: self.controller.actuation.steer,
            anti_sway: self.controller.anti_sway(),
            steps: self.last.steps,
            capped: self.last.capped,
            phys_time: self.last.phys_time.as_secs_f64(),
            leftover: self.last.leftover,
            frame_time: self.last_dt,
            objects: self.debris.len() as u32,
            roll: roll_of(rot),
            mph: self.controller.vehicle.speed_mph(&self.world),
        }
    }

    pub fn draw_list(&self) -> Vec<DrawItem> { draw_list(&self.world) }

    #[inline] pub fn config(&self) -> &SandboxConfig { &self.cfg }
    #[inline] pub fn seed(&self) -> u64 { self.seed }
    #[inline] pub fn world(&self) -> &World { &self.world }
    #[inline] pub fn world_mut(&mut self) -> &mut World { &mut self.world }
    #[inline] pub fn ground(&self) -> BodyId { self.ground }
    #[inline] pub fn controller(&self) -> &VehicleController { &self.controller }
    #[inline] pub fn debris(&self) -> &DebrisField { &self.debris }
    #[inline] pub fn frames(&self) -> u64 { self.frames }
    #[inline] pub fn last_report(&self) -> FrameReport { self.last }

    /// Fingerprint of every body state; equal seeds and inputs give equal digests.
    pub fn digest(&self) -> [u8; 32] { self.world.state_digest() }
}
