use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, SeedableRng};
use rubble_controllers::{roll_of, DriverInput};
use rubble_core::{vec3, Isometry, Quat, Vec3};
use rubble_debris::{DebrisField, DebrisParams};
use rubble_sim::{run, FrameInput, Host, Sandbox, SandboxConfig};
use rubble_vehicles::WheelSlot;
use rubble_viz::{DrawItem, HudLine};
use rubble_world::{collidable_flag, WorldBuilder};

const FRAME: f64 = 1.0 / 60.0;

fn small(seed: u64) -> SandboxConfig {
    let mut cfg = SandboxConfig { seed: Some(seed), ..Default::default() };
    cfg.debris.count = 20;
    cfg
}

#[test]
fn three_hundred_bodies_come_to_rest() {
    let mut w = WorldBuilder::new().with_capacity(301, 900).build();
    w.add_static_box(Isometry::from_pos(vec3(0.0, -5.0, 0.0)), vec3(40.0, 5.0, 40.0));
    let mut rng = StdRng::seed_from_u64(2024);
    let mut field = DebrisField::spawn(&mut w, DebrisParams::default(), &mut rng);
    assert_eq!(field.len(), 300);

    // the top layer starts 33 m up; ten seconds leaves it several to settle
    let mut recycled = 0;
    for _ in 0..2400 {
        w.step(1.0 / 240.0, collidable_flag);
        recycled += field.recycle_fallen(&mut w, &mut rng);
    }
    // the spawn area lies well inside the ground slab
    assert_eq!(recycled, 0);

    // refresh bounds and contacts for every pair, sleeping or not
    for d in field.bodies() {
        w.wake(d.body);
    }
    w.collide(collidable_flag);
    let deepest = w.contacts().iter().map(|c| c.contact.depth).fold(0.0f32, f32::max);
    assert!(deepest < 0.025, "deepest overlap {deepest}");
    w.empty_contacts();

    let mut bounds = vec![(Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)); w.bodies().len()];
    for g in w.geoms() {
        let b = &mut bounds[g.body.index()];
        *b = (b.0.min(g.aabb.min), b.1.max(g.aabb.max));
    }

    for d in field.bodies() {
        let pose = w.body_pose(d.body);
        let vel = w.body_vel(d.body);
        let (lo, hi) = bounds[d.body.index()];
        assert!(lo.y > -0.02, "{} sunk into the ground, lowest point {}", d.body, lo.y);
        assert!(vel.lin.y.abs() < 0.1, "{} still moving {vel:?}", d.body);

        // either still, or rolling on its lowest point without slipping
        let slip = vel.lin + vel.ang.cross(vec3(0.0, lo.y - pose.pos.y, 0.0));
        let still = vel.lin.length() < 0.05 && vel.ang.length() < 0.1;
        assert!(still || slip.length() < 0.05, "{} neither resting nor rolling: {vel:?}", d.body);

        if lo.y > 0.02 {
            // off the ground, so something under it has to reach up to its lowest point
            let supported = field.bodies().iter().filter(|o| o.body != d.body).any(|o| {
                let (olo, ohi) = bounds[o.body.index()];
                olo.x <= hi.x && ohi.x >= lo.x && olo.z <= hi.z && ohi.z >= lo.z
                    && olo.y < lo.y && ohi.y >= lo.y - 0.02
            });
            assert!(supported, "{} floats at {:?} with nothing below", d.body, pose.pos);
        }
    }
}

#[test]
fn same_seed_same_run() {
    let mut a = Sandbox::new(small(5)).unwrap();
    let mut b = Sandbox::new(small(5)).unwrap();
    let gas = FrameInput { driver: DriverInput { accelerate: true, ..Default::default() }, impulse: true, ..Default::default() };
    for i in 0..90 {
        let input = if i % 3 == 0 { gas } else { FrameInput::default() };
        a.frame(FRAME, &input);
        b.frame(FRAME, &input);
    }
    assert_eq!(a.digest(), b.digest());

    let mut c = Sandbox::new(small(6)).unwrap();
    c.frame(FRAME, &FrameInput::default());
    assert_ne!(a.digest(), c.digest());
}

#[test]
fn rejects_invalid_config() {
    let mut cfg = small(1);
    cfg.debris.count = 0;
    assert!(Sandbox::new(cfg).is_err());
}

#[test]
fn inverted_car_is_recovered_after_101_frames() {
    let mut s = Sandbox::new(small(9)).unwrap();
    let vehicle = s.controller().vehicle.clone();
    let chassis = vehicle.chassis;
    let mut pose = s.world().body_pose(chassis);
    pose.rot = Quat::from_rotation_x(core::f32::consts::PI);
    s.world_mut().set_body_pose(chassis, pose);
    for (slot, wheel) in WheelSlot::ALL.into_iter().zip(vehicle.wheels) {
        let at = Isometry { pos: pose.transform_point(vehicle.params.anchor(slot)), rot: pose.rot };
        s.world_mut().set_body_pose(wheel, at);
    }

    for _ in 0..101 {
        s.frame(FRAME, &FrameInput::default());
    }
    // the 101st observation happened at the start of the last frame
    let rot = s.world().body_pose(chassis).rot;
    assert!(roll_of(rot).abs() < 0.5, "roll {}", roll_of(rot));
    assert_eq!(s.controller().flip.inverted_count(), 0);
}

#[test]
fn fallen_debris_returns_to_the_drop_zone() {
    let mut s = Sandbox::new(small(3)).unwrap();
    let body = s.debris().bodies()[4].body;
    s.world_mut().set_body_pose(body, Isometry::from_pos(vec3(60.0, -20.0, 0.0)));
    s.frame(0.0, &FrameInput::default());
    let p = s.world().body_pose(body).pos;
    assert!(p.y >= 13.0 && p.y < 14.0);
    assert!(p.x >= -5.0 && p.x < 5.0);
    assert_eq!(s.debris().bodies()[4].recycled, 1);
}

#[test]
fn anti_sway_toggle_shows_on_hud() {
    let mut s = Sandbox::new(small(4)).unwrap();
    s.frame(FRAME, &FrameInput { toggle_anti_sway: true, ..Default::default() });
    let hud = s.hud();
    assert!(!hud.anti_sway);
    assert_eq!(hud.objects, 20);
    assert_eq!(hud.fps, 60);
    assert!(hud.steps >= 3 && hud.steps <= 4);
    assert!(!hud.capped);
}

#[test]
fn stall_hits_the_cap() {
    let mut s = Sandbox::new(small(4)).unwrap();
    let r = s.frame(0.5, &FrameInput::default());
    assert!(r.capped);
    assert_eq!(r.steps, 7);
    assert_abs_diff_eq!(r.leftover, 0.0);
    assert_eq!(s.world().tick_index(), 7);
}

struct Scripted {
    frames_left: u32,
    presented: Vec<usize>,
}

impl Host for Scripted {
    fn close_requested(&mut self) -> bool { self.frames_left == 0 }
    fn frame_time(&mut self) -> f64 {
        self.frames_left -= 1;
        FRAME
    }
    fn poll_input(&mut self) -> FrameInput { FrameInput::default() }
    fn present(&mut self, draw: &[DrawItem], hud: &[HudLine]) {
        assert!(!hud.is_empty());
        self.presented.push(draw.len());
    }
}

#[test]
fn host_loop_runs_until_close() {
    let mut s = Sandbox::new(small(8)).unwrap();
    let mut host = Scripted { frames_left: 5, presented: Vec::new() };
    assert_eq!(run(&mut s, &mut host), 5);
    assert_eq!(s.frames(), 5);
    // ground, chassis, four wheels, then debris geometry
    let geoms = s.world().geoms().len();
    assert!(host.presented.iter().all(|&n| n == geoms));
    assert!(geoms >= 6 + 20);
    assert!(!s.world().bodies().is_dynamic(s.ground()));
}
