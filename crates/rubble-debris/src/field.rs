use rand::Rng;
use rubble_core::{random_rotation, uniform, vec3, BodyId, Isometry, Scalar, Velocity};
use rubble_dynamics::BodyDesc;
use rubble_world::World;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::shape::DebrisShape;

/// Spawn volume, impulse field and recycling constants.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisParams {
    pub count: u32,
    /// Horizontal spawn range for x and z, `[lo, hi)`.
    pub spawn_xz: [Scalar; 2],
    pub spawn_base_y: Scalar,
    /// Bodies per spawn layer; each layer starts one metre higher.
    pub layer_size: u32,
    /// Bodies below this height are recycled.
    pub floor_y: Scalar,
    pub respawn_xz: [Scalar; 2],
    pub respawn_y: [Scalar; 2],
    /// The field skips bodies already rising faster than this.
    pub impulse_max_vy: Scalar,
    /// The field skips bodies above this height.
    pub impulse_max_y: Scalar,
}

impl Default for DebrisParams {
    fn default() -> Self {
        Self {
            count: 300,
            spawn_xz: [-5.0, 35.0],
            spawn_base_y: 4.0,
            layer_size: 10,
            floor_y: -10.0,
            respawn_xz: [-5.0, 5.0],
            respawn_y: [13.0, 14.0],
            impulse_max_vy: 10.0,
            impulse_max_y: 10.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DebrisBody {
    pub body: BodyId,
    pub shape: DebrisShape,
    /// Times this body fell off and was put back.
    pub recycled: u32,
}

/// The debris population. Slot `i` keeps its body for the whole run.
#[derive(Clone, Debug)]
pub struct DebrisField {
    pub params: DebrisParams,
    bodies: Vec<DebrisBody>,
}

impl DebrisField {
    /// Drops `params.count` random bodies in stacked layers above the arena.
    pub fn spawn<R: Rng + ?Sized>(world: &mut World, params: DebrisParams, rng: &mut R) -> Self {
        let mut bodies = Vec::with_capacity(params.count as usize);
        let layer = params.layer_size.max(1);
        let mut kinds = [0u32; 4];
        for i in 0..params.count {
            let shape = DebrisShape::sample(rng);
            let [lo, hi] = params.spawn_xz;
            let x = uniform(rng, lo, hi);
            let z = uniform(rng, lo, hi);
            let y = params.spawn_base_y + (i / layer) as Scalar;
            let pose = Isometry { pos: vec3(x, y, z), rot: random_rotation(rng) };

            let body = world.add_body(BodyDesc::dynamic(pose, shape.mass_props()));
            for (g, offset) in shape.geometries() {
                world.add_geom_with_offset(body, g, offset);
            }
            kinds[match shape {
                DebrisShape::Box { .. } => 0,
                DebrisShape::Sphere { .. } => 1,
                DebrisShape::Cylinder { .. } => 2,
                DebrisShape::Compound { .. } => 3,
            }] += 1;
            bodies.push(DebrisBody { body, shape, recycled: 0 });
        }
        info!(
            count = params.count,
            boxes = kinds[0],
            spheres = kinds[1],
            cylinders = kinds[2],
            compounds = kinds[3],
            "debris spawned"
        );
        Self { params, bodies }
    }

    #[inline] pub fn len(&self) -> usize { self.bodies.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.bodies.is_empty() }
    #[inline] pub fn bodies(&self) -> &[DebrisBody] { &self.bodies }

    /// Kicks every low, not-yet-rising body upward. Later slots get a
    /// slightly stronger push. Forces last for the next tick only.
    pub fn apply_impulse_field<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) -> usize {
        let p = self.bodies.len().max(1) as Scalar;
        let mut kicked = 0;
        for (i, d) in self.bodies.iter().enumerate() {
            let pos = world.body_pose(d.body).pos;
            let vel = world.body_vel(d.body).lin;
            if vel.y >= self.params.impulse_max_vy || pos.y >= self.params.impulse_max_y { continue; }

            world.wake(d.body);
            let f = (6.0 + 4.0 * i as Scalar / p) * world.body_mass(d.body).mass;
            let force = vec3(uniform(rng, -f, f), 10.0 * f, uniform(rng, -f, f));
            world.add_force(d.body, force);
            kicked += 1;
        }
        debug!(kicked, "impulse field");
        kicked
    }

    /// Puts every body below the floor back above the centre of the arena,
    /// at rest and awake. Returns how many were moved.
    pub fn recycle_fallen<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) -> usize {
        let mut moved = 0;
        for d in &mut self.bodies {
            let pose = world.body_pose(d.body);
            if pose.pos.y >= self.params.floor_y { continue; }

            let [lo, hi] = self.params.respawn_xz;
            let x = uniform(rng, lo, hi);
            let z = uniform(rng, lo, hi);
            let y = uniform(rng, self.params.respawn_y[0], self.params.respawn_y[1]);
            world.set_body_pose(d.body, Isometry { pos: vec3(x, y, z), rot: pose.rot });
            world.set_body_vel(d.body, Velocity::ZERO);
            d.recycled += 1;
            moved += 1;
            debug!(body = %d.body, times = d.recycled, "debris recycled");
        }
        moved
    }
}
