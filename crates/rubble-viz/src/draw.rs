use glam::{Mat4, Vec3 as GVec3};
use rubble_core::{BodyId, GeomId, Isometry};
use rubble_geom::Shape;
use rubble_world::World;

/// One drawable: world pose plus the shape it should be drawn as.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub body: BodyId,
    pub geom: GeomId,
    pub shape: Shape,
    pub pose: Isometry,
    /// Static scenery vs. simulated body; renderers tint them differently.
    pub dynamic: bool,
}

impl DrawItem {
    /// Model matrix for a unit primitive: unit cube (±0.5), unit sphere
    /// (radius 1) or unit cylinder (radius 1, length 1 along Z).
    pub fn model_matrix(&self) -> Mat4 {
        let scale = match self.shape {
            Shape::Sphere { r } => GVec3::splat(r),
            Shape::Box { hx, hy, hz } => GVec3::new(hx, hy, hz) * 2.0,
            Shape::Cylinder { r, hh } => GVec3::new(r, r, hh * 2.0),
        };
        Mat4::from_scale_rotation_translation(scale, self.pose.rot, self.pose.pos.into())
    }

    /// Column-major rows the way instanced vertex buffers expect them.
    pub fn instance_cols(&self) -> [[f32; 4]; 4] { self.model_matrix().to_cols_array_2d() }
}

/// Snapshot of every geometry in id order.
pub fn draw_list(world: &World) -> Vec<DrawItem> {
    let mut out = Vec::with_capacity(world.geoms().len());
    for (i, g) in world.geoms().iter().enumerate() {
        out.push(DrawItem {
            body: g.body,
            geom: GeomId(i as u32),
            shape: g.shape,
            pose: g.world_pose(&world.body_pose(g.body)),
            dynamic: world.bodies().is_dynamic(g.body),
        });
    }
    out
}
