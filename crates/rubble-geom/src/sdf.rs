use rubble_core::types::Vec3;
use crate::shape::Shape;

/// Signed distance from a local point to a shape surface, with the outward
/// unit normal of the closest surface feature. Negative distance means inside.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceSample {
    pub dist: f32,
    pub normal: Vec3,
}

impl SurfaceSample {
    /// Closest point on the surface to the queried point.
    #[inline] pub fn closest_point(&self, p: Vec3) -> Vec3 { p - self.normal * self.dist }
}

#[inline]
fn sign(v: f32) -> f32 { if v < 0.0 { -1.0 } else { 1.0 } }

pub fn signed_distance(shape: &Shape, p: Vec3) -> SurfaceSample {
    match *shape {
        Shape::Sphere { r } => {
            let len = p.length();
            let normal = if len > 1e-6 { p / len } else { Vec3::Y };
            SurfaceSample { dist: len - r, normal }
        }
        Shape::Box { hx, hy, hz } => box_distance(Vec3::new(hx, hy, hz), p),
        Shape::Cylinder { r, hh } => cylinder_distance(r, hh, p),
    }
}

fn box_distance(he: Vec3, p: Vec3) -> SurfaceSample {
    let q = p.abs() - he;
    if q.max_element() > 0.0 {
        let o = q.max(Vec3::ZERO);
        let s = Vec3::new(sign(p.x), sign(p.y), sign(p.z));
        let dist = o.length();
        return SurfaceSample { dist, normal: (o * s) / dist };
    }
    // inside: push out through the nearest face
    let (axis, dist) = if q.x >= q.y && q.x >= q.z {
        (Vec3::X * sign(p.x), q.x)
    } else if q.y >= q.z {
        (Vec3::Y * sign(p.y), q.y)
    } else {
        (Vec3::Z * sign(p.z), q.z)
    };
    SurfaceSample { dist, normal: axis }
}

fn cylinder_distance(r: f32, hh: f32, p: Vec3) -> SurfaceSample {
    let rho = (p.x * p.x + p.y * p.y).sqrt();
    let radial = if rho > 1e-6 { Vec3::new(p.x / rho, p.y / rho, 0.0) } else { Vec3::X };
    let cap = Vec3::Z * sign(p.z);
    let dr = rho - r;
    let dz = p.z.abs() - hh;

    if dr > 0.0 && dz > 0.0 {
        // rim edge
        let dist = (dr * dr + dz * dz).sqrt();
        return SurfaceSample { dist, normal: (radial * dr + cap * dz) / dist };
    }
    if dr > dz {
        SurfaceSample { dist: dr, normal: radial }
    } else {
        SurfaceSample { dist: dz, normal: cap }
    }
}
