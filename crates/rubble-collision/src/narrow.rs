use rubble_core::types::{Isometry, Mat3, Vec3};
use rubble_geom::{feature_points, signed_distance, Shape, MAX_FEATURE_POINTS};
use crate::buffer::ContactBuffer;
use crate::surface::ContactGeom;

/// Contacts closer than this (squared) are merged.
const MERGE_DIST_SQ: f32 = 1e-4;
/// An edge axis must beat the best face axis by this factor to be chosen.
const EDGE_AXIS_BIAS: f32 = 0.95;
const GOLDEN_ITERS: usize = 32;
/// Relative axial component above which a cylinder's support moves to a cap.
const AXIAL_TOL: f32 = 0.05;

/// A geometry placed in world space.
#[derive(Copy, Clone, Debug)]
pub struct GeomView {
    pub shape: Shape,
    pub pose: Isometry,
}

/// Computes contacts between `g1` and `g2`, appending to `out` until it is
/// full. Normals point from `g2` into `g1`. Returns the number of points added.
pub fn collide(g1: &GeomView, g2: &GeomView, out: &mut ContactBuffer) -> usize {
    let before = out.len();
    let reach = g1.shape.bounding_radius() + g2.shape.bounding_radius();
    if (g1.pose.pos - g2.pose.pos).length_squared() > reach * reach {
        return 0;
    }
    match (g1.shape, g2.shape) {
        (Shape::Sphere { r: r1 }, Shape::Sphere { r: r2 }) => {
            sphere_sphere(g1.pose.pos, r1, g2.pose.pos, r2, out)
        }
        (Shape::Sphere { r }, _) => sphere_solid(g1.pose.pos, r, g2, 1.0, out),
        (_, Shape::Sphere { r }) => sphere_solid(g2.pose.pos, r, g1, -1.0, out),
        (Shape::Box { hx, hy, hz }, Shape::Box { hx: ex, hy: ey, hz: ez }) => {
            let a = BoxFrame::new(g1, Vec3::new(hx, hy, hz));
            let b = BoxFrame::new(g2, Vec3::new(ex, ey, ez));
            box_box(&a, &b, out);
        }
        _ => {
            // cylinder sides first, then corners and rims of each shape
            if let Shape::Cylinder { r, hh } = g1.shape {
                cylinder_axis(g1, r, hh, g2, 1.0, before, out);
            }
            if let Shape::Cylinder { r, hh } = g2.shape {
                cylinder_axis(g2, r, hh, g1, -1.0, before, out);
            }
            sample_into(g1, g2, 1.0, out);
            sample_into(g2, g1, -1.0, out);
        }
    }
    out.len() - before
}

fn sphere_sphere(c1: Vec3, r1: f32, c2: Vec3, r2: f32, out: &mut ContactBuffer) {
    let d = c1 - c2;
    let len = d.length();
    if len >= r1 + r2 { return; }
    let normal = if len > 1e-6 { d / len } else { Vec3::Y };
    let depth = r1 + r2 - len;
    out.push(ContactGeom { pos: c2 + normal * (r2 - 0.5 * depth), normal, depth });
}

/// `sign` is +1 when the sphere is geometry 1.
fn sphere_solid(centre: Vec3, r: f32, solid: &GeomView, sign: f32, out: &mut ContactBuffer) {
    let local = solid.pose.inverse_transform_point(centre);
    let s = signed_distance(&solid.shape, local);
    if s.dist >= r { return; }
    let normal = solid.pose.transform_vector(s.normal);
    out.push(ContactGeom {
        pos: solid.pose.transform_point(s.closest_point(local)),
        normal: normal * sign,
        depth: r - s.dist,
    });
}

/// World-space box: rotation columns, centre and half extents.
struct BoxFrame {
    axes: Mat3,
    centre: Vec3,
    half: Vec3,
}

#[derive(Copy, Clone, Debug)]
enum SatAxis {
    Face1(usize),
    Face2(usize),
    Edge(usize, usize),
}

impl BoxFrame {
    fn new(g: &GeomView, half: Vec3) -> Self {
        Self { axes: Mat3::from_quat(g.pose.rot), centre: g.pose.pos, half }
    }

    #[inline]
    fn radius_along(&self, axis: Vec3) -> f32 {
        (0..3).map(|i| self.half[i] * self.axes.col(i).dot(axis).abs()).sum()
    }

    /// Midpoint of the edge parallel to axis `i` lying furthest along `toward`.
    fn edge_centre(&self, i: usize, toward: Vec3) -> Vec3 {
        let mut p = self.centre;
        for m in (0..3).filter(|&m| m != i) {
            let a = self.axes.col(m);
            p += a * (self.half[m] * a.dot(toward).signum());
        }
        p
    }
}

/// Separating-axis test over the 15 box axes. A face axis yields the incident
/// face clipped against the reference face; an edge pair yields one point.
fn box_box(a: &BoxFrame, b: &BoxFrame, out: &mut ContactBuffer) {
    let d = b.centre - a.centre;
    let overlap = |axis: Vec3| a.radius_along(axis) + b.radius_along(axis) - d.dot(axis).abs();

    let mut best: Option<(f32, Vec3, SatAxis)> = None;
    for i in 0..3 {
        for (axis, which) in [(a.axes.col(i), SatAxis::Face1(i)), (b.axes.col(i), SatAxis::Face2(i))] {
            let o = overlap(axis);
            if o < 0.0 { return; }
            if best.map_or(true, |(bo, _, _)| o < bo) { best = Some((o, axis, which)); }
        }
    }
    for i in 0..3 {
        for j in 0..3 {
            let axis = a.axes.col(i).cross(b.axes.col(j));
            let len = axis.length();
            if len < 1e-5 { continue; } // parallel edges, covered by the face axes
            let axis = axis / len;
            let o = overlap(axis);
            if o < 0.0 { return; }
            if best.map_or(true, |(bo, _, _)| o < bo * EDGE_AXIS_BIAS) {
                best = Some((o, axis, SatAxis::Edge(i, j)));
            }
        }
    }
    let Some((depth, axis, which)) = best else { return };
    // from box 2 into box 1
    let normal = if axis.dot(d) > 0.0 { -axis } else { axis };

    match which {
        SatAxis::Face1(i) => clipped_face(a, i, -normal, b, normal, out),
        SatAxis::Face2(j) => clipped_face(b, j, normal, a, normal, out),
        SatAxis::Edge(i, j) => {
            let pa = a.edge_centre(i, -normal);
            let pb = b.edge_centre(j, normal);
            let (ua, ub) = (a.axes.col(i), b.axes.col(j));
            let r = pa - pb;
            let (k, c, f) = (ua.dot(ub), ua.dot(r), ub.dot(r));
            let denom = (1.0 - k * k).max(1e-6);
            let s = ((k * f - c) / denom).clamp(-a.half[i], a.half[i]);
            let t = (f + s * k).clamp(-b.half[j], b.half[j]);
            let pos = 0.5 * (pa + ua * s + pb + ub * t);
            out.push(ContactGeom { pos, normal, depth });
        }
    }
}

/// Clips the face of `incident` most opposed to `outward` against the side
/// planes of `reference`'s face `face`, keeping the points below that face.
fn clipped_face(
    reference: &BoxFrame,
    face: usize,
    outward: Vec3,
    incident: &BoxFrame,
    normal: Vec3,
    out: &mut ContactBuffer,
) {
    let face_centre = reference.centre + outward * reference.half[face];

    let k = (0..3)
        .max_by(|&p, &q| {
            let dp = incident.axes.col(p).dot(outward).abs();
            let dq = incident.axes.col(q).dot(outward).abs();
            dp.total_cmp(&dq)
        })
        .unwrap_or(0);
    let ak = incident.axes.col(k);
    let ic = incident.centre - ak * (incident.half[k] * ak.dot(outward).signum());
    let (k1, k2) = ((k + 1) % 3, (k + 2) % 3);
    let u1 = incident.axes.col(k1) * incident.half[k1];
    let u2 = incident.axes.col(k2) * incident.half[k2];

    let mut poly = [Vec3::ZERO; 8];
    poly[..4].copy_from_slice(&[ic + u1 + u2, ic - u1 + u2, ic - u1 - u2, ic + u1 - u2]);
    let mut n = 4;
    let mut next = [Vec3::ZERO; 8];
    for m in [(face + 1) % 3, (face + 2) % 3] {
        let axis = reference.axes.col(m);
        let mid = axis.dot(reference.centre);
        for (dir, limit) in [(axis, mid + reference.half[m]), (-axis, reference.half[m] - mid)] {
            n = clip_polygon(&poly[..n], dir, limit, &mut next);
            poly = next;
            if n == 0 { return; }
        }
    }

    for p in &poly[..n] {
        let depth = outward.dot(face_centre - *p);
        if depth > 0.0 {
            out.push(ContactGeom { pos: *p + outward * (0.5 * depth), normal, depth });
        }
    }
}

/// Sutherland-Hodgman step keeping the part of `poly` with `dir·p <= limit`.
fn clip_polygon(poly: &[Vec3], dir: Vec3, limit: f32, out: &mut [Vec3; 8]) -> usize {
    let mut n = 0;
    for (k, &p) in poly.iter().enumerate() {
        let q = poly[(k + 1) % poly.len()];
        let (dp, dq) = (dir.dot(p) - limit, dir.dot(q) - limit);
        if dp <= 0.0 && n < out.len() {
            out[n] = p;
            n += 1;
        }
        if (dp <= 0.0) != (dq <= 0.0) && n < out.len() {
            out[n] = p + (q - p) * (dp / (dp - dq));
            n += 1;
        }
    }
    n
}

/// Contacts of a cylinder's side or caps against `other`, taken from the
/// points of its axis segment nearest to `other` and from both segment ends.
/// `sign` is +1 when the cylinder is geometry 1.
fn cylinder_axis(
    cyl: &GeomView,
    r: f32,
    hh: f32,
    other: &GeomView,
    sign: f32,
    from: usize,
    out: &mut ContactBuffer,
) {
    let sample = |z: f32| {
        let local = other.pose.inverse_transform_point(cyl.pose.transform_point(Vec3::new(0.0, 0.0, z)));
        (local, signed_distance(&other.shape, local))
    };
    let nearest = golden_min(|z| sample(z).1.dist, -hh, hh);

    for z in [nearest, -hh, hh] {
        if out.is_full() { return; }
        let (local, s) = sample(z);
        // every cylinder point lies within r of the axis segment
        if s.dist >= r { continue; }
        let n = other.pose.transform_vector(s.normal);
        let surface = other.pose.transform_point(s.closest_point(local));
        let dir = cyl.pose.inverse_transform_vector(-n);
        let tip = cyl.pose.transform_point(cylinder_support(r, hh, z, dir));
        let depth = n.dot(surface - tip);
        if depth <= 0.0 { continue; }
        let c = ContactGeom { pos: tip + n * (0.5 * depth), normal: n * sign, depth };
        if !out.as_slice()[from..].iter().any(|p| (p.pos - c.pos).length_squared() < MERGE_DIST_SQ) {
            out.push(c);
        }
    }
}

/// Deepest cylinder point along local direction `d`. When `d` is close to
/// perpendicular to the axis the point stays on the side line at height `z`.
fn cylinder_support(r: f32, hh: f32, z: f32, d: Vec3) -> Vec3 {
    let len = d.length();
    let radial = Vec3::new(d.x, d.y, 0.0);
    let rl = radial.length();
    let side = if rl > 1e-6 * len { radial * (r / rl) } else { Vec3::ZERO };
    let height = if d.z.abs() > AXIAL_TOL * len { hh.copysign(d.z) } else { z };
    side + Vec3::new(0.0, 0.0, height)
}

/// Minimum of a convex function on `[lo, hi]`.
fn golden_min(f: impl Fn(f32) -> f32, mut lo: f32, mut hi: f32) -> f32 {
    const INV_PHI: f32 = 0.618_034;
    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let (mut f1, mut f2) = (f(x1), f(x2));
    for _ in 0..GOLDEN_ITERS {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = f(x2);
        }
    }
    0.5 * (lo + hi)
}

/// Tests the corner or rim points of `feature` against the distance field of `field`.
fn sample_into(feature: &GeomView, field: &GeomView, sign: f32, out: &mut ContactBuffer) {
    let mut pts = [Vec3::ZERO; MAX_FEATURE_POINTS];
    let n = feature_points(&feature.shape, &mut pts);
    for p in &pts[..n] {
        if out.is_full() { return; }
        let world = feature.pose.transform_point(*p);
        let s = signed_distance(&field.shape, field.pose.inverse_transform_point(world));
        if s.dist < 0.0 {
            out.push(ContactGeom {
                pos: world,
                normal: field.pose.transform_vector(s.normal) * sign,
                depth: -s.dist,
            });
        }
    }
}
