use rubble_core::types::{Mat3, Vec3};
use rubble_core::{BodyId, Scalar};
use crate::bodies::Bodies;

/// Impulse limits of a row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RowBound {
    Free,
    Range { lo: Scalar, hi: Scalar },
    /// Friction: |λ| ≤ μ · λ of the row at index `normal`.
    Friction { normal: usize, mu: Scalar },
}

/// One scalar velocity constraint between two bodies:
/// `J v = rhs`, softened by `cfm` and limited by `bound`.
/// `cfm` is in impulse units, i.e. the world CFM divided by the tick length.
#[derive(Copy, Clone, Debug)]
pub struct Row {
    pub a: BodyId,
    pub b: BodyId,
    pub lin_a: Vec3,
    pub ang_a: Vec3,
    pub lin_b: Vec3,
    pub ang_b: Vec3,
    pub rhs: Scalar,
    pub cfm: Scalar,
    pub bound: RowBound,
    pub lambda: Scalar,
    // prepared
    m_lin_a: Vec3,
    m_ang_a: Vec3,
    m_lin_b: Vec3,
    m_ang_b: Vec3,
    inv_k: Scalar,
}

impl Row {
    pub fn new(a: BodyId, lin_a: Vec3, ang_a: Vec3, b: BodyId, lin_b: Vec3, ang_b: Vec3) -> Self {
        Self {
            a, b, lin_a, ang_a, lin_b, ang_b,
            rhs: 0.0, cfm: 0.0, bound: RowBound::Free, lambda: 0.0,
            m_lin_a: Vec3::ZERO, m_ang_a: Vec3::ZERO, m_lin_b: Vec3::ZERO, m_ang_b: Vec3::ZERO,
            inv_k: 0.0,
        }
    }

    /// Linear constraint at world points: relative velocity of `pa` (on a)
    /// with respect to `pb` (on b) along `dir`.
    pub fn linear(bodies: &Bodies, a: BodyId, pa: Vec3, b: BodyId, pb: Vec3, dir: Vec3) -> Self {
        let ra = pa - bodies.pose(a).pos;
        let rb = pb - bodies.pose(b).pos;
        Self::new(a, dir, ra.cross(dir), b, -dir, -rb.cross(dir))
    }

    /// Relative angular velocity ω_b − ω_a along `axis`.
    pub fn angular(a: BodyId, b: BodyId, axis: Vec3) -> Self {
        Self::new(a, Vec3::ZERO, -axis, b, Vec3::ZERO, axis)
    }

    pub fn with_rhs(mut self, rhs: Scalar) -> Self { self.rhs = rhs; self }
    pub fn with_cfm(mut self, cfm: Scalar) -> Self { self.cfm = cfm; self }
    pub fn with_bound(mut self, bound: RowBound) -> Self { self.bound = bound; self }

    /// Current J v.
    pub fn velocity(&self, bodies: &Bodies) -> Scalar {
        let (a, b) = (self.a.index(), self.b.index());
        self.lin_a.dot(bodies.linvel[a]) + self.ang_a.dot(bodies.angvel[a])
            + self.lin_b.dot(bodies.linvel[b]) + self.ang_b.dot(bodies.angvel[b])
    }

    fn prepare(&mut self, bodies: &Bodies) {
        let (a, b) = (self.a.index(), self.b.index());
        let ima = bodies.solver_inv_mass(a);
        let imb = bodies.solver_inv_mass(b);
        let iia = if ima > 0.0 { bodies.inv_inertia_world(self.a) } else { Mat3::ZERO };
        let iib = if imb > 0.0 { bodies.inv_inertia_world(self.b) } else { Mat3::ZERO };
        self.m_lin_a = self.lin_a * ima;
        self.m_ang_a = iia * self.ang_a;
        self.m_lin_b = self.lin_b * imb;
        self.m_ang_b = iib * self.ang_b;
        let k = self.lin_a.dot(self.m_lin_a) + self.ang_a.dot(self.m_ang_a)
            + self.lin_b.dot(self.m_lin_b) + self.ang_b.dot(self.m_ang_b)
            + self.cfm;
        self.inv_k = if k > 1e-12 { 1.0 / k } else { 0.0 };
        self.lambda = 0.0;
    }
}

/// Projected Gauss-Seidel over `rows`, writing velocities back into `bodies`.
/// Accumulated impulses start from zero every call.
pub fn solve_rows(rows: &mut [Row], bodies: &mut Bodies, iterations: u32) {
    for r in rows.iter_mut() { r.prepare(bodies); }

    for _ in 0..iterations {
        for i in 0..rows.len() {
            let (lo, hi) = match rows[i].bound {
                RowBound::Free => (Scalar::NEG_INFINITY, Scalar::INFINITY),
                RowBound::Range { lo, hi } => (lo, hi),
                RowBound::Friction { normal, mu } => {
                    let limit = mu * rows[normal].lambda;
                    (-limit, limit)
                }
            };
            let row = &mut rows[i];
            if row.inv_k == 0.0 { continue; }
            let jv = row.velocity(bodies);
            let delta = (row.rhs - jv - row.cfm * row.lambda) * row.inv_k;
            let new_lambda = (row.lambda + delta).clamp(lo, hi);
            let applied = new_lambda - row.lambda;
            row.lambda = new_lambda;

            let (a, b) = (row.a.index(), row.b.index());
            bodies.linvel[a] += row.m_lin_a * applied;
            bodies.angvel[a] += row.m_ang_a * applied;
            bodies.linvel[b] += row.m_lin_b * applied;
            bodies.angvel[b] += row.m_ang_b * applied;
        }
    }
}
