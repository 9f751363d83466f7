use rubble_geom::Aabb;

#[derive(Copy, Clone)]
struct Elem { min: f32, idx: usize }

/// 1D sweep along X with full AABB overlap. Keeps its scratch buffers between
/// calls; pair output is sorted so the narrow phase visits pairs in a stable order.
#[derive(Default)]
pub struct SweepAndPrune {
    elems: Vec<Elem>,
    active: Vec<usize>,
}

impl SweepAndPrune {
    pub fn new() -> Self { Self::default() }

    /// Writes every overlapping `(i, j)` with `i < j` into `out` (cleared first).
    /// Boxes with non-finite bounds are skipped.
    pub fn pairs(&mut self, aabbs: &[Aabb], out: &mut Vec<(usize, usize)>) {
        out.clear();
        self.elems.clear();
        self.active.clear();

        for (i, a) in aabbs.iter().enumerate() {
            if !(a.min.is_finite() && a.max.is_finite()) { continue; }
            self.elems.push(Elem { min: a.min.x, idx: i });
        }
        self.elems.sort_by(|a, b| a.min.total_cmp(&b.min).then(a.idx.cmp(&b.idx)));

        for e in &self.elems {
            self.active.retain(|&j| aabbs[j].max.x >= e.min);
            for &j in &self.active {
                if aabbs[j].overlaps(&aabbs[e.idx]) {
                    out.push(if j < e.idx { (j, e.idx) } else { (e.idx, j) });
                }
            }
            self.active.push(e.idx);
        }
        out.sort_unstable();
    }
}
