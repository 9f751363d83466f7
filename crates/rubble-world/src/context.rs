use rubble_articulation::Joints;
use rubble_collision::{collide, ContactBuffer, GeomView, SurfaceParams};
use rubble_core::{BodyId, GeomId};
use rubble_dynamics::Bodies;
use crate::contact::{ContactConstraint, ContactGroup};
use crate::geometry::Geometry;

/// Why a candidate pair produced no contacts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PairFilter {
    SameBody,
    Jointed,
    NotCollidable,
    Inactive,
}

/// Everything the near-phase needs for one collision pass, passed by reference.
/// `collidable` decides per geometry whether it takes part at all.
pub struct CollisionContext<'w, F> {
    pub bodies: &'w Bodies,
    pub joints: &'w Joints,
    pub geoms: &'w [Geometry],
    pub group: &'w mut ContactGroup,
    pub surface: SurfaceParams,
    collidable: F,
    buffer: ContactBuffer,
    to_wake: Vec<BodyId>,
}

impl<'w, F> CollisionContext<'w, F>
where
    F: Fn(GeomId, &Geometry) -> bool,
{
    pub fn new(
        bodies: &'w Bodies,
        joints: &'w Joints,
        geoms: &'w [Geometry],
        group: &'w mut ContactGroup,
        surface: SurfaceParams,
        collidable: F,
    ) -> Self {
        Self { bodies, joints, geoms, group, surface, collidable, buffer: ContactBuffer::new(), to_wake: Vec::new() }
    }

    /// Applies the exclusion rules in order; `None` means the pair is tested.
    pub fn filter(&self, o1: GeomId, o2: GeomId) -> Option<PairFilter> {
        let (g1, g2) = (&self.geoms[o1.index()], &self.geoms[o2.index()]);
        let (b1, b2) = (g1.body, g2.body);
        if b1 == b2 { return Some(PairFilter::SameBody); }
        if self.joints.are_connected(b1, b2) { return Some(PairFilter::Jointed); }
        if !(self.collidable)(o1, g1) || !(self.collidable)(o2, g2) {
            return Some(PairFilter::NotCollidable);
        }
        if !self.bodies.is_active(b1) && !self.bodies.is_active(b2) {
            return Some(PairFilter::Inactive);
        }
        None
    }

    /// Near callback: filters the pair, computes up to `MAX_CONTACTS` points and
    /// pushes one constraint per point. Returns the number of constraints added.
    pub fn near(&mut self, o1: GeomId, o2: GeomId) -> usize {
        if self.filter(o1, o2).is_some() { return 0; }
        let (geoms, bodies) = (self.geoms, self.bodies);
        let (g1, g2) = (&geoms[o1.index()], &geoms[o2.index()]);
        let v1 = GeomView { shape: g1.shape, pose: g1.world_pose(&bodies.pose(g1.body)) };
        let v2 = GeomView { shape: g2.shape, pose: g2.world_pose(&bodies.pose(g2.body)) };

        self.buffer.clear();
        let n = collide(&v1, &v2, &mut self.buffer);
        if n == 0 { return 0; }

        for c in self.buffer.as_slice() {
            self.group.push(ContactConstraint {
                body1: g1.body,
                body2: g2.body,
                geom1: o1,
                geom2: o2,
                contact: *c,
                surface: self.surface,
            });
        }

        // an awake body touching a sleeping one wakes it
        for (a, b) in [(g1.body, g2.body), (g2.body, g1.body)] {
            if bodies.is_active(a) && bodies.is_dynamic(b) && !bodies.is_awake(b) {
                self.to_wake.push(b);
            }
        }
        n
    }

    /// Bodies that must be woken before the next integration.
    pub fn into_wake_list(self) -> Vec<BodyId> { self.to_wake }
}
