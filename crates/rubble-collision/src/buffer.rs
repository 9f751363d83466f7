use crate::surface::ContactGeom;

/// Upper bound on contact points generated for one geometry pair.
pub const MAX_CONTACTS: usize = 8;

/// Fixed-capacity contact storage for one pair. Once full, further pushes are
/// dropped: the first points computed win.
#[derive(Clone, Debug)]
pub struct ContactBuffer {
    points: [ContactGeom; MAX_CONTACTS],
    len: usize,
}

impl Default for ContactBuffer {
    fn default() -> Self { Self { points: [ContactGeom::default(); MAX_CONTACTS], len: 0 } }
}

impl ContactBuffer {
    pub fn new() -> Self { Self::default() }

    /// Returns false when the point was dropped.
    #[inline]
    pub fn push(&mut self, c: ContactGeom) -> bool {
        if self.len == MAX_CONTACTS { return false; }
        self.points[self.len] = c;
        self.len += 1;
        true
    }

    #[inline] pub fn is_full(&self) -> bool { self.len == MAX_CONTACTS }
    #[inline] pub fn len(&self) -> usize { self.len }
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
    #[inline] pub fn clear(&mut self) { self.len = 0; }
    #[inline] pub fn as_slice(&self) -> &[ContactGeom] { &self.points[..self.len] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubble_core::{vec3, Vec3};

    #[test]
    fn truncates_after_capacity_keeping_first() {
        let mut buf = ContactBuffer::new();
        for i in 0..12 {
            let kept = buf.push(ContactGeom { pos: vec3(i as f32, 0.0, 0.0), normal: Vec3::Y, depth: 0.1 });
            assert_eq!(kept, i < MAX_CONTACTS);
        }
        assert_eq!(buf.len(), MAX_CONTACTS);
        assert_eq!(buf.as_slice()[7].pos.x, 7.0);
        buf.clear();
        assert!(buf.is_empty());
    }
}
