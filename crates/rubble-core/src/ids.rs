use core::fmt;

/// Handle of a rigid body inside a `World`. Index semantics: ids are never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BodyId(pub u32);
impl fmt::Display for BodyId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "body#{}", self.0) } }

/// Handle of a collision geometry attached to a body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GeomId(pub u32);
impl fmt::Display for GeomId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "geom#{}", self.0) } }

/// Handle of a persistent joint.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct JointId(pub u32);
impl fmt::Display for JointId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "joint#{}", self.0) } }

impl BodyId { #[inline] pub fn index(self) -> usize { self.0 as usize } }
impl GeomId { #[inline] pub fn index(self) -> usize { self.0 as usize } }
impl JointId { #[inline] pub fn index(self) -> usize { self.0 as usize } }
