use std::fmt;

/// Stable identifier of an atom: its index in the arena's atom store.
///
/// Atoms are never removed, so an `AtomId` stays valid for the lifetime of the arena that
/// issued it and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AtomId(usize);

impl AtomId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for AtomId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
