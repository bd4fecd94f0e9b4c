use super::ids::AtomId;
use super::topology::{BondLink, Neighborhood};

/// Opaque type tag of an atom. Only compared for equality by the chemistry pass.
pub type AtomType = u32;

/// A positioned, typed point occupying exactly one grid cell.
///
/// The coordinates always lie inside the grid of the arena that owns the atom, and that grid
/// cell always records this atom as its occupant. The bond list is append-only and mirrors the
/// partner's list: if `a` links to `b`, `b` links to `a` with the same neighborhood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Column of the occupied cell.
    pub x: i32,
    /// Row of the occupied cell.
    pub y: i32,
    /// Type tag used for chemistry compatibility.
    pub atom_type: AtomType,
    /// Bonds to other atoms, in creation order.
    pub bonds: Vec<BondLink>,
}

impl Atom {
    pub fn new(x: i32, y: i32, atom_type: AtomType) -> Self {
        Self {
            x,
            y,
            atom_type,
            bonds: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_bonded_to(&self, other: AtomId) -> bool {
        self.bonds.iter().any(|link| link.partner == other)
    }

    pub fn bond_to(&self, other: AtomId) -> Option<Neighborhood> {
        self.bonds
            .iter()
            .find(|link| link.partner == other)
            .map(|link| link.neighborhood)
    }
}
