use super::atom::{Atom, AtomType};
use super::error::{ArenaError, BondRejection};
use super::grid::OccupancyGrid;
use super::ids::AtomId;
use super::topology::{Bond, BondLink, Neighborhood};
use crate::core::utils::geometry::squared_distance;

/// The atom/bond store together with the occupancy grid it is kept consistent with.
///
/// Atoms and bonds are append-only. Every mutation here validates all of its preconditions
/// before touching any state, so a failed call leaves the arena exactly as it was.
#[derive(Debug, Clone)]
pub struct Arena {
    pub(crate) grid: OccupancyGrid,
    pub(crate) atoms: Vec<Atom>,
    /// All bonds in creation order, for enumeration.
    bonds: Vec<Bond>,
}

impl Arena {
    /// Creates an empty arena of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: OccupancyGrid::new(width, height),
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    #[inline]
    pub fn is_off_grid(&self, x: i32, y: i32) -> bool {
        self.grid.is_off_grid(x, y)
    }

    pub fn has_atom(&self, x: i32, y: i32) -> Result<bool, ArenaError> {
        self.grid.has_atom(x, y)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id.index())
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Iterates over all atoms with their identifiers.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (AtomId::new(i), atom))
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    fn checked_atom(&self, id: AtomId) -> Result<&Atom, ArenaError> {
        self.atoms
            .get(id.index())
            .ok_or_else(|| ArenaError::unknown_atom(id, self.atoms.len()))
    }

    /// Places a new atom on an empty cell and returns its identifier.
    ///
    /// # Errors
    ///
    /// * [`ArenaError::OutOfBounds`] if `(x, y)` is off the grid.
    /// * [`ArenaError::AlreadyOccupied`] if another atom holds the cell.
    pub fn add_atom(&mut self, x: i32, y: i32, atom_type: AtomType) -> Result<AtomId, ArenaError> {
        if let Some(occupant) = self.grid.atom_at(x, y)? {
            return Err(ArenaError::AlreadyOccupied { x, y, occupant });
        }
        let id = AtomId::new(self.atoms.len());
        self.grid.occupy(x, y, id)?;
        self.atoms.push(Atom::new(x, y, atom_type));
        Ok(id)
    }

    /// Checks every precondition of [`make_bond`](Self::make_bond) without mutating anything.
    pub fn validate_bond(
        &self,
        a: AtomId,
        b: AtomId,
        neighborhood: Neighborhood,
    ) -> Result<(), ArenaError> {
        let atom_a = self.checked_atom(a)?;
        let atom_b = self.checked_atom(b)?;
        let reject = |reason| ArenaError::InvalidBond { a, b, reason };

        if a == b {
            return Err(reject(BondRejection::SelfBond));
        }
        if atom_a.is_bonded_to(b) {
            return Err(reject(BondRejection::AlreadyBonded));
        }
        let distance_sq = squared_distance(atom_a.x, atom_a.y, atom_b.x, atom_b.y);
        if !neighborhood.admits(distance_sq) {
            return Err(reject(BondRejection::TooFarApart {
                distance_sq,
                limit: neighborhood.max_squared_distance(),
            }));
        }
        Ok(())
    }

    /// Records a bond between `a` and `b` on both atoms.
    ///
    /// Only the store is updated; group bookkeeping is the engine's concern.
    pub fn make_bond(
        &mut self,
        a: AtomId,
        b: AtomId,
        neighborhood: Neighborhood,
    ) -> Result<(), ArenaError> {
        self.validate_bond(a, b, neighborhood)?;
        self.atoms[a.index()].bonds.push(BondLink {
            partner: b,
            neighborhood,
        });
        self.atoms[b.index()].bonds.push(BondLink {
            partner: a,
            neighborhood,
        });
        self.bonds.push(Bond::new(a, b, neighborhood));
        Ok(())
    }

    /// Checks the grid/position bijection and every bond's distance bound.
    ///
    /// Returns a description of the first violation found.
    pub fn verify_invariants(&self) -> Result<(), String> {
        for (id, atom) in self.atoms_iter() {
            match self.grid.atom_at(atom.x, atom.y) {
                Ok(Some(occupant)) if occupant == id => {}
                Ok(other) => {
                    return Err(format!(
                        "atom {} at ({}, {}) but the cell holds {:?}",
                        id, atom.x, atom.y, other
                    ));
                }
                Err(_) => {
                    return Err(format!(
                        "atom {} is off the grid at ({}, {})",
                        id, atom.x, atom.y
                    ));
                }
            }
        }

        let occupied = self.grid.occupied_cells().count();
        if occupied != self.atoms.len() {
            return Err(format!(
                "{} cells are occupied but the arena holds {} atoms",
                occupied,
                self.atoms.len()
            ));
        }

        for bond in &self.bonds {
            let a = &self.atoms[bond.atom1_id.index()];
            let b = &self.atoms[bond.atom2_id.index()];
            let distance_sq = squared_distance(a.x, a.y, b.x, b.y);
            if !bond.neighborhood.admits(distance_sq) {
                return Err(format!(
                    "{} bond {}-{} is stretched to squared distance {}",
                    bond.neighborhood, bond.atom1_id, bond.atom2_id, distance_sq
                ));
            }
        }
        Ok(())
    }
}
