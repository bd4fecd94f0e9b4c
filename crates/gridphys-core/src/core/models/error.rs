use super::ids::AtomId;
use thiserror::Error;

/// Why a requested bond was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondRejection {
    SelfBond,
    AlreadyBonded,
    TooFarApart { distance_sq: i64, limit: i64 },
}

impl std::fmt::Display for BondRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfBond => write!(f, "an atom cannot be bonded to itself"),
            Self::AlreadyBonded => write!(f, "the atoms are already bonded"),
            Self::TooFarApart { distance_sq, limit } => write!(
                f,
                "the atoms are too far apart (squared distance {} exceeds {})",
                distance_sq, limit
            ),
        }
    }
}

/// Precondition violations raised by the grid and the atom/bond store.
///
/// None of these leave the arena partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    #[error("Cell ({x}, {y}) is already occupied by atom {occupant}")]
    AlreadyOccupied { x: i32, y: i32, occupant: AtomId },

    #[error("Cannot bond atom {a} to atom {b}: {reason}")]
    InvalidBond {
        a: AtomId,
        b: AtomId,
        reason: BondRejection,
    },
}

impl ArenaError {
    pub(crate) fn off_grid(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::OutOfBounds(format!(
            "position ({}, {}) is not on the {}x{} grid",
            x, y, width, height
        ))
    }

    pub(crate) fn unknown_atom(id: AtomId, count: usize) -> Self {
        Self::OutOfBounds(format!(
            "atom index {} is invalid (the arena holds {} atoms)",
            id.index(),
            count
        ))
    }
}
