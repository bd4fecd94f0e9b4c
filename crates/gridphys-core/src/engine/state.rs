use crate::core::models::atom::Atom;
use crate::core::models::topology::Bond;

/// What happened during one call to `advance_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Number of the tick just completed, starting at 1.
    pub tick: u64,
    /// Translation attempts made by the movement pass.
    pub moves_attempted: usize,
    /// Attempts that displaced their atoms.
    pub moves_succeeded: usize,
    /// Bonds formed by the chemistry pass.
    pub bonds_formed: usize,
}

impl TickReport {
    pub(crate) fn record_move(&mut self, moved: bool) {
        self.moves_attempted += 1;
        if moved {
            self.moves_succeeded += 1;
        }
    }
}

/// An owned, read-only copy of the world for renderers and other observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaSnapshot {
    pub width: usize,
    pub height: usize,
    pub tick: u64,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub group_count: usize,
}

impl ArenaSnapshot {
    /// The atom occupying `(x, y)`, found by scanning the atom list.
    pub fn atom_at(&self, x: i32, y: i32) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.x == x && a.y == y)
    }
}
