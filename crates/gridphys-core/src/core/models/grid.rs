use super::error::ArenaError;
use super::ids::AtomId;

/// Dense `width × height` table of cells, each empty or holding one atom.
///
/// The grid performs bounds checking only. Keeping the occupants consistent with the atoms'
/// recorded positions is the job of [`Arena`](super::arena::Arena) and the movement engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    /// Column-major: cell `(x, y)` lives at `x * height + y`.
    cells: Vec<Option<AtomId>>,
}

impl OccupancyGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_off_grid(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= self.width || y < 0 || y >= self.height
    }

    #[inline]
    fn slot(&self, x: i32, y: i32) -> Result<usize, ArenaError> {
        if self.is_off_grid(x, y) {
            return Err(ArenaError::off_grid(x, y, self.width, self.height));
        }
        Ok(x as usize * self.height as usize + y as usize)
    }

    pub fn has_atom(&self, x: i32, y: i32) -> Result<bool, ArenaError> {
        Ok(self.atom_at(x, y)?.is_some())
    }

    pub fn atom_at(&self, x: i32, y: i32) -> Result<Option<AtomId>, ArenaError> {
        let slot = self.slot(x, y)?;
        Ok(self.cells[slot])
    }

    /// Like [`atom_at`](Self::atom_at), but off-grid cells read as empty.
    #[inline]
    pub fn occupant(&self, x: i32, y: i32) -> Option<AtomId> {
        self.slot(x, y).ok().and_then(|slot| self.cells[slot])
    }

    pub(crate) fn occupy(&mut self, x: i32, y: i32, atom: AtomId) -> Result<(), ArenaError> {
        let slot = self.slot(x, y)?;
        self.cells[slot] = Some(atom);
        Ok(())
    }

    pub(crate) fn vacate(&mut self, x: i32, y: i32) -> Result<(), ArenaError> {
        let slot = self.slot(x, y)?;
        self.cells[slot] = None;
        Ok(())
    }

    /// Iterates over every occupied cell as `(x, y, atom)`, column by column.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, AtomId)> + '_ {
        let height = self.height.max(1) as usize;
        self.cells.iter().enumerate().filter_map(move |(slot, cell)| {
            cell.map(|atom| ((slot / height) as i32, (slot % height) as i32, atom))
        })
    }
}
