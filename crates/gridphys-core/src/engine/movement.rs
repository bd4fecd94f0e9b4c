//! Constrained translation of atom sets.
//!
//! Every strategy reduces to [`translate_if_possible`]: a candidate offset for a set of atoms
//! is committed only if no bond leaving the set would be stretched past its neighborhood and
//! every target cell is on the grid and free of atoms outside the set. A rejected offset
//! degrades to the identity, and the atoms are re-placed where they were.

use super::error::SimulationError;
use super::groups::{Group, GroupSet};
use super::state::TickReport;
use super::utils::sampling::{choose_offset, random_rect};
use crate::core::models::arena::Arena;
use crate::core::models::error::ArenaError;
use crate::core::models::ids::AtomId;
use crate::core::utils::geometry::{Offset, Rect, squared_distance};
use rand::prelude::*;
use tracing::trace;

fn broken_invariant(err: ArenaError) -> SimulationError {
    SimulationError::Internal(format!("grid update failed during movement: {}", err))
}

/// `(x, y)` moved by `offset`, or `None` if a coordinate leaves the `i32` range.
fn shifted(x: i32, y: i32, offset: Offset) -> Option<(i32, i32)> {
    Some((x.checked_add(offset.dx)?, y.checked_add(offset.dy)?))
}

/// True when no bond from a moving atom to a stationary one would exceed its bound.
fn keeps_bonds_intact(arena: &Arena, moving: &[AtomId], offset: Offset) -> bool {
    moving.iter().all(|&id| {
        let atom = &arena.atoms[id.index()];
        let Some((nx, ny)) = shifted(atom.x, atom.y, offset) else {
            return false;
        };
        atom.bonds
            .iter()
            .filter(|link| moving.binary_search(&link.partner).is_err())
            .all(|link| {
                let partner = &arena.atoms[link.partner.index()];
                link.neighborhood
                    .admits(squared_distance(nx, ny, partner.x, partner.y))
            })
    })
}

/// Attempts to translate the atoms in `moving` (sorted, unique) by `offset`.
///
/// Returns `Ok(true)` if the atoms were displaced. An `Err` means the grid and the atom
/// positions disagreed, which is a broken invariant.
pub fn translate_if_possible(
    arena: &mut Arena,
    moving: &[AtomId],
    offset: Offset,
) -> Result<bool, SimulationError> {
    if moving.is_empty() {
        return Ok(false);
    }
    if let Some(&last) = moving.last() {
        if last.index() >= arena.atoms.len() {
            return Err(SimulationError::Internal(format!(
                "moving set refers to unknown atom {}",
                last
            )));
        }
    }

    let mut valid = !offset.is_zero() && keeps_bonds_intact(arena, moving, offset);

    for &id in moving {
        let (x, y) = arena.atoms[id.index()].position();
        if arena.grid.occupant(x, y) != Some(id) {
            return Err(SimulationError::Internal(format!(
                "atom {} records ({}, {}) but the cell holds {:?}",
                id,
                x,
                y,
                arena.grid.occupant(x, y)
            )));
        }
        arena.grid.vacate(x, y).map_err(broken_invariant)?;
    }

    if valid {
        valid = moving.iter().all(|&id| {
            let atom = &arena.atoms[id.index()];
            shifted(atom.x, atom.y, offset).is_some_and(|(tx, ty)| {
                !arena.grid.is_off_grid(tx, ty) && arena.grid.occupant(tx, ty).is_none()
            })
        });
    }

    let applied = if valid { offset } else { Offset::ZERO };
    for &id in moving {
        let atom = &mut arena.atoms[id.index()];
        atom.x += applied.dx;
        atom.y += applied.dy;
        let (x, y) = (atom.x, atom.y);
        arena.grid.occupy(x, y, id).map_err(broken_invariant)?;
    }

    trace!(
        atoms = moving.len(),
        dx = offset.dx,
        dy = offset.dy,
        moved = valid,
        "Translation attempt"
    );
    Ok(valid)
}

/// Attempts to translate everything inside `rect` by `offset`.
///
/// # Errors
///
/// [`SimulationError::UnsupportedOperation`] if the rectangle has no area. A rectangle that
/// reaches off the grid is not an error: the move is rejected without touching the grid.
pub fn move_block_if_possible(
    arena: &mut Arena,
    rect: Rect,
    offset: Offset,
) -> Result<bool, SimulationError> {
    if rect.is_empty() {
        return Err(SimulationError::UnsupportedOperation(format!(
            "block movement needs a positive width and height, got {}x{}",
            rect.width, rect.height
        )));
    }
    let grid = arena.grid();
    let far_corner = rect
        .x
        .checked_add(rect.width - 1)
        .zip(rect.y.checked_add(rect.height - 1));
    let Some((right, bottom)) = far_corner else {
        return Ok(false);
    };
    if grid.is_off_grid(rect.x, rect.y) || grid.is_off_grid(right, bottom) {
        return Ok(false);
    }

    let mut inside = Vec::new();
    for x in rect.x..rect.x + rect.width {
        for y in rect.y..rect.y + rect.height {
            if let Some(id) = grid.occupant(x, y) {
                inside.push(id);
            }
        }
    }
    inside.sort_unstable();
    translate_if_possible(arena, &inside, offset)
}

/// One random direction per group, groups visited in shuffled order.
pub(crate) fn move_groups<R: Rng>(
    arena: &mut Arena,
    groups: &GroupSet,
    directions: &[Offset],
    rng: &mut R,
    report: &mut TickReport,
) -> Result<(), SimulationError> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.shuffle(rng);
    for index in order {
        let Some(group) = groups.get(index) else {
            continue;
        };
        let offset = choose_offset(directions, rng);
        let moved = translate_if_possible(arena, group.atoms(), offset)?;
        report.record_move(moved);
    }
    Ok(())
}

/// Moves `count` random rectangles of the grid.
pub(crate) fn move_random_blocks<R: Rng>(
    arena: &mut Arena,
    count: usize,
    directions: &[Offset],
    rng: &mut R,
    report: &mut TickReport,
) -> Result<(), SimulationError> {
    for _ in 0..count {
        let Some(rect) = random_rect(arena.width(), arena.height(), rng) else {
            return Ok(());
        };
        let offset = choose_offset(directions, rng);
        let moved = move_block_if_possible(arena, rect, offset)?;
        report.record_move(moved);
    }
    Ok(())
}

fn bounding_box(arena: &Arena, group: &Group) -> Option<Rect> {
    Rect::bounding(
        group
            .atoms()
            .iter()
            .map(|id| arena.atoms[id.index()].position()),
    )
}

/// Moves one molecule as a whole, then every rectangular piece of its bounding box in random
/// order, each piece carrying the molecule's atoms currently inside it.
pub(crate) fn move_molecule<R: Rng>(
    arena: &mut Arena,
    molecule: &Group,
    directions: &[Offset],
    rng: &mut R,
    report: &mut TickReport,
) -> Result<(), SimulationError> {
    let offset = choose_offset(directions, rng);
    let moved = translate_if_possible(arena, molecule.atoms(), offset)?;
    report.record_move(moved);

    let Some(bbox) = bounding_box(arena, molecule) else {
        return Ok(());
    };
    let mut regions = bbox.sub_rects();
    regions.shuffle(rng);

    let mut members = Vec::with_capacity(molecule.len());
    for region in regions {
        members.clear();
        members.extend(molecule.atoms().iter().copied().filter(|id| {
            let (x, y) = arena.atoms[id.index()].position();
            region.contains(x, y)
        }));
        if members.is_empty() {
            continue;
        }
        let offset = choose_offset(directions, rng);
        let moved = translate_if_possible(arena, &members, offset)?;
        report.record_move(moved);
    }
    Ok(())
}

/// Runs [`move_molecule`] for every group, molecules visited in shuffled order.
pub(crate) fn move_molecules<R: Rng>(
    arena: &mut Arena,
    molecules: &GroupSet,
    directions: &[Offset],
    rng: &mut R,
    report: &mut TickReport,
) -> Result<(), SimulationError> {
    let mut order: Vec<usize> = (0..molecules.len()).collect();
    order.shuffle(rng);
    for index in order {
        if let Some(molecule) = molecules.get(index) {
            move_molecule(arena, molecule, directions, rng, report)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::Neighborhood;
    use rand::rngs::StdRng;

    fn ids(indices: &[usize]) -> Vec<AtomId> {
        indices.iter().copied().map(AtomId::new).collect()
    }

    fn positions(arena: &Arena) -> Vec<(i32, i32)> {
        arena.atoms().iter().map(|a| a.position()).collect()
    }

    #[test]
    fn free_atom_moves_into_empty_cell() {
        let mut arena = Arena::new(3, 3);
        arena.add_atom(1, 1, 0).unwrap();
        let moved = translate_if_possible(&mut arena, &ids(&[0]), Offset::new(1, 0)).unwrap();
        assert!(moved);
        assert_eq!(positions(&arena), vec![(2, 1)]);
        assert_eq!(arena.grid().has_atom(1, 1), Ok(false));
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn move_off_grid_is_rejected_and_atom_stays() {
        let mut arena = Arena::new(3, 3);
        arena.add_atom(0, 0, 0).unwrap();
        let moved = translate_if_possible(&mut arena, &ids(&[0]), Offset::new(-1, 0)).unwrap();
        assert!(!moved);
        assert_eq!(positions(&arena), vec![(0, 0)]);
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn offset_past_the_i32_range_is_rejected_for_bonded_atoms() {
        let mut arena = Arena::new(3, 3);
        let a = arena.add_atom(1, 1, 0).unwrap();
        let b = arena.add_atom(2, 1, 0).unwrap();
        arena.make_bond(a, b, Neighborhood::Moore).unwrap();
        for offset in [Offset::new(i32::MAX, 0), Offset::new(0, i32::MIN)] {
            let moved = translate_if_possible(&mut arena, &ids(&[0]), offset).unwrap();
            assert!(!moved);
        }
        let moved = translate_if_possible(&mut arena, &ids(&[0, 1]), Offset::new(i32::MAX, i32::MAX))
            .unwrap();
        assert!(!moved);
        assert_eq!(positions(&arena), vec![(1, 1), (2, 1)]);
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn move_into_occupied_cell_is_rejected() {
        let mut arena = Arena::new(3, 3);
        arena.add_atom(0, 0, 0).unwrap();
        arena.add_atom(1, 0, 0).unwrap();
        let before = positions(&arena);
        let moved = translate_if_possible(&mut arena, &ids(&[0]), Offset::new(1, 0)).unwrap();
        assert!(!moved);
        assert_eq!(positions(&arena), before);
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn atoms_of_the_moving_set_may_shift_into_each_others_cells() {
        let mut arena = Arena::new(4, 1);
        arena.add_atom(0, 0, 0).unwrap();
        arena.add_atom(1, 0, 0).unwrap();
        let moved = translate_if_possible(&mut arena, &ids(&[0, 1]), Offset::new(1, 0)).unwrap();
        assert!(moved);
        assert_eq!(positions(&arena), vec![(1, 0), (2, 0)]);
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn rigid_bond_blocks_a_lone_partner_from_moving_sideways() {
        let mut arena = Arena::new(5, 5);
        let a = arena.add_atom(1, 1, 0).unwrap();
        let b = arena.add_atom(2, 1, 0).unwrap();
        arena.make_bond(a, b, Neighborhood::VonNeumann).unwrap();
        for offset in [Offset::new(0, 1), Offset::new(0, -1), Offset::new(-1, 0)] {
            let moved = translate_if_possible(&mut arena, &[a], offset).unwrap();
            assert!(!moved);
            assert_eq!(arena.atom(a).unwrap().position(), (1, 1));
        }
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn flexible_bond_allows_a_diagonal_stretch() {
        let mut arena = Arena::new(5, 5);
        let a = arena.add_atom(1, 1, 0).unwrap();
        let b = arena.add_atom(2, 1, 0).unwrap();
        arena.make_bond(a, b, Neighborhood::Moore).unwrap();
        assert!(translate_if_possible(&mut arena, &[a], Offset::new(0, 1)).unwrap());
        assert!(!translate_if_possible(&mut arena, &[a], Offset::new(-1, 0)).unwrap());
        assert_eq!(arena.atom(a).unwrap().position(), (1, 2));
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn bonded_pair_moves_together() {
        let mut arena = Arena::new(5, 5);
        let a = arena.add_atom(1, 1, 0).unwrap();
        let b = arena.add_atom(2, 1, 0).unwrap();
        arena.make_bond(a, b, Neighborhood::VonNeumann).unwrap();
        assert!(translate_if_possible(&mut arena, &[a, b], Offset::new(0, 1)).unwrap());
        assert_eq!(positions(&arena), vec![(1, 2), (2, 2)]);
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn inconsistent_grid_is_reported_as_internal_error() {
        let mut arena = Arena::new(3, 3);
        arena.add_atom(1, 1, 0).unwrap();
        arena.atoms[0].x = 2;
        let result = translate_if_possible(&mut arena, &ids(&[0]), Offset::new(0, 1));
        assert!(matches!(result, Err(SimulationError::Internal(_))));
    }

    #[test]
    fn block_with_zero_area_is_unsupported() {
        let mut arena = Arena::new(3, 3);
        let result = move_block_if_possible(&mut arena, Rect::new(0, 0, 0, 2), Offset::new(1, 0));
        assert!(matches!(
            result,
            Err(SimulationError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn block_reaching_off_grid_is_rejected_untouched() {
        let mut arena = Arena::new(3, 3);
        arena.add_atom(2, 2, 0).unwrap();
        let moved =
            move_block_if_possible(&mut arena, Rect::new(2, 2, 2, 1), Offset::new(-1, 0)).unwrap();
        assert!(!moved);
        assert_eq!(positions(&arena), vec![(2, 2)]);
    }

    #[test]
    fn block_moves_every_atom_inside_it() {
        let mut arena = Arena::new(5, 5);
        arena.add_atom(1, 1, 0).unwrap();
        arena.add_atom(2, 2, 1).unwrap();
        arena.add_atom(4, 4, 2).unwrap();
        let moved =
            move_block_if_possible(&mut arena, Rect::new(1, 1, 2, 2), Offset::new(0, -1)).unwrap();
        assert!(moved);
        assert_eq!(positions(&arena), vec![(1, 0), (2, 1), (4, 4)]);
        assert!(arena.verify_invariants().is_ok());
    }

    #[test]
    fn molecule_moves_preserve_invariants() {
        let mut arena = Arena::new(8, 8);
        let chain: Vec<AtomId> = (0..4)
            .map(|i| arena.add_atom(2 + i, 3, 0).unwrap())
            .collect();
        for pair in chain.windows(2) {
            arena.make_bond(pair[0], pair[1], Neighborhood::Moore).unwrap();
        }
        let molecule = Group::from_atoms(chain.iter().copied());
        let directions = Neighborhood::VonNeumann.offsets();
        let mut rng = StdRng::seed_from_u64(11);
        let mut report = TickReport::default();
        for _ in 0..50 {
            move_molecule(&mut arena, &molecule, &directions, &mut rng, &mut report).unwrap();
            assert!(arena.verify_invariants().is_ok());
        }
        assert!(report.moves_attempted > 50);
    }
}
