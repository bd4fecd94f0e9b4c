//! Bond formation between adjacent, compatible, under-saturated atoms.

use super::config::{ChemistryConfig, MovementStrategy, ReactionSampling};
use super::error::SimulationError;
use super::groups::GroupSet;
use super::simulation::connect;
use super::utils::sampling::choose_offset;
use crate::core::models::arena::Arena;
use crate::core::models::ids::AtomId;
use crate::core::utils::geometry::{Offset, squared_distance};
use rand::Rng;
use tracing::debug;

/// True when `a` and `b` may form a new bond of the configured class right now.
pub fn can_react(arena: &Arena, a: AtomId, b: AtomId, config: &ChemistryConfig) -> bool {
    let (Some(atom_a), Some(atom_b)) = (arena.atom(a), arena.atom(b)) else {
        return false;
    };
    a != b
        && atom_a.atom_type == atom_b.atom_type
        && atom_a.bond_count() + atom_b.bond_count() < config.saturation_threshold
        && !atom_a.is_bonded_to(b)
        && config
            .bond_neighborhood
            .admits(squared_distance(atom_a.x, atom_a.y, atom_b.x, atom_b.y))
}

/// Visits every atom once, in index order, and bonds it to compatible neighbors.
///
/// Returns the number of bonds formed.
pub(crate) fn react<R: Rng>(
    arena: &mut Arena,
    groups: &mut GroupSet,
    strategy: MovementStrategy,
    config: &ChemistryConfig,
    neighbor_offsets: &[Offset],
    rng: &mut R,
) -> Result<usize, SimulationError> {
    if !config.enabled {
        return Ok(0);
    }

    let mut formed = 0;
    let mut probes: Vec<Offset> = Vec::with_capacity(neighbor_offsets.len());
    for index in 0..arena.atom_count() {
        let a = AtomId::new(index);
        probes.clear();
        match config.sampling {
            ReactionSampling::RandomNeighbor => probes.push(choose_offset(neighbor_offsets, rng)),
            ReactionSampling::AllNeighbors => probes.extend_from_slice(neighbor_offsets),
        }

        for offset in &probes {
            let (x, y) = arena.atoms[index].position();
            let Some(b) = arena.grid().occupant(x + offset.dx, y + offset.dy) else {
                continue;
            };
            if !can_react(arena, a, b, config) {
                continue;
            }
            connect(arena, groups, strategy, a, b, config.bond_neighborhood)?;
            debug!(%a, %b, bond = %config.bond_neighborhood, "Bond formed");
            formed += 1;
        }
    }
    Ok(formed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::Neighborhood;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(atoms: &[(i32, i32, u32)]) -> (Arena, GroupSet) {
        let mut arena = Arena::new(6, 6);
        let mut groups = GroupSet::new();
        for &(x, y, t) in atoms {
            let id = arena.add_atom(x, y, t).unwrap();
            groups.add_singleton(id);
        }
        (arena, groups)
    }

    fn all_neighbors() -> ChemistryConfig {
        ChemistryConfig {
            sampling: ReactionSampling::AllNeighbors,
            ..Default::default()
        }
    }

    #[test]
    fn matching_free_neighbors_bond_once() {
        let (mut arena, mut groups) = setup(&[(0, 0, 3), (1, 0, 3)]);
        let mut rng = StdRng::seed_from_u64(5);
        let formed = react(
            &mut arena,
            &mut groups,
            MovementStrategy::MoleculeBlocks,
            &all_neighbors(),
            &Neighborhood::VonNeumann.offsets(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(formed, 1);
        assert_eq!(arena.bonds().len(), 1);
        assert_eq!(arena.bonds()[0].neighborhood, Neighborhood::Moore);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn different_types_do_not_react() {
        let (mut arena, mut groups) = setup(&[(0, 0, 1), (1, 0, 2)]);
        let mut rng = StdRng::seed_from_u64(6);
        let formed = react(
            &mut arena,
            &mut groups,
            MovementStrategy::AtomsOnly,
            &all_neighbors(),
            &Neighborhood::VonNeumann.offsets(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(formed, 0);
    }

    #[test]
    fn saturation_caps_the_bond_count_sum() {
        // 0-1 forms first (0 + 0 bonds), then 1-2 (1 + 0)
        let (mut arena, mut groups) = setup(&[(0, 0, 0), (1, 0, 0), (2, 0, 0)]);
        let mut rng = StdRng::seed_from_u64(7);
        react(
            &mut arena,
            &mut groups,
            MovementStrategy::AtomsOnly,
            &all_neighbors(),
            &Neighborhood::VonNeumann.offsets(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(arena.bonds().len(), 2);
        assert_eq!(arena.atom(AtomId::new(1)).unwrap().bond_count(), 2);

        // atom 1 now holds two bonds; a fresh neighbor cannot attach to it
        let d = arena.add_atom(1, 1, 0).unwrap();
        groups.add_singleton(d);
        assert!(!can_react(&arena, AtomId::new(1), d, &all_neighbors()));
    }

    #[test]
    fn pair_with_combined_two_bonds_is_saturated() {
        let (mut arena, mut groups) = setup(&[(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)]);
        connect(
            &mut arena,
            &mut groups,
            MovementStrategy::AtomsOnly,
            AtomId::new(0),
            AtomId::new(2),
            Neighborhood::Moore,
        )
        .unwrap();
        connect(
            &mut arena,
            &mut groups,
            MovementStrategy::AtomsOnly,
            AtomId::new(1),
            AtomId::new(3),
            Neighborhood::Moore,
        )
        .unwrap();
        assert!(!can_react(&arena, AtomId::new(0), AtomId::new(1), &all_neighbors()));
    }

    #[test]
    fn disabled_chemistry_forms_nothing() {
        let (mut arena, mut groups) = setup(&[(0, 0, 0), (1, 0, 0)]);
        let config = ChemistryConfig {
            enabled: false,
            ..all_neighbors()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let formed = react(
            &mut arena,
            &mut groups,
            MovementStrategy::AtomsOnly,
            &config,
            &Neighborhood::VonNeumann.offsets(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(formed, 0);
        assert!(arena.bonds().is_empty());
    }

    #[test]
    fn reaction_beyond_bond_class_is_skipped() {
        // knight-move neighbors are visible to a knight chemistry neighborhood but a
        // von Neumann bond cannot span them
        let (arena, _) = setup(&[(0, 0, 0), (1, 2, 0)]);
        let config = ChemistryConfig {
            neighborhood: Neighborhood::Knight,
            bond_neighborhood: Neighborhood::VonNeumann,
            ..all_neighbors()
        };
        assert!(!can_react(&arena, AtomId::new(0), AtomId::new(1), &config));
    }
}
