use super::chemistry;
use super::config::{MovementStrategy, SimulationConfig};
use super::error::SimulationError;
use super::groups::{Group, GroupSet};
use super::movement;
use super::state::{ArenaSnapshot, TickReport};
use crate::core::models::arena::Arena;
use crate::core::models::atom::{Atom, AtomType};
use crate::core::models::ids::AtomId;
use crate::core::models::topology::{Bond, Neighborhood};
use crate::core::utils::geometry::{Offset, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Records a bond in the store and updates the groups for it.
///
/// This is the single path for new bonds, shared by callers of
/// [`Simulation::make_bond`] and by the chemistry pass.
pub(crate) fn connect(
    arena: &mut Arena,
    groups: &mut GroupSet,
    strategy: MovementStrategy,
    a: AtomId,
    b: AtomId,
    neighborhood: Neighborhood,
) -> Result<(), SimulationError> {
    arena.make_bond(a, b, neighborhood)?;
    groups.record_bond(strategy, a, b, neighborhood);
    Ok(())
}

/// A grid world together with its groups, configuration and random source.
///
/// The simulation exclusively owns all of its state. Drivers seed it with
/// [`add_atom`](Self::add_atom) and [`make_bond`](Self::make_bond), call
/// [`advance_tick`](Self::advance_tick) on their own cadence, and read the world back through
/// borrowing accessors or an owned [`snapshot`](Self::snapshot).
#[derive(Debug)]
pub struct Simulation<R = StdRng> {
    arena: Arena,
    groups: GroupSet,
    config: SimulationConfig,
    movement_directions: Vec<Offset>,
    chemistry_offsets: Vec<Offset>,
    rng: R,
    tick: u64,
}

impl Simulation<StdRng> {
    /// A simulation with default settings and an entropy-seeded generator.
    pub fn new(
        width: usize,
        height: usize,
        movement_strategy: MovementStrategy,
    ) -> Result<Self, SimulationError> {
        let config = SimulationConfig::new(width, height, movement_strategy)?;
        Self::with_config(config, StdRng::from_entropy())
    }

    /// A simulation whose every random draw is determined by `seed`.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        Self::with_config(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_config(config: SimulationConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;
        debug!(
            width = config.width,
            height = config.height,
            strategy = %config.movement_strategy,
            "Creating simulation"
        );
        Ok(Self {
            arena: Arena::new(config.width as i32, config.height as i32),
            groups: GroupSet::new(),
            movement_directions: config.movement_neighborhood.offsets(),
            chemistry_offsets: config.chemistry.neighborhood.offsets(),
            config,
            rng,
            tick: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    /// Number of ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn atom_count(&self) -> usize {
        self.arena.atom_count()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.arena.atom(id)
    }

    pub fn atoms(&self) -> &[Atom] {
        self.arena.atoms()
    }

    pub fn bonds(&self) -> &[Bond] {
        self.arena.bonds()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[Group] {
        self.groups.groups()
    }

    pub fn is_off_grid(&self, x: i32, y: i32) -> bool {
        self.arena.is_off_grid(x, y)
    }

    pub fn has_atom(&self, x: i32, y: i32) -> Result<bool, SimulationError> {
        Ok(self.arena.has_atom(x, y)?)
    }

    /// The simulation's random source, for drivers that seed scenes from the same stream.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Places a new atom and gives it a singleton group.
    pub fn add_atom(
        &mut self,
        x: i32,
        y: i32,
        atom_type: AtomType,
    ) -> Result<AtomId, SimulationError> {
        let id = self.arena.add_atom(x, y, atom_type)?;
        self.groups.add_singleton(id);
        Ok(id)
    }

    /// Bonds `a` and `b` and re-derives the groups for the new edge.
    ///
    /// # Errors
    ///
    /// Fails without modifying anything if either index is unknown, if `a == b`, if the atoms
    /// are already bonded, or if their current distance exceeds `neighborhood`.
    pub fn make_bond(
        &mut self,
        a: AtomId,
        b: AtomId,
        neighborhood: Neighborhood,
    ) -> Result<(), SimulationError> {
        connect(
            &mut self.arena,
            &mut self.groups,
            self.config.movement_strategy,
            a,
            b,
            neighborhood,
        )
    }

    /// Attempts to translate every atom inside the `width × height` rectangle at `(x, y)`.
    ///
    /// Returns whether the atoms moved. A rectangle reaching off the grid is rejected without
    /// touching the grid; a rectangle without area is an
    /// [`UnsupportedOperation`](SimulationError::UnsupportedOperation).
    pub fn move_block(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        dx: i32,
        dy: i32,
    ) -> Result<bool, SimulationError> {
        movement::move_block_if_possible(
            &mut self.arena,
            Rect::new(x, y, width, height),
            Offset::new(dx, dy),
        )
    }

    /// Runs one movement pass followed by one chemistry pass.
    ///
    /// An error means an internal invariant was found broken; the simulation should not be
    /// advanced further.
    #[instrument(level = "debug", skip_all, fields(tick = self.tick + 1))]
    pub fn advance_tick(&mut self) -> Result<TickReport, SimulationError> {
        let mut report = TickReport {
            tick: self.tick + 1,
            ..Default::default()
        };

        match self.config.movement_strategy {
            MovementStrategy::AtomsOnly | MovementStrategy::AllSubgraphs => {
                movement::move_groups(
                    &mut self.arena,
                    &self.groups,
                    &self.movement_directions,
                    &mut self.rng,
                    &mut report,
                )?;
            }
            MovementStrategy::BlockSpace => {
                movement::move_random_blocks(
                    &mut self.arena,
                    self.config.blocks_per_tick,
                    &self.movement_directions,
                    &mut self.rng,
                    &mut report,
                )?;
            }
            MovementStrategy::MoleculeBlocks => {
                movement::move_molecules(
                    &mut self.arena,
                    &self.groups,
                    &self.movement_directions,
                    &mut self.rng,
                    &mut report,
                )?;
            }
        }

        report.bonds_formed = chemistry::react(
            &mut self.arena,
            &mut self.groups,
            self.config.movement_strategy,
            &self.config.chemistry,
            &self.chemistry_offsets,
            &mut self.rng,
        )?;

        self.tick += 1;
        debug!(
            attempted = report.moves_attempted,
            succeeded = report.moves_succeeded,
            bonds_formed = report.bonds_formed,
            groups = self.groups.len(),
            "Tick complete"
        );
        Ok(report)
    }

    /// Checks the grid/position bijection, every bond's bound, and the group invariant of the
    /// configured strategy.
    pub fn verify_invariants(&self) -> Result<(), SimulationError> {
        self.arena
            .verify_invariants()
            .map_err(SimulationError::Internal)?;

        let atoms = self.arena.atom_count();
        match self.config.movement_strategy {
            MovementStrategy::AtomsOnly | MovementStrategy::AllSubgraphs => {
                if !self.groups.covers_all(atoms) {
                    return Err(SimulationError::Internal(
                        "an atom belongs to no group".to_string(),
                    ));
                }
            }
            MovementStrategy::MoleculeBlocks => {
                if !self.groups.is_partition(atoms) {
                    return Err(SimulationError::Internal(
                        "molecule groups do not partition the atoms".to_string(),
                    ));
                }
                for bond in self.arena.bonds() {
                    let split = self
                        .groups
                        .iter()
                        .any(|g| g.splits(bond.atom1_id, bond.atom2_id));
                    if split {
                        return Err(SimulationError::Internal(format!(
                            "bonded atoms {} and {} sit in different molecules",
                            bond.atom1_id, bond.atom2_id
                        )));
                    }
                }
            }
            MovementStrategy::BlockSpace => {}
        }
        Ok(())
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            width: self.config.width,
            height: self.config.height,
            tick: self.tick,
            atoms: self.arena.atoms().to_vec(),
            bonds: self.arena.bonds().to_vec(),
            group_count: self.groups.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::error::{ArenaError, BondRejection};
    use crate::engine::config::{ChemistryConfig, ReactionSampling, SimulationConfigBuilder};
    use std::collections::HashSet;

    fn seeded(width: usize, height: usize, strategy: MovementStrategy, seed: u64) -> Simulation {
        let config = SimulationConfig::new(width, height, strategy).unwrap();
        Simulation::seeded(config, seed).unwrap()
    }

    fn without_chemistry(width: usize, height: usize, strategy: MovementStrategy) -> Simulation {
        let config = SimulationConfigBuilder::new()
            .dimensions(width, height)
            .movement_strategy(strategy)
            .chemistry(ChemistryConfig {
                enabled: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        Simulation::seeded(config, 99).unwrap()
    }

    /// The mixed rigid/flexible ring used throughout these tests.
    fn add_ring(sim: &mut Simulation) {
        let cells = [(1, 1), (2, 1), (2, 2), (1, 2), (1, 3), (0, 3), (0, 2), (0, 1)];
        let ids: Vec<AtomId> = cells
            .iter()
            .map(|&(x, y)| sim.add_atom(x + 3, y + 3, 0).unwrap())
            .collect();
        let classes = [
            Neighborhood::VonNeumann,
            Neighborhood::VonNeumann,
            Neighborhood::Moore,
            Neighborhood::Moore,
            Neighborhood::VonNeumann,
            Neighborhood::Moore,
            Neighborhood::VonNeumann,
            Neighborhood::Moore,
        ];
        for (i, class) in classes.into_iter().enumerate() {
            sim.make_bond(ids[i], ids[(i + 1) % ids.len()], class).unwrap();
        }
    }

    fn add_scattered_atoms(sim: &mut Simulation, count: usize) {
        let (w, h) = (sim.width() as i32, sim.height() as i32);
        let mut placed = 0;
        'outer: for y in (0..h).rev() {
            for x in (0..w).rev().step_by(2) {
                if placed == count {
                    break 'outer;
                }
                if !sim.has_atom(x, y).unwrap() {
                    sim.add_atom(x, y, (x + y) as u32 % 3).unwrap();
                    placed += 1;
                }
            }
        }
    }

    #[test]
    fn duplicate_and_overlong_bonds_are_rejected() {
        let mut sim = seeded(5, 5, MovementStrategy::AllSubgraphs, 1);
        let a = sim.add_atom(1, 1, 0).unwrap();
        let b = sim.add_atom(2, 1, 0).unwrap();
        assert!(sim.make_bond(a, b, Neighborhood::VonNeumann).is_ok());
        assert!(matches!(
            sim.make_bond(AtomId::new(0), AtomId::new(1), Neighborhood::VonNeumann),
            Err(SimulationError::Arena(ArenaError::InvalidBond {
                reason: BondRejection::AlreadyBonded,
                ..
            }))
        ));

        let c = sim.add_atom(0, 0, 0).unwrap();
        assert_eq!(c, AtomId::new(2));
        assert!(matches!(
            sim.make_bond(AtomId::new(0), c, Neighborhood::VonNeumann),
            Err(SimulationError::Arena(ArenaError::InvalidBond {
                reason: BondRejection::TooFarApart { distance_sq: 2, limit: 1 },
                ..
            }))
        ));
    }

    #[test]
    fn failed_calls_leave_the_world_unchanged() {
        let mut sim = seeded(5, 5, MovementStrategy::AllSubgraphs, 2);
        let a = sim.add_atom(1, 1, 0).unwrap();
        let b = sim.add_atom(3, 3, 0).unwrap();
        let before = sim.snapshot();
        let groups_before: Vec<Group> = sim.groups().to_vec();

        assert!(sim.add_atom(1, 1, 4).is_err());
        assert!(sim.add_atom(7, 1, 4).is_err());
        assert!(sim.make_bond(a, b, Neighborhood::Moore).is_err());
        assert!(sim.make_bond(a, a, Neighborhood::Moore).is_err());
        assert!(sim.make_bond(a, AtomId::new(5), Neighborhood::Moore).is_err());

        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.groups(), groups_before.as_slice());
    }

    #[test]
    fn add_atom_creates_a_singleton_group() {
        let mut sim = seeded(4, 4, MovementStrategy::MoleculeBlocks, 3);
        let a = sim.add_atom(0, 0, 1).unwrap();
        assert_eq!(sim.group_count(), 1);
        assert_eq!(sim.groups()[0], Group::singleton(a));
        assert_eq!(sim.atom(a).unwrap().atom_type, 1);
    }

    #[test]
    fn rigid_bond_in_atoms_only_keeps_singletons() {
        let mut sim = seeded(5, 5, MovementStrategy::AtomsOnly, 4);
        let a = sim.add_atom(1, 1, 0).unwrap();
        let b = sim.add_atom(2, 1, 0).unwrap();
        sim.make_bond(a, b, Neighborhood::VonNeumann).unwrap();
        assert_eq!(sim.group_count(), 2);
        assert!(sim.verify_invariants().is_ok());
    }

    #[test]
    fn rigid_bond_in_all_subgraphs_replaces_singletons_with_pair() {
        let mut sim = seeded(5, 5, MovementStrategy::AllSubgraphs, 5);
        let a = sim.add_atom(1, 1, 0).unwrap();
        let b = sim.add_atom(2, 1, 0).unwrap();
        sim.make_bond(a, b, Neighborhood::VonNeumann).unwrap();
        assert_eq!(sim.groups(), &[Group::from_atoms([a, b])]);
    }

    #[test]
    fn single_atom_on_one_cell_grid_never_moves() {
        for strategy in MovementStrategy::ALL {
            let mut sim = seeded(1, 1, strategy, 6);
            let a = sim.add_atom(0, 0, 0).unwrap();
            for _ in 0..25 {
                let report = sim.advance_tick().unwrap();
                assert_eq!(report.moves_succeeded, 0);
                assert_eq!(sim.atom(a).unwrap().position(), (0, 0));
            }
            assert_eq!(sim.tick(), 25);
        }
    }

    #[test]
    fn adjacent_free_atoms_form_at_most_one_bond() {
        for seed in 0..40 {
            let mut sim = seeded(6, 6, MovementStrategy::AtomsOnly, seed);
            let a = sim.add_atom(0, 0, 2).unwrap();
            let b = sim.add_atom(1, 0, 2).unwrap();
            let report = sim.advance_tick().unwrap();

            assert!(report.bonds_formed <= 1);
            assert_eq!(sim.bonds().len(), report.bonds_formed);
            if let Some(bond) = sim.bonds().first() {
                assert!(bond.contains(a) && bond.contains(b));
                assert_eq!(bond.neighborhood, Neighborhood::Moore);
            }
            assert!(sim.atom(a).unwrap().bond_count() <= 1);
            assert!(sim.atom(b).unwrap().bond_count() <= 1);
        }
    }

    #[test]
    fn adjacent_free_atoms_bond_when_every_neighbor_is_checked() {
        let config = SimulationConfigBuilder::new()
            .dimensions(2, 1)
            .movement_strategy(MovementStrategy::AtomsOnly)
            .chemistry(ChemistryConfig {
                sampling: ReactionSampling::AllNeighbors,
                ..Default::default()
            })
            .build()
            .unwrap();
        let mut sim = Simulation::seeded(config, 7).unwrap();
        sim.add_atom(0, 0, 0).unwrap();
        sim.add_atom(1, 0, 0).unwrap();
        let report = sim.advance_tick().unwrap();
        assert_eq!(report.bonds_formed, 1);
        assert_eq!(sim.bonds().len(), 1);
    }

    #[test]
    fn invariants_hold_across_ticks_for_every_strategy() {
        for strategy in MovementStrategy::ALL {
            let mut sim = seeded(16, 12, strategy, 8);
            add_ring(&mut sim);
            add_scattered_atoms(&mut sim, 30);
            sim.verify_invariants().unwrap();
            for _ in 0..60 {
                sim.advance_tick().unwrap();
                if let Err(e) = sim.verify_invariants() {
                    panic!("{} broke an invariant at tick {}: {}", strategy, sim.tick(), e);
                }
            }
        }
    }

    #[test]
    fn molecule_groups_track_connected_components() {
        let mut sim = seeded(16, 12, MovementStrategy::MoleculeBlocks, 9);
        add_ring(&mut sim);
        let loner = sim.add_atom(15, 11, 7).unwrap();
        let ring: HashSet<AtomId> = (0..8).map(AtomId::new).collect();

        let memberships: Vec<HashSet<AtomId>> = sim
            .groups()
            .iter()
            .map(|g| g.atoms().iter().copied().collect())
            .collect();
        assert_eq!(memberships.len(), 2);
        assert!(memberships.contains(&ring));
        assert!(memberships.contains(&HashSet::from([loner])));
    }

    #[test]
    fn all_subgraphs_keeps_every_atom_grouped_after_chemistry() {
        let mut sim = seeded(10, 10, MovementStrategy::AllSubgraphs, 10);
        for x in 0..5 {
            sim.add_atom(2 * x, 4, 1).unwrap();
            sim.add_atom(2 * x + 1, 5, 1).unwrap();
        }
        for _ in 0..30 {
            sim.advance_tick().unwrap();
            sim.verify_invariants().unwrap();
        }
    }

    #[test]
    fn rejected_moves_leave_positions_unchanged() {
        // a 2x1 grid packed full: nothing can ever move
        let mut sim = without_chemistry(2, 1, MovementStrategy::AtomsOnly);
        sim.add_atom(0, 0, 0).unwrap();
        sim.add_atom(1, 0, 1).unwrap();
        let before = sim.snapshot().atoms;
        for _ in 0..10 {
            let report = sim.advance_tick().unwrap();
            assert_eq!(report.moves_attempted, 2);
            assert_eq!(report.moves_succeeded, 0);
        }
        assert_eq!(sim.snapshot().atoms, before);
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        let run = |seed| {
            let mut sim = seeded(12, 12, MovementStrategy::MoleculeBlocks, seed);
            add_ring(&mut sim);
            add_scattered_atoms(&mut sim, 20);
            for _ in 0..20 {
                sim.advance_tick().unwrap();
            }
            sim.snapshot()
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn move_block_validates_its_rectangle() {
        let mut sim = without_chemistry(4, 4, MovementStrategy::BlockSpace);
        let a = sim.add_atom(1, 1, 0).unwrap();
        assert!(matches!(
            sim.move_block(0, 0, 0, 3, 1, 0),
            Err(SimulationError::UnsupportedOperation(_))
        ));
        assert_eq!(sim.move_block(3, 3, 2, 2, -1, 0), Ok(false));
        assert_eq!(sim.move_block(0, 0, 2, 2, 1, 1), Ok(true));
        assert_eq!(sim.atom(a).unwrap().position(), (2, 2));
    }

    #[test]
    fn move_block_rejects_extents_and_offsets_beyond_i32() {
        let mut sim = without_chemistry(4, 4, MovementStrategy::BlockSpace);
        let a = sim.add_atom(1, 1, 0).unwrap();
        assert_eq!(sim.move_block(1, 0, i32::MAX, 1, 1, 0), Ok(false));
        assert_eq!(sim.move_block(2, 3, i32::MAX, i32::MAX, 0, 1), Ok(false));
        assert_eq!(sim.move_block(0, 0, 4, 4, i32::MAX, 0), Ok(false));
        assert_eq!(sim.move_block(0, 0, 4, 4, 0, i32::MIN), Ok(false));
        assert_eq!(sim.atom(a).unwrap().position(), (1, 1));
        assert!(sim.verify_invariants().is_ok());
    }

    #[test]
    fn snapshot_reflects_counts() {
        let mut sim = seeded(6, 6, MovementStrategy::AllSubgraphs, 11);
        let a = sim.add_atom(2, 2, 0).unwrap();
        let b = sim.add_atom(3, 3, 0).unwrap();
        sim.make_bond(a, b, Neighborhood::Moore).unwrap();
        let snapshot = sim.snapshot();
        assert_eq!((snapshot.width, snapshot.height), (6, 6));
        assert_eq!(snapshot.atoms.len(), 2);
        assert_eq!(snapshot.bonds.len(), 1);
        assert_eq!(snapshot.group_count, 3);
        assert_eq!(snapshot.atom_at(3, 3).map(|atom| atom.atom_type), Some(0));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let result = Simulation::new(0, 3, MovementStrategy::AtomsOnly);
        assert!(matches!(result, Err(SimulationError::Config { .. })));
    }
}
