use crate::core::models::atom::AtomType;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::Neighborhood;
use crate::engine::error::SimulationError;
use crate::engine::simulation::Simulation;
use rand::Rng;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const SOUP_TYPE_COUNT: AtomType = 6;
const DEMO_SOUP_ATTEMPTS: usize = 500;

/// Predefined starting assemblies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Scene {
    /// Nothing is placed.
    Empty,
    /// A closed ring of eight atoms mixing side and diagonal bonds.
    Loop,
    /// A 3×3 block with two diagonal arms.
    FlailingBox,
    /// Two bonded columns of six atoms with rungs between them.
    DoubleStrand,
    /// Two parallel chains of ten atoms joined at the top.
    Ladder,
    /// Loose atoms of random types scattered over the arena.
    Soup,
    /// Every assembly above side by side, followed by a soup.
    #[default]
    Demo,
}

impl Scene {
    pub const ALL: [Scene; 7] = [
        Scene::Empty,
        Scene::Loop,
        Scene::FlailingBox,
        Scene::DoubleStrand,
        Scene::Ladder,
        Scene::Soup,
        Scene::Demo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scene::Empty => "empty",
            Scene::Loop => "loop",
            Scene::FlailingBox => "flailing-box",
            Scene::DoubleStrand => "double-strand",
            Scene::Ladder => "ladder",
            Scene::Soup => "soup",
            Scene::Demo => "demo",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scene::Empty => "an empty arena",
            Scene::Loop => "a ring of eight type-0 atoms",
            Scene::FlailingBox => "a 3x3 type-1 box with two diagonal arms",
            Scene::DoubleStrand => "two strands of six atoms (types 5 and 3) joined by rungs",
            Scene::Ladder => "two type-2 chains of ten atoms",
            Scene::Soup => "unbonded atoms of random types covering about a tenth of the arena",
            Scene::Demo => "every assembly plus a 500-attempt soup",
        }
    }

    /// Smallest arena, as `(width, height)`, the scene fits in.
    pub fn min_dimensions(self) -> (usize, usize) {
        match self {
            Scene::Empty | Scene::Soup => (1, 1),
            Scene::Loop => (LOOP_SIZE.0 + 1, LOOP_SIZE.1 + 1),
            Scene::FlailingBox => (BOX_SIZE.0 + 1, BOX_SIZE.1 + 1),
            Scene::DoubleStrand => (STRAND_SIZE.0 + 1, STRAND_SIZE.1 + 1),
            Scene::Ladder => (LADDER_SIZE.0 + 1, LADDER_SIZE.1 + 1),
            Scene::Demo => (33, 27),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown scene '{name}' (expected one of: {expected})")]
pub struct ParseSceneError {
    name: String,
    expected: String,
}

impl ParseSceneError {
    fn new(name: &str) -> Self {
        let expected: Vec<&str> = Scene::ALL.iter().map(|scene| scene.name()).collect();
        Self {
            name: name.to_string(),
            expected: expected.join(", "),
        }
    }
}

impl FromStr for Scene {
    type Err = ParseSceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Scene::ALL
            .into_iter()
            .find(|scene| scene.name() == normalized)
            .ok_or_else(|| ParseSceneError::new(s))
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Atoms and bonds added by a call to [`seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub atoms: usize,
    pub bonds: usize,
}

/// Places `scene` into `simulation`.
///
/// Single assemblies are placed one cell away from the top-left corner. The soup draws its
/// positions and types from the simulation's own generator, so a seeded simulation always
/// receives the same soup.
///
/// # Errors
///
/// Returns [`SimulationError::UnsupportedOperation`] if the arena is smaller than
/// [`Scene::min_dimensions`]. Cells already occupied by earlier atoms make placement fail with
/// an arena error.
#[instrument(skip(simulation), name = "seed_scene")]
pub fn seed<R: Rng>(
    simulation: &mut Simulation<R>,
    scene: Scene,
) -> Result<SeedSummary, SimulationError> {
    let (min_width, min_height) = scene.min_dimensions();
    if simulation.width() < min_width || simulation.height() < min_height {
        return Err(SimulationError::UnsupportedOperation(format!(
            "scene '{}' needs an arena of at least {}x{}, got {}x{}",
            scene,
            min_width,
            min_height,
            simulation.width(),
            simulation.height()
        )));
    }

    let atoms_before = simulation.atom_count();
    let bonds_before = simulation.bonds().len();

    match scene {
        Scene::Empty => {}
        Scene::Loop => place_loop(simulation, 1, 1)?,
        Scene::FlailingBox => place_flailing_box(simulation, 1, 1)?,
        Scene::DoubleStrand => place_double_strand(simulation, 1, 1)?,
        Scene::Ladder => place_ladder(simulation, 1, 1)?,
        Scene::Soup => {
            let attempts = (simulation.width() * simulation.height()).div_ceil(10);
            scatter_soup(simulation, attempts)?;
        }
        Scene::Demo => {
            place_loop(simulation, 0, 0)?;
            place_flailing_box(simulation, 7, 7)?;
            place_double_strand(simulation, 21, 21)?;
            place_ladder(simulation, 31, 0)?;
            scatter_soup(simulation, DEMO_SOUP_ATTEMPTS)?;
        }
    }

    let summary = SeedSummary {
        atoms: simulation.atom_count() - atoms_before,
        bonds: simulation.bonds().len() - bonds_before,
    };
    info!(
        "Seeded scene '{}' with {} atom(s) and {} bond(s).",
        scene, summary.atoms, summary.bonds
    );
    Ok(summary)
}

/// Tries `attempts` random cells and drops an atom of random type on each free one.
///
/// Returns the number of atoms placed.
pub fn scatter_soup<R: Rng>(
    simulation: &mut Simulation<R>,
    attempts: usize,
) -> Result<usize, SimulationError> {
    let width = simulation.width() as i32;
    let height = simulation.height() as i32;
    let mut placed = 0;
    for _ in 0..attempts {
        let rng = simulation.rng_mut();
        let x = rng.gen_range(0..width);
        let y = rng.gen_range(0..height);
        let atom_type = rng.gen_range(0..SOUP_TYPE_COUNT);
        if !simulation.has_atom(x, y)? {
            simulation.add_atom(x, y, atom_type)?;
            placed += 1;
        }
    }
    if placed == 0 && attempts > 0 {
        warn!(attempts, "Soup found no free cells");
    }
    debug!(attempts, placed, "Scattered soup");
    Ok(placed)
}

const LOOP_SIZE: (usize, usize) = (3, 4);
const BOX_SIZE: (usize, usize) = (7, 6);
const STRAND_SIZE: (usize, usize) = (2, 6);
const LADDER_SIZE: (usize, usize) = (2, 10);

fn place<R: Rng>(
    simulation: &mut Simulation<R>,
    origin: (i32, i32),
    cells: &[(i32, i32)],
    atom_type: AtomType,
) -> Result<Vec<AtomId>, SimulationError> {
    cells
        .iter()
        .map(|&(x, y)| simulation.add_atom(origin.0 + x, origin.1 + y, atom_type))
        .collect()
}

fn bond_all<R: Rng>(
    simulation: &mut Simulation<R>,
    ids: &[AtomId],
    pairs: &[(usize, usize, Neighborhood)],
) -> Result<(), SimulationError> {
    for &(a, b, neighborhood) in pairs {
        simulation.make_bond(ids[a], ids[b], neighborhood)?;
    }
    Ok(())
}

fn place_loop<R: Rng>(
    simulation: &mut Simulation<R>,
    x: i32,
    y: i32,
) -> Result<(), SimulationError> {
    use Neighborhood::{Moore, VonNeumann};
    let ids = place(
        simulation,
        (x, y),
        &[
            (1, 1),
            (2, 1),
            (2, 2),
            (1, 2),
            (1, 3),
            (0, 3),
            (0, 2),
            (0, 1),
        ],
        0,
    )?;
    bond_all(
        simulation,
        &ids,
        &[
            (0, 1, VonNeumann),
            (1, 2, VonNeumann),
            (2, 3, Moore),
            (3, 4, Moore),
            (4, 5, VonNeumann),
            (5, 6, Moore),
            (6, 7, VonNeumann),
            (7, 0, Moore),
        ],
    )
}

fn place_flailing_box<R: Rng>(
    simulation: &mut Simulation<R>,
    x: i32,
    y: i32,
) -> Result<(), SimulationError> {
    use Neighborhood::{Moore, VonNeumann};
    // Nine box cells, then the three arms from the box outward.
    let ids = place(
        simulation,
        (x, y),
        &[
            (3, 3),
            (4, 3),
            (5, 3),
            (5, 4),
            (4, 4),
            (3, 4),
            (3, 5),
            (4, 5),
            (5, 5),
            (2, 2),
            (1, 1),
            (0, 0),
            (4, 2),
            (5, 1),
            (6, 0),
        ],
        1,
    )?;
    bond_all(
        simulation,
        &ids,
        &[
            (0, 1, VonNeumann),
            (1, 2, VonNeumann),
            (2, 3, VonNeumann),
            (3, 4, VonNeumann),
            (4, 5, VonNeumann),
            (5, 6, VonNeumann),
            (6, 7, VonNeumann),
            (7, 8, VonNeumann),
            (0, 9, Moore),
            (9, 10, Moore),
            (10, 11, Moore),
            (2, 12, Moore),
            (12, 13, Moore),
            (13, 14, Moore),
        ],
    )
}

fn place_double_strand<R: Rng>(
    simulation: &mut Simulation<R>,
    x: i32,
    y: i32,
) -> Result<(), SimulationError> {
    let rows = STRAND_SIZE.1 as i32;
    let mut left = Vec::with_capacity(rows as usize);
    let mut right = Vec::with_capacity(rows as usize);
    for row in 0..rows {
        left.push(simulation.add_atom(x, y + row, 5)?);
        right.push(simulation.add_atom(x + 1, y + row, 3)?);
    }
    for (&l, &r) in left.iter().zip(&right) {
        simulation.make_bond(l, r, Neighborhood::Moore)?;
    }
    for row in 1..rows as usize {
        simulation.make_bond(left[row - 1], left[row], Neighborhood::Moore)?;
        simulation.make_bond(right[row - 1], right[row], Neighborhood::Moore)?;
    }
    Ok(())
}

fn place_ladder<R: Rng>(
    simulation: &mut Simulation<R>,
    x: i32,
    y: i32,
) -> Result<(), SimulationError> {
    let mut left = simulation.add_atom(x, y, 2)?;
    let mut right = simulation.add_atom(x + 1, y, 2)?;
    simulation.make_bond(left, right, Neighborhood::Moore)?;
    for row in 1..LADDER_SIZE.1 as i32 {
        let next_left = simulation.add_atom(x, y + row, 2)?;
        let next_right = simulation.add_atom(x + 1, y + row, 2)?;
        simulation.make_bond(left, next_left, Neighborhood::Moore)?;
        simulation.make_bond(right, next_right, Neighborhood::Moore)?;
        left = next_left;
        right = next_right;
    }
    Ok(())
}
