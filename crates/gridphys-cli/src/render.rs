use gridphys::engine::simulation::Simulation;
use rand::Rng;
use std::fmt::Write;

const EMPTY_CELL: char = '.';
const WIDE_TYPE: char = '#';

/// Draws the arena as text, one character per cell, below a one-line header.
pub fn render_frame<R: Rng>(simulation: &Simulation<R>) -> String {
    let mut frame = String::with_capacity((simulation.width() + 1) * (simulation.height() + 1));
    let _ = writeln!(
        frame,
        "tick {} | atoms {} | bonds {} | groups {}",
        simulation.tick(),
        simulation.atom_count(),
        simulation.bonds().len(),
        simulation.group_count()
    );

    let grid = simulation.arena().grid();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid
                .occupant(x, y)
                .and_then(|id| simulation.atom(id))
                .map_or(EMPTY_CELL, |atom| {
                    char::from_digit(atom.atom_type, 10).unwrap_or(WIDE_TYPE)
                });
            frame.push(cell);
        }
        frame.push('\n');
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridphys::engine::config::{MovementStrategy, SimulationConfig};

    fn simulation(width: usize, height: usize) -> Simulation {
        let config = SimulationConfig::new(width, height, MovementStrategy::AtomsOnly).unwrap();
        Simulation::seeded(config, 3).unwrap()
    }

    #[test]
    fn empty_arena_renders_dots_under_a_header() {
        let sim = simulation(3, 2);
        assert_eq!(
            render_frame(&sim),
            "tick 0 | atoms 0 | bonds 0 | groups 0\n...\n...\n"
        );
    }

    #[test]
    fn atoms_render_as_their_type_digit() {
        let mut sim = simulation(4, 2);
        sim.add_atom(0, 0, 7).unwrap();
        sim.add_atom(3, 1, 0).unwrap();
        sim.add_atom(1, 1, 12).unwrap();
        let frame = render_frame(&sim);
        let rows: Vec<&str> = frame.lines().skip(1).collect();
        assert_eq!(rows, vec!["7...", ".#.0"]);
        assert!(frame.starts_with("tick 0 | atoms 3 | bonds 0 | groups 3"));
    }
}
