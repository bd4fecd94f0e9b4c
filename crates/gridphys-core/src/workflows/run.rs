use crate::engine::error::SimulationError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulation::Simulation;
use crate::engine::state::TickReport;
use rand::Rng;
use tracing::{info, instrument};

/// Totals accumulated over a run, plus the final size of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub moves_attempted: u64,
    pub moves_succeeded: u64,
    pub bonds_formed: u64,
    pub atoms: usize,
    pub bonds: usize,
    pub groups: usize,
}

impl RunSummary {
    fn absorb(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.moves_attempted += report.moves_attempted as u64;
        self.moves_succeeded += report.moves_succeeded as u64;
        self.bonds_formed += report.bonds_formed as u64;
    }

    /// Fraction of movement attempts that displaced atoms.
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_attempted == 0 {
            0.0
        } else {
            self.moves_succeeded as f64 / self.moves_attempted as f64
        }
    }
}

/// Advances `simulation` by `ticks` ticks.
///
/// `on_tick` sees every tick's report together with the updated simulation; returning an error
/// from it stops the run.
#[instrument(skip_all, name = "run_workflow", fields(ticks = ticks))]
pub fn run<R, F>(
    simulation: &mut Simulation<R>,
    ticks: u64,
    reporter: &ProgressReporter,
    mut on_tick: F,
) -> Result<RunSummary, SimulationError>
where
    R: Rng,
    F: FnMut(&TickReport, &Simulation<R>) -> Result<(), SimulationError>,
{
    info!(
        "Running {} tick(s) on a {}x{} arena with {} atom(s) ({}).",
        ticks,
        simulation.width(),
        simulation.height(),
        simulation.atom_count(),
        simulation.config().movement_strategy
    );
    reporter.report(Progress::TaskStart { total_steps: ticks });

    let mut summary = RunSummary::default();
    for _ in 0..ticks {
        let report = simulation.advance_tick()?;
        summary.absorb(&report);
        on_tick(&report, simulation)?;
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::Message(format!(
        "{} tick(s), {} bond(s) formed",
        summary.ticks, summary.bonds_formed
    )));

    summary.atoms = simulation.atom_count();
    summary.bonds = simulation.bonds().len();
    summary.groups = simulation.group_count();
    info!(
        "Run complete: {} bond(s) formed, {:.1}% of moves accepted.",
        summary.bonds_formed,
        summary.acceptance_rate() * 100.0
    );
    Ok(summary)
}

/// [`run`] without a per-tick observer.
pub fn run_ticks<R: Rng>(
    simulation: &mut Simulation<R>,
    ticks: u64,
    reporter: &ProgressReporter,
) -> Result<RunSummary, SimulationError> {
    run(simulation, ticks, reporter, |_, _| Ok(()))
}
