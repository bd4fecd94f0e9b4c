use crate::cli::RunArgs;
use crate::config::{AppConfig, PartialRunConfig};
use crate::error::Result;
use crate::render::render_frame;
use crate::utils::progress::CliProgressHandler;
use gridphys::{
    engine::progress::{Progress, ProgressReporter},
    engine::simulation::Simulation,
    workflows::{self, run::RunSummary},
};
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let app = partial_config.merge_with_cli(&args)?;

    let summary = simulate(&app)?;
    print_summary(&summary);
    Ok(())
}

fn simulate(app: &AppConfig) -> Result<RunSummary> {
    let mut simulation = Simulation::seeded(app.simulation.clone(), app.seed)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    reporter.report(Progress::PhaseStart {
        name: "Seeding scene",
    });
    let seeded = workflows::scenes::seed(&mut simulation, app.scene)?;
    reporter.report(Progress::PhaseFinish);
    if app.check {
        simulation.verify_invariants()?;
    }

    println!(
        "Seeded '{}' with {} atom(s) and {} bond(s) on a {}x{} arena (seed {}, {}).",
        app.scene,
        seeded.atoms,
        seeded.bonds,
        simulation.width(),
        simulation.height(),
        app.seed,
        app.simulation.movement_strategy
    );

    let render_every = app.render_every;
    let check = app.check;
    let summary = workflows::run::run(&mut simulation, app.ticks, &reporter, |report, sim| {
        if check {
            sim.verify_invariants()?;
        }
        if render_every > 0 && report.tick % render_every == 0 {
            progress_handler.print_frame(&render_frame(sim));
        }
        Ok(())
    })?;

    let final_frame_shown = render_every > 0 && app.ticks > 0 && app.ticks % render_every == 0;
    if !final_frame_shown {
        progress_handler.print_frame(&render_frame(&simulation));
    }
    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    println!("Run complete after {} tick(s).", summary.ticks);
    println!(
        "  Moves: {} attempted, {} succeeded ({:.1}%)",
        summary.moves_attempted,
        summary.moves_succeeded,
        summary.acceptance_rate() * 100.0
    );
    println!("  Bonds formed: {}", summary.bonds_formed);
    println!(
        "  Final state: {} atom(s), {} bond(s), {} group(s)",
        summary.atoms, summary.bonds, summary.groups
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridphys::engine::config::MovementStrategy;
    use gridphys::workflows::scenes::Scene;

    fn app_config(extra: impl FnOnce(&mut RunArgs)) -> AppConfig {
        let mut args = RunArgs {
            width: Some(40),
            height: Some(30),
            ticks: Some(15),
            seed: Some(5),
            check: true,
            ..Default::default()
        };
        extra(&mut args);
        PartialRunConfig::default().merge_with_cli(&args).unwrap()
    }

    #[test]
    fn simulate_runs_every_strategy_with_checks_enabled() {
        for strategy in MovementStrategy::ALL {
            let app = app_config(|args| {
                args.strategy = Some(strategy);
                args.scene = Some(Scene::Demo);
            });
            let summary = simulate(&app).unwrap();
            assert_eq!(summary.ticks, 15);
            assert!(summary.atoms > 0);
        }
    }

    #[test]
    fn simulate_is_reproducible_for_a_seed() {
        let app = app_config(|args| args.scene = Some(Scene::Soup));
        assert_eq!(simulate(&app).unwrap(), simulate(&app).unwrap());
    }

    #[test]
    fn scene_too_large_for_the_arena_fails() {
        let app = app_config(|args| {
            args.width = Some(10);
            args.height = Some(10);
            args.scene = Some(Scene::Demo);
        });
        assert!(simulate(&app).is_err());
    }
}
