use clap::{Args, Parser, Subcommand};
use gridphys::engine::config::MovementStrategy;
use gridphys::workflows::scenes::Scene;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "GridPhys Developers",
    version,
    about = "GridPhys CLI - Run bonded-atom simulations on a 2D occupancy grid and watch them in the terminal.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed an arena with a scene and advance it tick by tick.
    Run(RunArgs),
    /// List the available scene presets.
    Scenes,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Arena Overrides ---
    /// Override the arena width in cells.
    #[arg(long, value_name = "INT")]
    pub width: Option<usize>,

    /// Override the arena height in cells.
    #[arg(long, value_name = "INT")]
    pub height: Option<usize>,

    /// Override the movement strategy
    /// (atoms-only, all-subgraphs, block-space, molecule-blocks).
    #[arg(short, long, value_name = "NAME")]
    pub strategy: Option<MovementStrategy>,

    /// Disable the chemistry pass, overriding the config file.
    #[arg(long)]
    pub no_chemistry: bool,

    // --- Run Overrides ---
    /// Override the number of ticks to run.
    #[arg(short, long, value_name = "INT")]
    pub ticks: Option<u64>,

    /// Seed for the random generator. A random seed is drawn and logged when absent.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the scene placed before the first tick.
    #[arg(long, value_name = "NAME")]
    pub scene: Option<Scene>,

    /// Print the arena every N ticks (0 prints only the final frame).
    #[arg(short, long, value_name = "INT")]
    pub render_every: Option<u64>,

    /// Verify all simulation invariants after every tick.
    #[arg(long)]
    pub check: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S chemistry.saturation-threshold=3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
