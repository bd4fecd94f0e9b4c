mod defaults;
mod models;

pub use models::AppConfig;

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use gridphys::core::models::topology::Neighborhood;
use gridphys::engine::config::{
    ChemistryConfig, DEFAULT_BLOCKS_PER_TICK, MovementStrategy, ReactionSampling,
    SimulationConfigBuilder,
};
use gridphys::workflows::scenes::Scene;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialArenaConfig {
    width: Option<usize>,
    height: Option<usize>,
    strategy: Option<MovementStrategy>,
    movement_neighborhood: Option<Neighborhood>,
    blocks_per_tick: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialChemistryConfig {
    enabled: Option<bool>,
    neighborhood: Option<Neighborhood>,
    bond_neighborhood: Option<Neighborhood>,
    saturation_threshold: Option<usize>,
    sampling: Option<ReactionSampling>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialRunSection {
    ticks: Option<u64>,
    seed: Option<u64>,
    scene: Option<Scene>,
    render_every: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    arena: Option<PartialArenaConfig>,
    chemistry: Option<PartialChemistryConfig>,
    run: Option<PartialRunSection>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;

        let defaults = DefaultsConfig::default();
        let arena = self.arena.take().unwrap_or_default();
        let chem = self.chemistry.take().unwrap_or_default();
        let run = self.run.take().unwrap_or_default();

        let chemistry_defaults = ChemistryConfig::default();
        let chemistry = ChemistryConfig {
            enabled: !args.no_chemistry && chem.enabled.unwrap_or(chemistry_defaults.enabled),
            neighborhood: chem.neighborhood.unwrap_or(chemistry_defaults.neighborhood),
            bond_neighborhood: chem
                .bond_neighborhood
                .unwrap_or(chemistry_defaults.bond_neighborhood),
            saturation_threshold: chem
                .saturation_threshold
                .unwrap_or(chemistry_defaults.saturation_threshold),
            sampling: chem.sampling.unwrap_or(chemistry_defaults.sampling),
        };

        let simulation = SimulationConfigBuilder::new()
            .width(args.width.or(arena.width).unwrap_or(defaults.width))
            .height(args.height.or(arena.height).unwrap_or(defaults.height))
            .movement_strategy(args.strategy.or(arena.strategy).unwrap_or(defaults.strategy))
            .movement_neighborhood(
                arena
                    .movement_neighborhood
                    .unwrap_or(defaults.movement_neighborhood),
            )
            .blocks_per_tick(arena.blocks_per_tick.unwrap_or(DEFAULT_BLOCKS_PER_TICK))
            .chemistry(chemistry)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let seed = match args.seed.or(run.seed) {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!("No seed given; using {}.", seed);
                seed
            }
        };

        Ok(AppConfig {
            simulation,
            ticks: args.ticks.or(run.ticks).unwrap_or(defaults.ticks),
            seed,
            scene: args.scene.or(run.scene).unwrap_or(defaults.scene),
            render_every: args
                .render_every
                .or(run.render_every)
                .unwrap_or(defaults.render_every),
            check: args.check,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "arena.width" => self.arena_mut().width = Some(parse_value(key, value_str)?),
                "arena.height" => self.arena_mut().height = Some(parse_value(key, value_str)?),
                "arena.strategy" => {
                    self.arena_mut().strategy = Some(parse_value(key, value_str)?)
                }
                "arena.movement-neighborhood" => {
                    self.arena_mut().movement_neighborhood = Some(parse_value(key, value_str)?)
                }
                "arena.blocks-per-tick" => {
                    self.arena_mut().blocks_per_tick = Some(parse_value(key, value_str)?)
                }
                "chemistry.enabled" => {
                    self.chemistry_mut().enabled = Some(parse_value(key, value_str)?)
                }
                "chemistry.neighborhood" => {
                    self.chemistry_mut().neighborhood = Some(parse_value(key, value_str)?)
                }
                "chemistry.bond-neighborhood" => {
                    self.chemistry_mut().bond_neighborhood = Some(parse_value(key, value_str)?)
                }
                "chemistry.saturation-threshold" => {
                    self.chemistry_mut().saturation_threshold =
                        Some(parse_value(key, value_str)?)
                }
                "chemistry.sampling" => {
                    self.chemistry_mut().sampling = Some(parse_value(key, value_str)?)
                }
                "run.ticks" => self.run_mut().ticks = Some(parse_value(key, value_str)?),
                "run.seed" => self.run_mut().seed = Some(parse_value(key, value_str)?),
                "run.scene" => self.run_mut().scene = Some(parse_value(key, value_str)?),
                "run.render-every" => {
                    self.run_mut().render_every = Some(parse_value(key, value_str)?)
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn arena_mut(&mut self) -> &mut PartialArenaConfig {
        self.arena.get_or_insert_with(Default::default)
    }

    fn chemistry_mut(&mut self) -> &mut PartialChemistryConfig {
        self.chemistry.get_or_insert_with(Default::default)
    }

    fn run_mut(&mut self) -> &mut PartialRunSection {
        self.run.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}
