use crate::core::models::topology::Neighborhood;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reference number of random blocks moved per tick by [`MovementStrategy::BlockSpace`].
pub const DEFAULT_BLOCKS_PER_TICK: usize = 10;
/// Bond-count sum below which two atoms may still react.
pub const DEFAULT_SATURATION_THRESHOLD: usize = 2;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How atoms are grouped into units that attempt to move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementStrategy {
    /// Every atom moves on its own; bonds only veto moves.
    AtomsOnly,
    /// Every connected sub-assembly reachable through new bonds gets its own group.
    AllSubgraphs,
    /// Random rectangles of the grid itself are moved, regardless of molecules.
    BlockSpace,
    /// One group per molecule, moved by recursive rectangular decomposition.
    #[default]
    MoleculeBlocks,
}

impl MovementStrategy {
    pub const ALL: [MovementStrategy; 4] = [
        MovementStrategy::AtomsOnly,
        MovementStrategy::AllSubgraphs,
        MovementStrategy::BlockSpace,
        MovementStrategy::MoleculeBlocks,
    ];
}

#[derive(Debug, Error)]
#[error("Invalid movement strategy string")]
pub struct ParseMovementStrategyError;

impl FromStr for MovementStrategy {
    type Err = ParseMovementStrategyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "atoms-only" | "atoms" => Ok(Self::AtomsOnly),
            "all-subgraphs" | "subgraphs" => Ok(Self::AllSubgraphs),
            "block-space" | "blocks" => Ok(Self::BlockSpace),
            "molecule-blocks" | "molecules" => Ok(Self::MoleculeBlocks),
            _ => Err(ParseMovementStrategyError),
        }
    }
}

impl fmt::Display for MovementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::AtomsOnly => "atoms-only",
                Self::AllSubgraphs => "all-subgraphs",
                Self::BlockSpace => "block-space",
                Self::MoleculeBlocks => "molecule-blocks",
            }
        )
    }
}

/// Which neighbor cells an atom inspects during one chemistry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactionSampling {
    /// One random cell of the chemistry neighborhood.
    #[default]
    RandomNeighbor,
    /// Every cell of the chemistry neighborhood.
    AllNeighbors,
}

impl FromStr for ReactionSampling {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "random-neighbor" | "random" => Ok(Self::RandomNeighbor),
            "all-neighbors" | "all" => Ok(Self::AllNeighbors),
            other => Err(ConfigError::InvalidParameter {
                name: "sampling",
                reason: format!("unknown reaction sampling '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChemistryConfig {
    pub enabled: bool,
    /// Cells considered adjacent for reactions.
    pub neighborhood: Neighborhood,
    /// Class of the bonds formed by reactions.
    pub bond_neighborhood: Neighborhood,
    /// Two atoms react only while the sum of their bond counts is below this.
    pub saturation_threshold: usize,
    pub sampling: ReactionSampling,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            neighborhood: Neighborhood::VonNeumann,
            bond_neighborhood: Neighborhood::Moore,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
            sampling: ReactionSampling::RandomNeighbor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub movement_strategy: MovementStrategy,
    /// Direction set for group and block moves.
    pub movement_neighborhood: Neighborhood,
    pub blocks_per_tick: usize,
    pub chemistry: ChemistryConfig,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    width: Option<usize>,
    height: Option<usize>,
    movement_strategy: Option<MovementStrategy>,
    movement_neighborhood: Option<Neighborhood>,
    blocks_per_tick: Option<usize>,
    chemistry: Option<ChemistryConfig>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
    pub fn height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }
    pub fn movement_strategy(mut self, strategy: MovementStrategy) -> Self {
        self.movement_strategy = Some(strategy);
        self
    }
    pub fn movement_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.movement_neighborhood = Some(neighborhood);
        self
    }
    pub fn blocks_per_tick(mut self, blocks: usize) -> Self {
        self.blocks_per_tick = Some(blocks);
        self
    }
    pub fn chemistry(mut self, chemistry: ChemistryConfig) -> Self {
        self.chemistry = Some(chemistry);
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let config = SimulationConfig {
            width: self.width.ok_or(ConfigError::MissingParameter("width"))?,
            height: self.height.ok_or(ConfigError::MissingParameter("height"))?,
            movement_strategy: self
                .movement_strategy
                .ok_or(ConfigError::MissingParameter("movement_strategy"))?,
            movement_neighborhood: self.movement_neighborhood.unwrap_or_default(),
            blocks_per_tick: self.blocks_per_tick.unwrap_or(DEFAULT_BLOCKS_PER_TICK),
            chemistry: self.chemistry.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl SimulationConfig {
    /// A configuration with every optional setting at its default.
    pub fn new(
        width: usize,
        height: usize,
        movement_strategy: MovementStrategy,
    ) -> Result<Self, ConfigError> {
        SimulationConfigBuilder::new()
            .dimensions(width, height)
            .movement_strategy(movement_strategy)
            .build()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > i32::MAX as usize {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be between 1 and {}, got {}", i32::MAX, value),
                });
            }
        }
        if self.movement_strategy == MovementStrategy::BlockSpace && self.blocks_per_tick == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "blocks_per_tick",
                reason: "block-space movement needs at least one block per tick".to_string(),
            });
        }
        if self.chemistry.saturation_threshold == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "saturation_threshold",
                reason: "must be at least 1; disable chemistry instead".to_string(),
            });
        }
        Ok(())
    }
}
