//! # GridPhys Core Library
//!
//! A discrete-time particle simulation on a bounded 2D grid. Point atoms occupy grid cells,
//! may be linked by bonds that limit how far apart their endpoints may drift, and are displaced
//! each tick by randomized moves that are only committed when they respect every bond and the
//! occupancy of the grid. A chemistry pass then forms new bonds between adjacent, compatible,
//! under-saturated atoms.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Plain data models: atoms, bonds, neighborhoods, the
//!   occupancy grid, and the [`Arena`](core::models::arena::Arena) that keeps them consistent.
//!
//! - **[`engine`]: The Logic Core.** The stateful simulation: group derivation for the four
//!   movement strategies, constrained movement, chemistry, configuration, and errors. The
//!   [`Simulation`](engine::simulation::Simulation) facade is the entry point for drivers.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the engine, such as
//!   running a number of ticks with progress reporting or seeding a predefined scene.
//!
//! ## Example
//!
//! ```
//! use gridphys::core::models::topology::Neighborhood;
//! use gridphys::engine::config::{MovementStrategy, SimulationConfigBuilder};
//! use gridphys::engine::simulation::Simulation;
//!
//! let config = SimulationConfigBuilder::new()
//!     .dimensions(10, 10)
//!     .movement_strategy(MovementStrategy::MoleculeBlocks)
//!     .build()
//!     .unwrap();
//! let mut sim = Simulation::seeded(config, 7).unwrap();
//!
//! let a = sim.add_atom(4, 4, 0).unwrap();
//! let b = sim.add_atom(5, 4, 0).unwrap();
//! sim.make_bond(a, b, Neighborhood::VonNeumann).unwrap();
//!
//! sim.advance_tick().unwrap();
//! assert!(sim.verify_invariants().is_ok());
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
