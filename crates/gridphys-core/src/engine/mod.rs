//! # Engine Module
//!
//! The stateful simulation built on the [`core`](crate::core) data model.
//!
//! ## Overview
//!
//! One tick is a movement pass followed by a chemistry pass. The movement pass translates
//! groups of atoms (or rectangles of the grid) by random offsets, committing a move only when
//! no bond would be over-stretched and no atom would leave the grid or land on another atom.
//! The chemistry pass then bonds adjacent atoms of the same type that are not yet saturated.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Grid size, movement strategy, neighborhoods and chemistry
//! - **Error Handling** ([`error`]) - The error type of every fallible operation
//! - **Group Derivation** ([`groups`]) - Movable groups derived from the bond graph
//! - **Movement** ([`movement`]) - Constrained translation of atom sets and grid blocks
//! - **Chemistry** ([`chemistry`]) - Bond formation between compatible neighbors
//! - **Simulation** ([`simulation`]) - The facade owning the world and its random source
//! - **State** ([`state`]) - Tick reports and read-only snapshots
//! - **Progress Monitoring** ([`progress`]) - Progress callbacks for long runs

pub mod chemistry;
pub mod config;
pub mod error;
pub mod groups;
pub mod movement;
pub mod progress;
pub mod simulation;
pub mod state;
pub(crate) mod utils;
