//! High-level procedures built on the engine.
//!
//! - [`run`] - Advance a simulation for a number of ticks with progress reporting
//! - [`scenes`] - Seed a simulation with predefined atom/bond assemblies

pub mod run;
pub mod scenes;
