//! Utility functions for the engine module.
//!
//! Random draws shared by the movement and chemistry passes live here so that every random
//! decision goes through the simulation's injected generator.

pub mod sampling;
