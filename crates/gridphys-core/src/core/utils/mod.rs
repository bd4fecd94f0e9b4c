//! Utility functions shared by the data model and the engine.

pub mod geometry;
