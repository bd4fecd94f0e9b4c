//! # Core Module
//!
//! The fundamental data structures of the grid world. Nothing in this module draws random
//! numbers or knows about movement strategies; it only stores atoms, bonds and cell
//! occupancy and enforces the local preconditions for mutating them.
//!
//! - **Data Model** ([`models`]) - Atom identifiers, atoms, bonds, neighborhoods, the
//!   occupancy grid and the arena that ties them together
//! - **Utilities** ([`utils`]) - Integer geometry on the grid (offsets, distances, rectangles)

pub mod models;
pub mod utils;
