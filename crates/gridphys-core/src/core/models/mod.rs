//! # Core Models Module
//!
//! Data structures for the grid world.
//!
//! ## Key Components
//!
//! - [`ids`] - Stable atom identifiers
//! - [`atom`] - A positioned, typed atom and its bond list
//! - [`error`] - Precondition errors of the grid and the store
//! - [`topology`] - Bonds and the neighborhood classes that bound them
//! - [`grid`] - The dense occupancy table
//! - [`arena`] - The atom/bond store, kept in lockstep with the grid
//!
//! ## Usage
//!
//! ```ignore
//! use gridphys::core::models::{arena::Arena, topology::Neighborhood};
//!
//! let mut arena = Arena::new(5, 5);
//! let a = arena.add_atom(1, 1, 0)?;
//! let b = arena.add_atom(2, 1, 0)?;
//! arena.make_bond(a, b, Neighborhood::VonNeumann)?;
//! ```

pub mod arena;
pub mod atom;
pub mod error;
pub mod grid;
pub mod ids;
pub mod topology;
