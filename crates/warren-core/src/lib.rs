//! **warren-core** — maze grid data model.
//!
//! This crate provides the foundational types shared across the *warren*
//! workspace: the [`Point`] geometry primitive, per-cell wall state
//! ([`Side`], [`Walls`], [`Cell`]) and the [`Grid`] of cells that maze
//! generation carves and graph search walks.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{Cell, Side, Walls};
pub use geom::Point;
pub use grid::{Grid, GridError};
