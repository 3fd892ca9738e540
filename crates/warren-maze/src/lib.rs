//! Randomized perfect-maze generation for warren grids.

pub mod carve;

pub use carve::MazeGen;
