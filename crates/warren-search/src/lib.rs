//! Incremental graph search over warren grids.
//!
//! This crate provides the stepwise search engine a visualizer drives one
//! discovery at a time:
//!
//! - **BFS** — FIFO frontier, shortest path by edge count.
//! - **A\*** — min-f frontier with lazy deletion, Manhattan heuristic.
//!
//! A [`Search`] is created per query, seeded with [`Search::start`], and
//! advanced with [`Search::step`] once per external tick until it reports
//! [`Status::Found`] or [`Status::Exhausted`]. Progress (discovery tree,
//! frontier membership, final path) is readable at any point for display.
//!
//! Adjacency comes from the [`Topology`] trait, implemented here for
//! [`warren_core::Grid`] in terms of its open walls.

mod distance;
mod engine;
mod traits;

pub use distance::manhattan;
pub use engine::{Algorithm, Search, SearchError, Status};
pub use traits::Topology;
