//! Maze carving via randomized iterative depth-first backtracking.
//!
//! The generator walks the grid with an explicit stack, always extending
//! from the most recently visited cell and removing the wall toward a
//! uniformly chosen unvisited neighbor, backtracking when a cell has none
//! left. Every cell is visited exactly once, so the carved passages form a
//! spanning tree of the grid graph: exactly one route between any two
//! cells, no loops.

use rand::{Rng, RngExt};
use warren_core::{Grid, GridError, Point};

/// Maze generator operating on a [`Grid`], generic over its random source.
///
/// All randomness the workspace consumes flows through `rng`, so a seeded
/// generator reproduces the same maze layout on every run.
pub struct MazeGen<R: Rng> {
    pub rng: R,
    pub grid: Grid,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator over the given grid.
    pub fn with_grid(grid: Grid, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Carve a perfect maze starting from the conventional origin (0, 0).
    pub fn carve(&mut self) -> Result<(), GridError> {
        self.carve_from(Point::ZERO)
    }

    /// Carve a perfect maze starting from `start`.
    ///
    /// Carving has no partial-success state: on error the grid walls are
    /// inconsistent and the caller must [`Grid::reset`] before reuse.
    pub fn carve_from(&mut self, start: Point) -> Result<(), GridError> {
        if !self.grid.contains(start) {
            return Err(GridError::OutOfBounds(start));
        }

        // The stack can hold every cell at once in the worst case (one long
        // corridor); reserving it up front makes growth failure surface
        // here instead of mid-carve.
        let mut stack: Vec<Point> = Vec::new();
        stack
            .try_reserve_exact(self.grid.len())
            .map_err(|_| GridError::Allocation)?;
        let mut nbuf: Vec<Point> = Vec::with_capacity(4);

        self.grid.visit(start);
        stack.push(start);

        while let Some(&current) = stack.last() {
            nbuf.clear();
            self.grid.neighbors_unvisited(current, &mut nbuf);
            if nbuf.is_empty() {
                stack.pop();
                continue;
            }
            let next = nbuf[self.rng.random_range(0..nbuf.len())];
            self.grid.remove_wall_between(current, next)?;
            self.grid.visit(next);
            stack.push(next);
        }

        log::debug!(
            "carved {} passages in a {}x{} maze",
            self.grid.open_wall_pairs(),
            self.grid.width(),
            self.grid.height()
        );
        Ok(())
    }
}
