//! The maze [`Grid`]: a rectangular array of walled cells.
//!
//! The grid owns the wall and visited state that maze generation mutates
//! and graph search reads. Its shape is fixed at construction; only wall
//! and visited flags change over its lifetime, and [`Grid::reset`] restores
//! the fully-sealed starting state without reallocating.

use std::fmt;

use crate::cell::{Cell, Side};
use crate::geom::Point;

/// Errors produced by grid construction and wall mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The cell buffer (or an auxiliary buffer sized from it) could not be
    /// allocated.
    Allocation,
    /// A grid dimension was zero or negative.
    BadDimensions { width: i32, height: i32 },
    /// A position lies outside the grid.
    OutOfBounds(Point),
    /// A wall operation was requested between two non-adjacent cells.
    NotAdjacent(Point, Point),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation => write!(f, "grid: allocation failed"),
            Self::BadDimensions { width, height } => {
                write!(f, "grid: bad dimensions {width}x{height}")
            }
            Self::OutOfBounds(p) => write!(f, "grid: position {p} out of bounds"),
            Self::NotAdjacent(a, b) => write!(f, "grid: {a} and {b} are not adjacent"),
        }
    }
}

impl std::error::Error for GridError {}

/// A `width × height` rectangular grid of [`Cell`]s, row-major.
///
/// Every cell starts with all four walls present. Wall removal always
/// updates both facing cells together, so the wall between any adjacent
/// pair is symmetric at every observable moment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a fully-sealed grid.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::BadDimensions { width, height });
        }
        let len = width as usize * height as usize;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::Allocation)?;
        cells.resize(len, Cell::default());
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells. Always false for a constructed grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// The cell at `p`, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Cell> {
        if !self.contains(p) {
            return None;
        }
        Some(self.cells[self.index(p)])
    }

    /// Mark `p` visited. Out-of-bounds points are ignored.
    pub fn visit(&mut self, p: Point) {
        if self.contains(p) {
            let idx = self.index(p);
            self.cells[idx].visited = true;
        }
    }

    /// Whether `p` has been visited by generation.
    pub fn is_visited(&self, p: Point) -> bool {
        self.at(p).is_some_and(|c| c.visited)
    }

    /// Append the grid-adjacent neighbors of `p` whose `visited` flag is
    /// clear, in canonical side order. Used only by maze generation.
    pub fn neighbors_unvisited(&self, p: Point, buf: &mut Vec<Point>) {
        for side in Side::ALL {
            let n = p + side.delta();
            if self.contains(n) && !self.cells[self.index(n)].visited {
                buf.push(n);
            }
        }
    }

    /// Append the neighbors of `p` reachable through a removed wall, in
    /// canonical side order (top, right, bottom, left). The fixed order is
    /// what makes search tie-breaking deterministic.
    pub fn neighbors_open(&self, p: Point, buf: &mut Vec<Point>) {
        if !self.contains(p) {
            return;
        }
        let walls = self.cells[self.index(p)].walls;
        for side in Side::ALL {
            if walls.has(side) {
                continue;
            }
            let n = p + side.delta();
            if self.contains(n) {
                buf.push(n);
            }
        }
    }

    /// Remove the wall pair between two adjacent cells.
    ///
    /// Both facing walls are cleared in the same call, so the symmetry
    /// invariant holds at every return point.
    pub fn remove_wall_between(&mut self, a: Point, b: Point) -> Result<(), GridError> {
        if !self.contains(a) {
            return Err(GridError::OutOfBounds(a));
        }
        if !self.contains(b) {
            return Err(GridError::OutOfBounds(b));
        }
        let side = Side::between(a, b).ok_or(GridError::NotAdjacent(a, b))?;
        let ai = self.index(a);
        let bi = self.index(b);
        self.cells[ai].walls.open(side);
        self.cells[bi].walls.open(side.opposite());
        Ok(())
    }

    /// Restore every cell to all-walls-present and unvisited, keeping the
    /// existing allocation. Prepares the grid for regeneration.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::default();
        }
    }

    /// Number of inter-cell wall pairs that have been removed.
    ///
    /// A perfect maze over this grid has exactly `len() - 1` of them.
    pub fn open_wall_pairs(&self) -> usize {
        // Each removed pair contributes one open side to both cells; border
        // sides are never opened.
        let open_sides: u32 = self.cells.iter().map(|c| 4 - c.walls.count()).sum();
        open_sides as usize / 2
    }

    /// Row-major iterator over `(Point, Cell)` pairs, for wall rendering.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, &c)| {
            let p = Point::new(i as i32 % width, i as i32 / width);
            (p, c)
        })
    }
}
