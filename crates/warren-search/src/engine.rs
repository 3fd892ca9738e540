//! The incremental search engine: [`Search`], its [`Status`] state machine
//! and the BFS / A* step implementations.
//!
//! Both algorithms share one representation: a flat per-cell node array
//! holding cost, parent index and a generation counter. Bumping the
//! generation on [`Search::start`] lazily invalidates every node from the
//! previous run, so restarting allocates nothing. The A* frontier keeps
//! stale duplicate entries and skips them on pop (lazy deletion); only the
//! best entry for a cell is ever expanded, which preserves optimality.

use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

use warren_core::Point;

use crate::distance::manhattan;
use crate::traits::Topology;

/// Which search algorithm a [`Search`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Bfs,
    AStar,
}

/// Lifecycle of a [`Search`].
///
/// `Idle → Active → {Found | Exhausted}`. [`Search::step`] is a no-op in
/// `Idle` and in both terminal states, so a driver may call it once per
/// frame without special-casing completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Idle,
    Active,
    Found,
    Exhausted,
}

/// Errors produced by search construction and bookkeeping growth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The node array or a frontier structure could not be allocated.
    Allocation,
    /// A search dimension was zero or negative.
    BadDimensions { width: i32, height: i32 },
    /// Start or goal lies outside the searched rectangle.
    OutOfBounds(Point),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation => write!(f, "search: allocation failed"),
            Self::BadDimensions { width, height } => {
                write!(f, "search: bad dimensions {width}x{height}")
            }
            Self::OutOfBounds(p) => write!(f, "search: position {p} out of bounds"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Per-cell search bookkeeping.
#[derive(Clone, Debug)]
struct Node {
    g: i32,
    parent: usize,
    generation: u32,
    /// Discovered but not yet expanded (frontier membership).
    open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct FrontierRef {
    idx: usize,
    f: i32,
}

impl Ord for FrontierRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.cmp(&self.f)
    }
}

impl PartialOrd for FrontierRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An incremental single-query search over a `width × height` rectangle.
///
/// Adjacency is supplied per call through a [`Topology`], so the engine
/// holds no reference to the grid and the driver keeps full ownership.
#[derive(Debug)]
pub struct Search {
    algorithm: Algorithm,
    width: i32,
    height: i32,
    start: Point,
    goal: Point,
    status: Status,
    nodes: Vec<Node>,
    generation: u32,
    fifo: VecDeque<usize>,
    heap: BinaryHeap<FrontierRef>,
    path: Vec<Point>,
    nbuf: Vec<Point>,
}

impl Search {
    /// Create an idle search over a `width × height` rectangle.
    ///
    /// All bookkeeping the BFS variant can ever need is reserved here, so a
    /// running search only allocates when the A* frontier accumulates
    /// stale duplicates beyond its initial capacity.
    pub fn new(
        algorithm: Algorithm,
        width: i32,
        height: i32,
        start: Point,
        goal: Point,
    ) -> Result<Self, SearchError> {
        if width <= 0 || height <= 0 {
            return Err(SearchError::BadDimensions { width, height });
        }
        let in_bounds = |p: Point| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;
        if !in_bounds(start) {
            return Err(SearchError::OutOfBounds(start));
        }
        if !in_bounds(goal) {
            return Err(SearchError::OutOfBounds(goal));
        }

        let len = width as usize * height as usize;
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(len)
            .map_err(|_| SearchError::Allocation)?;
        nodes.resize(len, Node::default());

        let mut fifo = VecDeque::new();
        fifo.try_reserve_exact(len)
            .map_err(|_| SearchError::Allocation)?;
        let mut heap = BinaryHeap::new();
        heap.try_reserve(len).map_err(|_| SearchError::Allocation)?;

        Ok(Self {
            algorithm,
            width,
            height,
            start,
            goal,
            status: Status::Idle,
            nodes,
            generation: 0,
            fifo,
            heap,
            path: Vec::new(),
            nbuf: Vec::with_capacity(4),
        })
    }

    /// Begin (or restart) the search: clear all per-run state and seed the
    /// frontier with the start position. `Idle`/terminal → `Active`.
    pub fn start(&mut self) {
        // Bump generation to lazily invalidate all nodes.
        self.generation = self.generation.wrapping_add(1);
        self.fifo.clear();
        self.heap.clear();
        self.path.clear();

        let si = self.idx(self.start);
        let node = &mut self.nodes[si];
        node.g = 0;
        node.parent = usize::MAX;
        node.generation = self.generation;
        node.open = true;

        match self.algorithm {
            Algorithm::Bfs => self.fifo.push_back(si),
            Algorithm::AStar => self.heap.push(FrontierRef {
                idx: si,
                f: manhattan(self.start, self.goal),
            }),
        }
        self.status = Status::Active;
    }

    /// Perform exactly one discovery: dequeue the next candidate, finish if
    /// it is the goal, otherwise expand its neighbors.
    ///
    /// Returns the status after the step. A no-op unless `Active`, so the
    /// driver may keep calling once per tick after termination.
    pub fn step<T: Topology>(&mut self, topo: &T) -> Result<Status, SearchError> {
        if self.status != Status::Active {
            return Ok(self.status);
        }
        match self.algorithm {
            Algorithm::Bfs => self.step_bfs(topo),
            Algorithm::AStar => self.step_astar(topo)?,
        }
        Ok(self.status)
    }

    fn step_bfs<T: Topology>(&mut self, topo: &T) {
        let Some(ci) = self.fifo.pop_front() else {
            self.exhaust();
            return;
        };
        self.nodes[ci].open = false;
        if ci == self.idx(self.goal) {
            self.finish(ci);
            return;
        }

        let current_g = self.nodes[ci].g;
        let current = self.point(ci);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        topo.neighbors(current, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = self.idx_checked(np) else {
                continue;
            };
            let n = &mut self.nodes[ni];
            if n.generation == self.generation {
                // Already discovered; FIFO order guarantees the first
                // discovery was at minimal depth.
                continue;
            }
            n.generation = self.generation;
            n.g = current_g + 1;
            n.parent = ci;
            n.open = true;
            // Capacity for every cell was reserved up front.
            self.fifo.push_back(ni);
        }
        self.nbuf = nbuf;

        if self.fifo.is_empty() {
            self.exhaust();
        }
    }

    fn step_astar<T: Topology>(&mut self, topo: &T) -> Result<(), SearchError> {
        // Drain stale entries until a live candidate (or exhaustion); only
        // a live pop counts as the step's discovery.
        let ci = loop {
            let Some(current) = self.heap.pop() else {
                self.exhaust();
                return Ok(());
            };
            let n = &self.nodes[current.idx];
            if n.generation != self.generation || !n.open {
                continue;
            }
            break current.idx;
        };

        self.nodes[ci].open = false;
        if ci == self.idx(self.goal) {
            self.finish(ci);
            return Ok(());
        }

        let current_g = self.nodes[ci].g;
        let current = self.point(ci);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        topo.neighbors(current, &mut nbuf);

        // Stale duplicates can push the heap past its reserved capacity.
        if self.heap.try_reserve(nbuf.len()).is_err() {
            self.nbuf = nbuf;
            return Err(SearchError::Allocation);
        }

        for &np in nbuf.iter() {
            let Some(ni) = self.idx_checked(np) else {
                continue;
            };
            let tentative_g = current_g + 1;
            let n = &mut self.nodes[ni];
            if n.generation == self.generation && tentative_g >= n.g {
                continue;
            }
            n.generation = self.generation;
            n.g = tentative_g;
            n.parent = ci;
            n.open = true;
            self.heap.push(FrontierRef {
                idx: ni,
                f: tentative_g + manhattan(np, self.goal),
            });
        }
        self.nbuf = nbuf;

        if self.heap.is_empty() {
            self.exhaust();
        }
        Ok(())
    }

    /// Reconstruct the start→goal path from the discovery tree and enter
    /// `Found`.
    fn finish(&mut self, goal_idx: usize) {
        let start_idx = self.idx(self.start);
        self.path.clear();
        let mut ci = goal_idx;
        loop {
            self.path.push(self.point(ci));
            if ci == start_idx {
                break;
            }
            let parent = self.nodes[ci].parent;
            // A non-start cell was dequeued without ever being discovered
            // from somewhere; the discovery tree is corrupt.
            assert!(
                parent != usize::MAX,
                "discovery tree missing parent for {}",
                self.point(ci)
            );
            ci = parent;
        }
        self.path.reverse();
        self.status = Status::Found;
        log::trace!(
            "{:?} found a {}-cell path from {} to {}",
            self.algorithm,
            self.path.len(),
            self.start,
            self.goal
        );
    }

    fn exhaust(&mut self) {
        self.status = Status::Exhausted;
        log::trace!(
            "{:?} exhausted the frontier without reaching {}",
            self.algorithm,
            self.goal
        );
    }

    // -----------------------------------------------------------------------
    // Read-only views for the driver / renderer
    // -----------------------------------------------------------------------

    /// Current lifecycle state.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Which algorithm this search runs.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The start position.
    #[inline]
    pub fn start_pos(&self) -> Point {
        self.start
    }

    /// The goal position.
    #[inline]
    pub fn goal_pos(&self) -> Point {
        self.goal
    }

    /// Whether `p` has been discovered by the current run.
    pub fn discovered(&self, p: Point) -> bool {
        self.status != Status::Idle
            && self
                .idx_checked(p)
                .is_some_and(|i| self.nodes[i].generation == self.generation)
    }

    /// Whether `p` sits on the frontier: discovered but not yet expanded.
    pub fn in_frontier(&self, p: Point) -> bool {
        self.status != Status::Idle
            && self.idx_checked(p).is_some_and(|i| {
                let n = &self.nodes[i];
                n.generation == self.generation && n.open
            })
    }

    /// The position `p` was discovered from, if any. The start position and
    /// undiscovered positions have no parent.
    pub fn came_from(&self, p: Point) -> Option<Point> {
        if !self.discovered(p) {
            return None;
        }
        let parent = self.nodes[self.idx(p)].parent;
        (parent != usize::MAX).then(|| self.point(parent))
    }

    /// Best known cost from the start to `p`, if discovered.
    ///
    /// For BFS and terminal A* states this is the exact shortest distance
    /// to every expanded cell.
    pub fn distance(&self, p: Point) -> Option<i32> {
        self.discovered(p).then(|| self.nodes[self.idx(p)].g)
    }

    /// Iterate over the `(child, parent)` edges of the discovery tree, for
    /// drawing the explored region.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let live = self.status != Status::Idle;
        self.nodes.iter().enumerate().filter_map(move |(i, n)| {
            (live && n.generation == self.generation && n.parent != usize::MAX)
                .then(|| (self.point(i), self.point(n.parent)))
        })
    }

    /// The finished path, start→goal inclusive. Empty unless `Found`.
    #[inline]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    #[inline]
    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    #[inline]
    fn idx_checked(&self, p: Point) -> Option<usize> {
        (p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height).then(|| self.idx(p))
    }

    #[inline]
    fn point(&self, idx: usize) -> Point {
        Point::new(idx as i32 % self.width, idx as i32 / self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warren_core::Grid;

    /// A 2×2 grid carved as the tree (0,1)-(0,0)-(1,0)-(1,1).
    fn two_by_two() -> Grid {
        let mut g = Grid::new(2, 2).unwrap();
        g.remove_wall_between(Point::ZERO, Point::new(1, 0)).unwrap();
        g.remove_wall_between(Point::new(1, 0), Point::new(1, 1))
            .unwrap();
        g.remove_wall_between(Point::ZERO, Point::new(0, 1)).unwrap();
        g
    }

    fn run(search: &mut Search, grid: &Grid) -> Status {
        search.start();
        for _ in 0..4 * grid.len() {
            match search.step(grid).unwrap() {
                Status::Active => continue,
                terminal => return terminal,
            }
        }
        panic!("search did not terminate");
    }

    #[test]
    fn new_starts_idle() {
        let s = Search::new(Algorithm::Bfs, 4, 4, Point::ZERO, Point::new(3, 3)).unwrap();
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.algorithm(), Algorithm::Bfs);
        assert!(s.path().is_empty());
        assert!(!s.discovered(Point::ZERO));
        assert_eq!(s.edges().count(), 0);
    }

    #[test]
    fn new_validates_arguments() {
        assert_eq!(
            Search::new(Algorithm::Bfs, 0, 4, Point::ZERO, Point::ZERO).unwrap_err(),
            SearchError::BadDimensions {
                width: 0,
                height: 4
            }
        );
        assert_eq!(
            Search::new(Algorithm::Bfs, 4, 4, Point::new(4, 0), Point::ZERO).unwrap_err(),
            SearchError::OutOfBounds(Point::new(4, 0))
        );
        assert_eq!(
            Search::new(Algorithm::AStar, 4, 4, Point::ZERO, Point::new(0, -1)).unwrap_err(),
            SearchError::OutOfBounds(Point::new(0, -1))
        );
    }

    #[test]
    fn step_before_start_is_a_no_op() {
        let grid = two_by_two();
        let mut s = Search::new(Algorithm::Bfs, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
        assert_eq!(s.step(&grid).unwrap(), Status::Idle);
        assert!(!s.discovered(Point::ZERO));
    }

    #[test]
    fn bfs_finds_the_shortest_path() {
        let grid = two_by_two();
        let mut s = Search::new(Algorithm::Bfs, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
        assert_eq!(run(&mut s, &grid), Status::Found);
        assert_eq!(
            s.path(),
            &[Point::ZERO, Point::new(1, 0), Point::new(1, 1)]
        );
    }

    #[test]
    fn astar_matches_bfs_length() {
        let grid = two_by_two();
        let mut s = Search::new(Algorithm::AStar, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
        assert_eq!(run(&mut s, &grid), Status::Found);
        assert_eq!(s.path().len(), 3);
        assert_eq!(s.path()[0], Point::ZERO);
        assert_eq!(s.path()[2], Point::new(1, 1));
        assert_eq!(s.distance(Point::new(1, 1)), Some(2));
    }

    #[test]
    fn start_equals_goal() {
        let grid = two_by_two();
        for algorithm in [Algorithm::Bfs, Algorithm::AStar] {
            let mut s = Search::new(algorithm, 2, 2, Point::ZERO, Point::ZERO).unwrap();
            s.start();
            assert_eq!(s.step(&grid).unwrap(), Status::Found);
            assert_eq!(s.path(), &[Point::ZERO]);
        }
    }

    #[test]
    fn sealed_grid_exhausts() {
        let grid = Grid::new(2, 2).unwrap(); // no walls removed
        for algorithm in [Algorithm::Bfs, Algorithm::AStar] {
            let mut s = Search::new(algorithm, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
            assert_eq!(run(&mut s, &grid), Status::Exhausted);
            assert!(s.path().is_empty());
        }
    }

    #[test]
    fn terminal_step_is_idempotent() {
        let grid = two_by_two();
        let mut s = Search::new(Algorithm::Bfs, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
        assert_eq!(run(&mut s, &grid), Status::Found);
        let path: Vec<Point> = s.path().to_vec();
        let edges: Vec<(Point, Point)> = s.edges().collect();
        for _ in 0..3 {
            assert_eq!(s.step(&grid).unwrap(), Status::Found);
        }
        assert_eq!(s.path(), path.as_slice());
        assert_eq!(s.edges().collect::<Vec<_>>(), edges);
    }

    #[test]
    fn views_track_discovery() {
        let grid = two_by_two();
        let mut s = Search::new(Algorithm::Bfs, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
        s.start();
        assert!(s.discovered(Point::ZERO));
        assert!(s.in_frontier(Point::ZERO));
        assert_eq!(s.came_from(Point::ZERO), None);
        assert_eq!(s.distance(Point::ZERO), Some(0));

        // First step expands the start and discovers (1,0) and (0,1).
        assert_eq!(s.step(&grid).unwrap(), Status::Active);
        assert!(!s.in_frontier(Point::ZERO));
        assert!(s.discovered(Point::new(1, 0)));
        assert!(s.in_frontier(Point::new(1, 0)));
        assert_eq!(s.came_from(Point::new(1, 0)), Some(Point::ZERO));
        assert_eq!(s.came_from(Point::new(0, 1)), Some(Point::ZERO));
        assert!(!s.discovered(Point::new(1, 1)));
        assert_eq!(s.edges().count(), 2);
    }

    #[test]
    fn restart_resets_per_run_state() {
        let grid = two_by_two();
        let mut s = Search::new(Algorithm::AStar, 2, 2, Point::ZERO, Point::new(1, 1)).unwrap();
        assert_eq!(run(&mut s, &grid), Status::Found);
        let first: Vec<Point> = s.path().to_vec();

        s.start();
        assert_eq!(s.status(), Status::Active);
        assert!(s.path().is_empty());
        // Only the freshly seeded start is discovered after restart.
        assert!(s.discovered(Point::ZERO));
        assert!(!s.discovered(Point::new(1, 0)));

        let mut steps = 0;
        while s.step(&grid).unwrap() == Status::Active {
            steps += 1;
            assert!(steps < 16);
        }
        assert_eq!(s.status(), Status::Found);
        assert_eq!(s.path(), first.as_slice());
    }
}
