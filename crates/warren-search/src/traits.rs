use warren_core::{Grid, Point};

/// Adjacency source for the search engine.
///
/// The engine only ever asks which positions are reachable in one move
/// from `p`; everything else (walls, bounds) stays behind this seam.
pub trait Topology {
    /// Append the positions reachable in one move from `p` into `buf`.
    /// The caller clears `buf` before calling. Enumeration order must be
    /// deterministic since it drives tie-breaking between equal-cost
    /// candidates.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

impl Topology for Grid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        self.neighbors_open(p, buf);
    }
}
