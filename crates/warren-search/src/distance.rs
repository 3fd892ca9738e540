use warren_core::Point;

/// Manhattan (L1) distance between two points.
///
/// Admissible and consistent on a 4-directional unit-cost grid, so A*
/// guided by it finds optimal paths.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
