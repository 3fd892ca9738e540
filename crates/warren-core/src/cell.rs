//! Per-cell wall state: [`Side`], [`Walls`] and [`Cell`].

use crate::geom::Point;

/// One of the four sides of a cell.
///
/// The order of [`Side::ALL`] (top, right, bottom, left) is the canonical
/// neighbor enumeration order used throughout the workspace; search
/// tie-breaking depends on it being fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All four sides, in canonical order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The side facing this one from the adjacent cell.
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Unit offset to the adjacent cell through this side.
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Side::Top => Point::new(0, -1),
            Side::Right => Point::new(1, 0),
            Side::Bottom => Point::new(0, 1),
            Side::Left => Point::new(-1, 0),
        }
    }

    /// The side of `a` facing `b`, or `None` if the two points are not
    /// 4-adjacent.
    pub fn between(a: Point, b: Point) -> Option<Side> {
        let d = b - a;
        match (d.x, d.y) {
            (0, -1) => Some(Side::Top),
            (1, 0) => Some(Side::Right),
            (0, 1) => Some(Side::Bottom),
            (-1, 0) => Some(Side::Left),
            _ => None,
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Side::Top => 0b0001,
            Side::Right => 0b0010,
            Side::Bottom => 0b0100,
            Side::Left => 0b1000,
        }
    }
}

/// The wall set of a single cell, one bit per [`Side`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Walls(u8);

impl Walls {
    /// All four walls present.
    pub const CLOSED: Walls = Walls(0b1111);

    /// Whether the wall on `side` is present.
    #[inline]
    pub const fn has(self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    /// Remove the wall on `side`.
    #[inline]
    pub fn open(&mut self, side: Side) {
        self.0 &= !side.bit();
    }

    /// Number of walls present.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// A single maze cell: its wall set plus the `visited` flag consumed by
/// maze generation (and only by generation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub walls: Walls,
    pub visited: bool,
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cell_round_trip() {
        let mut cell = Cell::default();
        cell.walls.open(Side::Left);
        cell.visited = true;
        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(cell, back);
    }
}
