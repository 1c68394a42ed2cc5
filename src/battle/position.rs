//! Grid coordinates for the combat board
//!
//! Square tiles addressed by (x, y), 4-connected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Tile coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance (number of 4-connected steps on an open board)
    pub fn distance(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The 4 orthogonal neighbors, in search order
    pub fn neighbors(&self) -> [Position; 4] {
        Direction::all().map(|d| *self + d.offset())
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Orthogonal step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn offset(&self) -> Position {
        match self {
            Direction::North => Position::new(0, 1),
            Direction::South => Position::new(0, -1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same() {
        let a = Position::new(3, 4);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_distance_manhattan() {
        let a = Position::new(0, 0);
        let b = Position::new(-2, 3);
        assert_eq!(a.distance(&b), 5);
        assert_eq!(b.distance(&a), 5);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = Position::new(5, 5);
        for n in center.neighbors() {
            assert_eq!(center.distance(&n), 1);
        }
    }

    #[test]
    fn test_direction_opposite() {
        for d in Direction::all() {
            assert_eq!(d.offset() + d.opposite().offset(), Position::new(0, 0));
        }
    }
}
