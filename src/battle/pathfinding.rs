//! Breadth-first reachability over the board
//!
//! Every step costs 1. A step is allowed onto an existing, traversable,
//! unoccupied tile whose height differs from the current tile by at most
//! the jump tolerance.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::battle::board::Board;
use crate::battle::position::Position;

/// A tile reached by a search, with its path annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachableTile {
    pub position: Position,
    /// Steps from the search origin
    pub distance: u32,
    /// Tile this one was reached from; `None` for the origin
    pub previous: Option<Position>,
}

/// Result of one search
///
/// Annotations belong to the search that produced them, so a new search
/// always starts from a clean slate.
#[derive(Debug, Clone)]
pub struct Reachability {
    origin: Position,
    reached: HashMap<Position, ReachableTile>,
}

impl Reachability {
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn get(&self, position: Position) -> Option<&ReachableTile> {
        self.reached.get(&position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.reached.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.reached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reached.is_empty()
    }

    /// Route from the origin to `destination`, both ends included
    pub fn path_to(&self, destination: Position) -> Option<Vec<Position>> {
        let mut current = self.reached.get(&destination)?;
        let mut path = vec![current.position];
        while let Some(prev) = current.previous {
            path.push(prev);
            current = self.reached.get(&prev)?;
        }
        path.reverse();
        Some(path)
    }

    /// Reached tiles ordered by distance, then row-major
    pub fn into_tiles(self) -> Vec<ReachableTile> {
        let mut tiles: Vec<ReachableTile> = self.reached.into_values().collect();
        tiles.sort_by_key(|t| (t.distance, t.position.y, t.position.x));
        tiles
    }
}

/// Flood outward from `start` up to `range` steps
///
/// The origin is always included at distance 0, even if the unit standing
/// on it makes the tile occupied.
pub fn find_reachable(board: &Board, start: Position, range: u32, max_jump: i32) -> Reachability {
    let mut reached = HashMap::new();
    let mut frontier = VecDeque::new();

    if board.get_tile(start).is_none() {
        return Reachability {
            origin: start,
            reached,
        };
    }

    reached.insert(
        start,
        ReachableTile {
            position: start,
            distance: 0,
            previous: None,
        },
    );
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        let Some(current_tile) = board.get_tile(current) else {
            continue;
        };
        let distance = reached.get(&current).map(|t| t.distance).unwrap_or(0);
        if distance >= range {
            continue;
        }

        for neighbor in current.neighbors() {
            if reached.contains_key(&neighbor) {
                continue;
            }
            let Some(tile) = board.get_tile(neighbor) else {
                continue;
            };
            if !tile.traversable || !tile.is_empty() {
                continue;
            }
            if (tile.height - current_tile.height).abs() > max_jump {
                continue;
            }

            reached.insert(
                neighbor,
                ReachableTile {
                    position: neighbor,
                    distance: distance + 1,
                    previous: Some(current),
                },
            );
            frontier.push_back(neighbor);
        }
    }

    Reachability {
        origin: start,
        reached,
    }
}

/// Shortest route between two tiles, ignoring range
pub fn find_path(board: &Board, start: Position, goal: Position, max_jump: i32) -> Option<Vec<Position>> {
    find_reachable(board, start, u32::MAX, max_jump).path_to(goal)
}
