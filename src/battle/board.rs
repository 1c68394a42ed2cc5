//! Combat board with tiles, heights and unit occupancy
//!
//! The board owns tile storage and the unit -> tile index. Units are
//! referred to by id only; their stats live in the `UnitRoster`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::battle::pathfinding::{find_reachable, ReachableTile};
use crate::battle::position::Position;
use crate::core::error::{CombatError, Result};
use crate::core::types::UnitId;
use crate::data::map::MapConfig;

/// A single tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    pub height: i32,
    pub terrain: String,
    /// Units may end a move here
    pub standable: bool,
    /// Units may path through here
    pub traversable: bool,
    pub can_player_start: bool,
    pub occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(position: Position, height: i32) -> Self {
        Self {
            position,
            height,
            terrain: "default".to_string(),
            standable: true,
            traversable: true,
            can_player_start: false,
            occupant: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// The full combat board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    tiles: HashMap<Position, Tile>,
    unit_positions: AHashMap<UnitId, Position>,
    pub min_point: Position,
    pub max_point: Position,
}

impl Board {
    /// Create an open, flat rectangular board
    pub fn new(width: u32, height: u32) -> Self {
        let mut board = Self::default();
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                board.insert_tile(Tile::new(Position::new(x, y), 0));
            }
        }
        board
    }

    /// Build a board from a loaded map configuration
    pub fn from_config(config: &MapConfig) -> Result<Self> {
        if config.tiles.is_empty() {
            return Err(CombatError::InvalidConfig(format!(
                "map '{}' has no tiles",
                config.general.map_name
            )));
        }

        let mut board = Self::default();
        for tile_config in &config.tiles {
            let position = Position::new(tile_config.x, tile_config.y);
            if board.tiles.contains_key(&position) {
                tracing::warn!(%position, "Duplicate tile in map config, keeping the last one");
            }

            let mut tile = Tile::new(position, tile_config.z);
            tile.terrain = tile_config.terrain.clone();
            tile.standable = tile_config.standable;
            tile.traversable = tile_config.traversable;
            tile.can_player_start = tile_config.can_player_start;
            board.insert_tile(tile);
        }

        tracing::info!(
            tiles = board.tiles.len(),
            min = %board.min_point,
            max = %board.max_point,
            "Loaded board"
        );
        Ok(board)
    }

    /// Insert (or replace) a tile, growing the bounds to include it
    pub fn insert_tile(&mut self, tile: Tile) {
        let p = tile.position;
        if self.tiles.is_empty() {
            self.min_point = p;
            self.max_point = p;
        } else {
            self.min_point = Position::new(self.min_point.x.min(p.x), self.min_point.y.min(p.y));
            self.max_point = Position::new(self.max_point.x.max(p.x), self.max_point.y.max(p.y));
        }
        self.tiles.insert(p, tile);
    }

    pub fn get_tile(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub fn get_tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.tiles.get_mut(&position)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn set_height(&mut self, position: Position, height: i32) {
        if let Some(tile) = self.get_tile_mut(position) {
            tile.height = height;
        }
    }

    /// True if the tile exists and holds no unit
    pub fn is_tile_empty(&self, position: Position) -> bool {
        self.get_tile(position).is_some_and(|t| t.is_empty())
    }

    /// True if the tile exists and holds a unit
    pub fn is_tile_occupied(&self, position: Position) -> bool {
        self.get_tile(position).is_some_and(|t| !t.is_empty())
    }

    pub fn get_unit_at_position(&self, position: Position) -> Option<UnitId> {
        self.get_tile(position).and_then(|t| t.occupant)
    }

    pub fn get_unit_position(&self, unit: UnitId) -> Option<Position> {
        self.unit_positions.get(&unit).copied()
    }

    /// Put a unit on an empty, standable tile
    pub fn place_unit(&mut self, unit: UnitId, position: Position) -> Result<()> {
        if self.unit_positions.contains_key(&unit) {
            return Err(CombatError::MoveRejected(format!(
                "unit {} is already on the board",
                unit
            )));
        }

        let tile = self.tiles.get_mut(&position).ok_or_else(|| {
            CombatError::MoveRejected(format!("no tile at {}", position))
        })?;
        if !tile.standable {
            return Err(CombatError::MoveRejected(format!(
                "tile {} is not standable",
                position
            )));
        }
        if let Some(other) = tile.occupant {
            return Err(CombatError::MoveRejected(format!(
                "tile {} is occupied by unit {}",
                position, other
            )));
        }

        tile.occupant = Some(unit);
        self.unit_positions.insert(unit, position);
        Ok(())
    }

    /// Take a unit off the board, returning where it stood
    pub fn remove_unit(&mut self, unit: UnitId) -> Option<Position> {
        let position = self.unit_positions.remove(&unit)?;
        if let Some(tile) = self.tiles.get_mut(&position) {
            tile.occupant = None;
        }
        Some(position)
    }

    /// Commit a move. Nothing changes unless every check passes.
    pub fn move_unit(&mut self, unit: UnitId, from: Position, to: Position) -> Result<()> {
        if self.get_unit_at_position(from) != Some(unit) {
            return Err(CombatError::MoveRejected(format!(
                "unit {} is not at {}",
                unit, from
            )));
        }

        let destination = self
            .get_tile(to)
            .ok_or_else(|| CombatError::MoveRejected(format!("no tile at {}", to)))?;
        if from != to && !destination.is_empty() {
            return Err(CombatError::MoveRejected(format!("tile {} is occupied", to)));
        }
        if !destination.standable {
            return Err(CombatError::MoveRejected(format!(
                "tile {} is not standable",
                to
            )));
        }

        if let Some(tile) = self.tiles.get_mut(&from) {
            tile.occupant = None;
        }
        if let Some(tile) = self.tiles.get_mut(&to) {
            tile.occupant = Some(unit);
        }
        self.unit_positions.insert(unit, to);
        Ok(())
    }

    /// Tiles a unit standing at `start` can move to within `range` steps
    ///
    /// Breadth-first over 4-connected neighbors, skipping occupied tiles and
    /// steps whose height change exceeds `max_jump` (`MAX_JUMP_DELTA` for the
    /// plain board rule). The start tile is not included.
    pub fn get_valid_move_tiles(
        &self,
        start: Position,
        range: u32,
        max_jump: i32,
    ) -> Vec<ReachableTile> {
        find_reachable(self, start, range, max_jump)
            .into_tiles()
            .into_iter()
            .filter(|t| t.distance > 0 && t.distance <= range)
            .filter(|t| self.get_tile(t.position).is_some_and(|tile| tile.standable))
            .collect()
    }

    /// Starting tiles in row-major order
    ///
    /// Tiles flagged `can_player_start` when any exist, otherwise every
    /// standable tile.
    pub fn start_positions(&self) -> Vec<Position> {
        let mut flagged: Vec<Position> = self
            .tiles
            .values()
            .filter(|t| t.can_player_start && t.standable)
            .map(|t| t.position)
            .collect();

        if flagged.is_empty() {
            flagged = self
                .tiles
                .values()
                .filter(|t| t.standable)
                .map(|t| t.position)
                .collect();
        }

        flagged.sort_by_key(|p| (p.y, p.x));
        flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::constants::MAX_JUMP_DELTA;

    #[test]
    fn test_board_creation() {
        let board = Board::new(4, 3);
        assert_eq!(board.tile_count(), 12);
        assert_eq!(board.min_point, Position::new(0, 0));
        assert_eq!(board.max_point, Position::new(3, 2));
    }

    #[test]
    fn test_place_and_lookup() {
        let mut board = Board::new(5, 5);
        board.place_unit(UnitId(1), Position::new(2, 2)).unwrap();

        assert_eq!(board.get_unit_position(UnitId(1)), Some(Position::new(2, 2)));
        assert_eq!(board.get_unit_at_position(Position::new(2, 2)), Some(UnitId(1)));
        assert!(board.is_tile_occupied(Position::new(2, 2)));
        assert!(board.is_tile_empty(Position::new(1, 1)));
    }

    #[test]
    fn test_place_on_occupied_fails() {
        let mut board = Board::new(5, 5);
        board.place_unit(UnitId(1), Position::new(2, 2)).unwrap();
        assert!(board.place_unit(UnitId(2), Position::new(2, 2)).is_err());
        assert!(board.place_unit(UnitId(3), Position::new(9, 9)).is_err());
    }

    #[test]
    fn test_move_unit() {
        let mut board = Board::new(5, 5);
        board.place_unit(UnitId(1), Position::new(0, 0)).unwrap();

        board
            .move_unit(UnitId(1), Position::new(0, 0), Position::new(0, 3))
            .unwrap();

        assert_eq!(board.get_unit_position(UnitId(1)), Some(Position::new(0, 3)));
        assert!(board.is_tile_empty(Position::new(0, 0)));
    }

    #[test]
    fn test_move_to_occupied_leaves_board_unchanged() {
        let mut board = Board::new(5, 5);
        board.place_unit(UnitId(1), Position::new(0, 0)).unwrap();
        board.place_unit(UnitId(2), Position::new(1, 0)).unwrap();

        let result = board.move_unit(UnitId(1), Position::new(0, 0), Position::new(1, 0));

        assert!(result.is_err());
        assert_eq!(board.get_unit_position(UnitId(1)), Some(Position::new(0, 0)));
        assert_eq!(board.get_unit_at_position(Position::new(1, 0)), Some(UnitId(2)));
    }

    #[test]
    fn test_move_to_missing_tile_fails() {
        let mut board = Board::new(3, 3);
        board.place_unit(UnitId(1), Position::new(0, 0)).unwrap();
        assert!(board
            .move_unit(UnitId(1), Position::new(0, 0), Position::new(7, 7))
            .is_err());
    }

    #[test]
    fn test_remove_unit() {
        let mut board = Board::new(3, 3);
        board.place_unit(UnitId(1), Position::new(1, 1)).unwrap();
        assert_eq!(board.remove_unit(UnitId(1)), Some(Position::new(1, 1)));
        assert!(board.is_tile_empty(Position::new(1, 1)));
        assert_eq!(board.remove_unit(UnitId(1)), None);
    }

    #[test]
    fn test_valid_move_tiles_respect_range() {
        let board = Board::new(10, 10);
        let tiles = board.get_valid_move_tiles(Position::new(5, 5), 1, MAX_JUMP_DELTA);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.distance == 1));
    }

    #[test]
    fn test_valid_move_tiles_skip_occupied() {
        let mut board = Board::new(3, 1);
        board.place_unit(UnitId(1), Position::new(0, 0)).unwrap();
        board.place_unit(UnitId(2), Position::new(1, 0)).unwrap();

        // The only path east is blocked
        let tiles = board.get_valid_move_tiles(Position::new(0, 0), 5, MAX_JUMP_DELTA);
        assert!(tiles.is_empty());
    }

    #[test]
    fn test_valid_move_tiles_follow_jump_tolerance() {
        let mut board = Board::new(3, 1);
        board.set_height(Position::new(1, 0), 2);

        let low = board.get_valid_move_tiles(Position::new(0, 0), 2, MAX_JUMP_DELTA);
        assert!(low.is_empty());

        let high = board.get_valid_move_tiles(Position::new(0, 0), 2, 2);
        let reached: Vec<Position> = high.iter().map(|t| t.position).collect();
        assert_eq!(reached, vec![Position::new(1, 0), Position::new(2, 0)]);
    }

    #[test]
    fn test_start_positions_prefer_flagged_tiles() {
        let mut board = Board::new(3, 3);
        assert_eq!(board.start_positions().len(), 9);

        board.get_tile_mut(Position::new(2, 2)).unwrap().can_player_start = true;
        board.get_tile_mut(Position::new(0, 1)).unwrap().can_player_start = true;
        assert_eq!(
            board.start_positions(),
            vec![Position::new(0, 1), Position::new(2, 2)]
        );
    }
}
