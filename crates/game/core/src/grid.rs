//! Tile grid with wall/floor/key/exit semantics.
//!
//! The grid is built once per match from generator output and is immutable
//! afterwards except for key pickup, which overwrites the cell with floor.
//! All collision and pathfinding logic relies on out-of-bounds queries
//! behaving as walls rather than erroring.

use thiserror::Error;

use crate::types::{Position, Role};

/// Canonical tile classes for the static maze layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Key,
    Exit,
    HunterSpawn,
    SurvivorSpawn,
}

impl TileKind {
    /// Parses the single-character layout symbol for this tile class.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Floor),
            'k' => Some(TileKind::Key),
            'E' => Some(TileKind::Exit),
            'A' => Some(TileKind::HunterSpawn),
            'P' => Some(TileKind::SurvivorSpawn),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Key => 'k',
            TileKind::Exit => 'E',
            TileKind::HunterSpawn => 'A',
            TileKind::SurvivorSpawn => 'P',
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, TileKind::Wall)
    }
}

/// Errors raised while building a grid from a text layout.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("layout contains no rows")]
    EmptyLayout,

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        symbol: char,
        row: usize,
        column: usize,
    },
}

/// Rectangular tile grid in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a grid of the given dimensions filled with one tile class.
    pub fn filled(width: u32, height: u32, fill: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; (width * height) as usize],
        }
    }

    /// Builds a grid from a rectangular text layout.
    ///
    /// Each character is one tile symbol. Blank trailing lines are ignored;
    /// all rows must have the same length.
    pub fn parse(layout: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = layout.lines().filter(|line| !line.is_empty()).collect();
        if rows.is_empty() {
            return Err(MapError::EmptyLayout);
        }

        let width = rows[0].chars().count();
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let count = row.chars().count();
            if count != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found: count,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let tile = TileKind::from_symbol(symbol).ok_or(MapError::UnknownSymbol {
                    symbol,
                    row: y,
                    column: x,
                })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            tiles,
        })
    }

    /// Renders the grid back to its text layout, one row per line.
    pub fn to_layout(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.push(self.tile(Position::new(x, y)).expect("in bounds").symbol());
            }
            out.push('\n');
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// Tile at a position, or `None` when out of bounds.
    pub fn tile(&self, position: Position) -> Option<TileKind> {
        if self.contains(position) {
            Some(self.tiles[self.index(position)])
        } else {
            None
        }
    }

    /// True when the coordinate is out of bounds or holds a wall tile.
    ///
    /// The dual rule is load-bearing: callers probe arbitrary coordinates and
    /// expect the world edge to be impassable rather than an error.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile(Position::new(x, y)).is_none_or(TileKind::is_wall)
    }

    /// Overwrites an in-bounds cell; out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, position: Position, tile: TileKind) {
        if self.contains(position) {
            let index = self.index(position);
            self.tiles[index] = tile;
        }
    }

    /// Removes a collected key, leaving floor behind.
    pub fn clear_key(&mut self, position: Position) {
        if self.tile(position) == Some(TileKind::Key) {
            self.set_tile(position, TileKind::Floor);
        }
    }

    /// Number of non-wall cells, the denominator for exploration coverage.
    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_wall()).count()
    }

    /// First cell carrying the spawn marker for a role, scanning row-major.
    pub fn spawn(&self, role: Role) -> Option<Position> {
        let marker = match role {
            Role::Hunter => TileKind::HunterSpawn,
            Role::Survivor => TileKind::SurvivorSpawn,
        };
        self.positions().find(|&position| self.tile(position) == Some(marker))
    }

    /// All key cells currently on the grid.
    pub fn key_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|&position| self.tile(position) == Some(TileKind::Key))
            .collect()
    }

    /// Iterator over every in-bounds position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    fn index(&self, position: Position) -> usize {
        position.y as usize * self.width as usize + position.x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = "#####\n\
                          #P.k#\n\
                          #.#.#\n\
                          #A.E#\n\
                          #####\n";

    #[test]
    fn parse_round_trips_layout() {
        let grid = TileGrid::parse(LAYOUT).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.to_layout(), LAYOUT);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = TileGrid::parse("###\n##\n").unwrap_err();
        assert!(matches!(
            err,
            MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn parse_rejects_unknown_symbols() {
        let err = TileGrid::parse("#?#\n").unwrap_err();
        assert!(matches!(err, MapError::UnknownSymbol { symbol: '?', .. }));
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let grid = TileGrid::parse(LAYOUT).unwrap();
        assert!(grid.is_wall(-1, 0));
        assert!(grid.is_wall(0, -1));
        assert!(grid.is_wall(5, 2));
        assert!(grid.is_wall(2, 5));
        assert!(!grid.is_wall(1, 1));
    }

    #[test]
    fn clear_key_leaves_floor() {
        let mut grid = TileGrid::parse(LAYOUT).unwrap();
        let key = Position::new(3, 1);
        assert_eq!(grid.tile(key), Some(TileKind::Key));
        grid.clear_key(key);
        assert_eq!(grid.tile(key), Some(TileKind::Floor));

        // Clearing a non-key cell is a no-op.
        let floor = Position::new(2, 1);
        grid.clear_key(floor);
        assert_eq!(grid.tile(floor), Some(TileKind::Floor));
    }

    #[test]
    fn spawns_and_keys_are_found() {
        let grid = TileGrid::parse(LAYOUT).unwrap();
        assert_eq!(grid.spawn(Role::Survivor), Some(Position::new(1, 1)));
        assert_eq!(grid.spawn(Role::Hunter), Some(Position::new(1, 3)));
        assert_eq!(grid.key_positions(), vec![Position::new(3, 1)]);
    }

    #[test]
    fn walkable_count_excludes_walls() {
        let grid = TileGrid::parse(LAYOUT).unwrap();
        // 25 cells, 16 border walls plus one interior wall.
        assert_eq!(grid.walkable_count(), 8);
    }
}
