//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond conversions, making them
//! usable in any context (engine, codec, replay verification, terminal host).
//!
//! # Board Dimensions
//!
//! The playfield is a 4x4 grid:
//!
//! - **Width/Height**: 4 cells (indexed 0-3)
//! - **Coordinates**: `(x, y)`, x grows to the right, y grows downward
//! - **Storage order**: row-major (`y * 4 + x`)
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BOARD_SIZE` | 4 | Cells per side |
//! | `CELL_COUNT` | 16 | Total cells |
//! | `WIN_TILE` | 1024 | Tile value that ends the session in a win |
//! | `START_TILES` | 2 | Tiles spawned at new-game |
//! | `TWO_TILE_THRESHOLD` | `floor(2^64 * 9/10)` | Draws below this spawn a 2 |
//!
//! # Direction Tables
//!
//! Directions carry two unrelated numeric encodings:
//!
//! - the history code stored in the move list (`0=up, 1=right, 2=down, 3=left`)
//! - the 2-bit wire pair used by the move codec (see `tiles-codec`)
//!
//! # Examples
//!
//! ```
//! use tiles_types::{Direction, GameStatus, BOARD_SIZE, WIN_TILE};
//!
//! let dir = Direction::from_str("Left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.code(), 3);
//! assert_eq!(Direction::from_code(0), Some(Direction::Up));
//!
//! assert!(!GameStatus::Ongoing.is_terminal());
//! assert_eq!(BOARD_SIZE, 4);
//! assert_eq!(WIN_TILE, 1024);
//! ```

use serde::{Deserialize, Serialize};

/// Cells per board side.
pub const BOARD_SIZE: usize = 4;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Tile value whose appearance ends the session in a win.
pub const WIN_TILE: u32 = 1024;

/// Number of tiles spawned when a new session starts.
pub const START_TILES: usize = 2;

/// Integer form of the 9/10 probability of spawning a 2.
///
/// Spawns compare a raw `u64` draw against this threshold so that no
/// floating-point arithmetic takes part in verified decisions.
pub const TWO_TILE_THRESHOLD: u64 = ((1u128 << 64) * 9 / 10) as u64;

/// The four slide directions.
///
/// The discriminant is the history code recorded in a session's move list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in history-code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// History code (`0=up, 1=right, 2=down, 3=left`).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a history code.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiles_types::Direction;
    ///
    /// assert_eq!(Direction::from_code(1), Some(Direction::Right));
    /// assert_eq!(Direction::from_code(2), Some(Direction::Down));
    /// assert_eq!(Direction::from_code(4), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Parse from string (case-insensitive, accepts single letters).
    ///
    /// # Examples
    ///
    /// ```
    /// use tiles_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("R"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "right" | "r" => Some(Direction::Right),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session status.
///
/// `Won` and `Lost` are terminal: once reached, moves are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Ongoing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

/// A cell coordinate, `0 <= x, y < BOARD_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Row-major index into a flat cell array.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    /// Inverse of [`Position::index`]. Returns `None` past the last cell.
    pub fn from_index(idx: usize) -> Option<Self> {
        if idx >= CELL_COUNT {
            return None;
        }
        Some(Self::new((idx % BOARD_SIZE) as u8, (idx / BOARD_SIZE) as u8))
    }
}

/// Stable identity of a live tile.
///
/// Ids come from a per-board counter, so replaying a session yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Immutable tile record.
///
/// Moving or merging replaces the record; the id survives a move and the
/// surviving side of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub position: Position,
}

impl Tile {
    pub fn new(id: TileId, value: u32, position: Position) -> Self {
        Self {
            id,
            value,
            position,
        }
    }

    pub fn moved_to(self, position: Position) -> Self {
        Self { position, ..self }
    }

    pub fn doubled(self) -> Self {
        Self {
            value: self.value.saturating_mul(2),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes_are_stable() {
        // Recorded histories depend on these exact values.
        assert_eq!(Direction::Up.code(), 0);
        assert_eq!(Direction::Right.code(), 1);
        assert_eq!(Direction::Down.code(), 2);
        assert_eq!(Direction::Left.code(), 3);

        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
    }

    #[test]
    fn two_tile_threshold_is_nine_tenths() {
        assert_eq!(TWO_TILE_THRESHOLD, 0xE666_6666_6666_6666);
    }

    #[test]
    fn position_index_roundtrip() {
        assert_eq!(Position::new(0, 0).index(), 0);
        assert_eq!(Position::new(3, 0).index(), 3);
        assert_eq!(Position::new(0, 1).index(), 4);
        assert_eq!(Position::new(3, 3).index(), 15);
        assert_eq!(Position::from_index(6), Some(Position::new(2, 1)));
        assert_eq!(Position::from_index(16), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(GameStatus::Won.as_str(), "won");
        assert!(GameStatus::Lost.is_terminal());
        assert!(GameStatus::Won.is_terminal());
    }
}
