//! Snapshot record exchanged with a snapshot store.
//!
//! A snapshot carries the visible state (grid, tile table, score, history) and
//! the seed as a decimal string. It never carries PRNG internals: restoring
//! replays `seed + moves`, which puts the generator exactly where live play
//! left it, then checks the replay against the recorded grid.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_state::GameState;
use crate::types::{Direction, GameStatus, Tile, TileId, BOARD_SIZE};

/// Snapshot restore errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("invalid seed {0:?}: expected a decimal unsigned 64-bit integer")]
    InvalidSeed(String),

    #[error("invalid direction code {0} in move history")]
    InvalidDirectionCode(u8),

    #[error("snapshot does not match a replay of its seed and moves: {0}")]
    Diverged(&'static str),
}

/// Parse a snapshot seed. No clamping and no sign handling.
pub fn parse_seed(raw: &str) -> Result<u64, SnapshotError> {
    raw.parse::<u64>()
        .map_err(|_| SnapshotError::InvalidSeed(raw.to_string()))
}

mod seed_string {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seed: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(seed)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_seed(&raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Tile ids indexed `[y][x]`.
    pub board: [[Option<TileId>; BOARD_SIZE]; BOARD_SIZE],
    pub tiles: BTreeMap<TileId, Tile>,
    pub tiles_by_ids: Vec<TileId>,
    pub score: u32,
    pub best_score: u32,
    pub status: GameStatus,
    /// History codes (`0=up, 1=right, 2=down, 3=left`).
    pub moves: Vec<u8>,
    #[serde(with = "seed_string")]
    pub seed: u64,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_SIZE]; BOARD_SIZE];
        self.tiles.clear();
        self.tiles_by_ids.clear();
        self.score = 0;
        self.best_score = 0;
        self.status = GameStatus::Ongoing;
        self.moves.clear();
        self.seed = 0;
    }

    pub fn playable(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Decode the move history into directions.
    pub fn directions(&self) -> Result<Vec<Direction>, SnapshotError> {
        self.moves
            .iter()
            .map(|&code| Direction::from_code(code).ok_or(SnapshotError::InvalidDirectionCode(code)))
            .collect()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[None; BOARD_SIZE]; BOARD_SIZE],
            tiles: BTreeMap::new(),
            tiles_by_ids: Vec::new(),
            score: 0,
            best_score: 0,
            status: GameStatus::Ongoing,
            moves: Vec::new(),
            seed: 0,
        };
        s.clear();
        s
    }
}

impl GameState {
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board = self.board.rows();
        out.tiles = self.board.tile_table().clone();
        out.tiles_by_ids = self.board.tiles_by_ids().to_vec();
        out.score = self.score;
        out.best_score = self.best_score;
        out.status = self.status;
        out.moves = self.move_codes();
        out.seed = self.seed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Rebuild a session from a snapshot by replaying its seed and moves.
    pub fn restore(snapshot: &GameSnapshot) -> Result<Self, SnapshotError> {
        let directions = snapshot.directions()?;
        let state = GameState::replay(snapshot.seed, directions.iter().copied());

        let divergence = if state.moves.len() != directions.len() {
            Some("recorded moves are not all accepted on replay")
        } else if state.board.rows() != snapshot.board {
            Some("grid differs")
        } else if state.board.tile_table() != &snapshot.tiles {
            Some("tile table differs")
        } else if state.board.tiles_by_ids() != snapshot.tiles_by_ids.as_slice() {
            Some("tile order differs")
        } else if state.score != snapshot.score {
            Some("score differs")
        } else if state.status != snapshot.status {
            Some("status differs")
        } else {
            None
        };

        if let Some(reason) = divergence {
            warn!("snapshot for seed {} rejected: {}", snapshot.seed, reason);
            return Err(SnapshotError::Diverged(reason));
        }

        Ok(state.with_best_score(snapshot.best_score))
    }
}
