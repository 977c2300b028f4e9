//! Core game logic module - pure, deterministic, and replayable
//!
//! This module contains the game rules, the seeded generator and the session
//! state machine. It has **no dependencies** on rendering, networking or I/O,
//! which makes it:
//!
//! - **Deterministic**: the same seed and the same accepted moves produce the
//!   same grid, tile ids, score and status on every platform
//! - **Verifiable**: a third party can replay a submitted game from its seed
//! - **Testable**: every rule is covered by unit tests
//!
//! # Module Structure
//!
//! - [`prng`]: xorshift128+ generator derived from a 64-bit seed
//! - [`board`]: 4x4 grid of tile ids plus the tile table, spawn and slide
//! - [`game_state`]: session state machine (accept/reject/ignore, status)
//! - [`seed`]: injected sources for new-session seeds
//! - [`snapshot`]: persisted record and replay-checked restore
//!
//! # Game Rules
//!
//! - **Spawn**: after each accepted move one tile appears on a random empty
//!   cell; it is a 2 with probability 9/10 and a 4 otherwise
//! - **Slide**: every line compacts toward the chosen edge; equal neighbours
//!   merge once per move and the merged value is added to the score
//! - **Win**: a tile of 1024 appears
//! - **Loss**: no empty cell and no equal neighbours
//! - Moves that change nothing are rejected and never recorded
//!
//! # Example
//!
//! ```
//! use tiles_core::GameState;
//! use tiles_types::Direction;
//!
//! let mut game = GameState::new(12345);
//! game.apply_move(Direction::Left);
//! game.apply_move(Direction::Up);
//!
//! // Replaying the same seed and history lands on the same state.
//! let replayed = GameState::replay(12345, game.moves().to_vec());
//! assert_eq!(replayed, game);
//! ```

pub mod board;
pub mod game_state;
pub mod prng;
pub mod seed;
pub mod snapshot;

pub use tiles_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Merge, Slide};
pub use game_state::{evaluate_status, GameState, MoveOutcome};
pub use prng::Xorshift128Plus;
pub use seed::{EntropySeedSource, FixedSeedSource, SeedSource};
pub use snapshot::{parse_seed, GameSnapshot, SnapshotError};
