//! Game state module - the session state machine
//!
//! This module ties together the board, the PRNG and the move history. The
//! transition function is [`GameState::apply_move`]: given a direction it either
//! ignores the input (terminal session), rejects it (nothing would move) or
//! commits the slide, records the direction and spawns exactly one tile.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::board::{Board, Merge};
use crate::prng::Xorshift128Plus;
use crate::seed::SeedSource;
use crate::types::{Direction, GameStatus, Tile, START_TILES, WIN_TILE};

/// What a call to [`GameState::apply_move`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The session is already won or lost; nothing changed.
    Ignored,
    /// The direction would not move or merge any tile; nothing changed.
    Rejected,
    /// The move was committed and recorded.
    Accepted {
        score_delta: u32,
        spawned: Option<Tile>,
        merges: ArrayVec<Merge, 8>,
        status: GameStatus,
    },
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }
}

/// Status implied by a board: won on a terminal tile, lost when locked.
pub fn evaluate_status(board: &Board) -> GameStatus {
    if board.max_tile() >= WIN_TILE {
        GameStatus::Won
    } else if board.is_full() && !board.has_adjacent_match() {
        GameStatus::Lost
    } else {
        GameStatus::Ongoing
    }
}

/// Complete session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) score: u32,
    /// Highest score ever observed, carried across new-game resets.
    pub(crate) best_score: u32,
    pub(crate) status: GameStatus,
    /// Accepted directions since the last new-game.
    pub(crate) moves: Vec<Direction>,
    pub(crate) seed: u64,
    pub(crate) rng: Xorshift128Plus,
}

impl GameState {
    /// Start a session from a known seed with the initial tiles in place.
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            board: Board::new(),
            score: 0,
            best_score: 0,
            status: GameStatus::Ongoing,
            moves: Vec::new(),
            seed,
            rng: Xorshift128Plus::new(seed),
        };
        state.start_session(seed);
        state
    }

    /// Wrap an arbitrary board, e.g. a position under analysis.
    ///
    /// The move history is empty, so such a state does not replay from its seed.
    pub fn from_board(seed: u64, board: Board) -> Self {
        let status = evaluate_status(&board);
        Self {
            board,
            score: 0,
            best_score: 0,
            status,
            moves: Vec::new(),
            seed,
            rng: Xorshift128Plus::new(seed),
        }
    }

    /// Build a session by applying `directions` to a fresh game.
    ///
    /// Directions that would be rejected are skipped, and everything after a
    /// terminal status is ignored, exactly as in live play.
    pub fn replay(seed: u64, directions: impl IntoIterator<Item = Direction>) -> Self {
        let mut state = Self::new(seed);
        for direction in directions {
            if state.status.is_terminal() {
                break;
            }
            state.apply_move(direction);
        }
        state
    }

    /// Reset to a fresh session using a seed from `source`.
    ///
    /// The best score survives the reset.
    pub fn new_game(&mut self, source: &mut impl SeedSource) {
        let seed = source.next_seed();
        self.start_session(seed);
        info!("new session seed={} best_score={}", seed, self.best_score);
    }

    fn start_session(&mut self, seed: u64) {
        self.board.clear();
        self.score = 0;
        self.status = GameStatus::Ongoing;
        self.moves.clear();
        self.seed = seed;
        self.rng = Xorshift128Plus::new(seed);

        for _ in 0..START_TILES {
            self.board.spawn_tile(&mut self.rng);
        }
        self.status = evaluate_status(&self.board);
        debug!("session started seed={}", seed);
    }

    /// Apply one direction.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.status.is_terminal() {
            debug!("{} ignored: session is {}", direction, self.status.as_str());
            return MoveOutcome::Ignored;
        }

        let slide = self.board.apply_direction(direction);
        if !slide.changed {
            debug!("{} rejected: board unchanged", direction);
            return MoveOutcome::Rejected;
        }

        self.board = slide.board;
        self.score = self.score.saturating_add(slide.score_delta);
        self.best_score = self.best_score.max(self.score);
        self.moves.push(direction);

        let spawned = self.board.spawn_tile(&mut self.rng);
        self.status = evaluate_status(&self.board);

        debug!(
            "{} accepted: +{} score={} spawned={:?}",
            direction, slide.score_delta, self.score, spawned
        );
        if self.status.is_terminal() {
            info!(
                "session {} after {} moves with score {}",
                self.status.as_str(),
                self.moves.len(),
                self.score
            );
        }

        MoveOutcome::Accepted {
            score_delta: slide.score_delta,
            spawned,
            merges: slide.merges,
            status: self.status,
        }
    }

    /// Pure form of [`GameState::apply_move`]: `(state, direction) -> state`.
    pub fn with_move(&self, direction: Direction) -> (Self, MoveOutcome) {
        let mut next = self.clone();
        let outcome = next.apply_move(direction);
        (next, outcome)
    }

    /// Carry a best score from an earlier session (never lowers it).
    pub fn with_best_score(mut self, best_score: u32) -> Self {
        self.best_score = self.best_score.max(best_score).max(self.score);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    /// History codes of the accepted moves.
    pub fn move_codes(&self) -> Vec<u8> {
        self.moves.iter().map(|d| d.code()).collect()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&self) -> &Xorshift128Plus {
        &self.rng
    }
}
