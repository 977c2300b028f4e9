use log::{debug, info};
use thiserror::Error;

use crate::codec::{CodecError, Submission};
use crate::core::{GameState, MoveOutcome};
use crate::types::{Direction, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("malformed submission: {0}")]
    Codec(#[from] CodecError),

    #[error("claimed score {claimed} does not match replayed score {actual}")]
    ScoreMismatch { claimed: u32, actual: u32 },
}

impl VerifyError {
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::Codec(_) => "malformed_submission",
            VerifyError::ScoreMismatch { .. } => "score_mismatch",
        }
    }
}

/// Result of replaying a direction sequence from a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub state: GameState,
    /// Directions that moved the board.
    pub accepted: usize,
    /// Directions that changed nothing.
    pub rejected: usize,
    /// Directions that arrived after the session ended.
    pub ignored: usize,
}

impl ReplayReport {
    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn max_tile(&self) -> u32 {
        self.state.board().max_tile()
    }

    /// True when every direction was accepted, as in a recorded history.
    pub fn is_clean(&self) -> bool {
        self.rejected == 0 && self.ignored == 0
    }
}

/// Replay `directions` on a fresh session seeded with `seed`.
pub fn replay(seed: u64, directions: &[Direction]) -> ReplayReport {
    let mut state = GameState::new(seed);
    let (mut accepted, mut rejected, mut ignored) = (0usize, 0usize, 0usize);

    for &direction in directions {
        match state.apply_move(direction) {
            MoveOutcome::Accepted { .. } => accepted += 1,
            MoveOutcome::Rejected => rejected += 1,
            MoveOutcome::Ignored => ignored += 1,
        }
    }

    debug!(
        "replayed seed={} accepted={} rejected={} ignored={}",
        seed, accepted, rejected, ignored
    );

    ReplayReport {
        state,
        accepted,
        rejected,
        ignored,
    }
}

/// Decode a submission and replay it.
pub fn verify(submission: &Submission) -> Result<ReplayReport, VerifyError> {
    let directions = submission.decode()?;
    Ok(replay(submission.seed, &directions))
}

/// Verify that a submission replays to the claimed score.
pub fn verify_claim(submission: &Submission, claimed: u32) -> Result<ReplayReport, VerifyError> {
    let report = verify(submission)?;
    if report.score() != claimed {
        return Err(VerifyError::ScoreMismatch {
            claimed,
            actual: report.score(),
        });
    }
    info!(
        "verified seed={} moves={} score={}",
        submission.seed,
        submission.move_count,
        report.score()
    );
    Ok(report)
}

/// Submission payload for a session's recorded history.
pub fn submission_for(state: &GameState) -> Result<Submission, CodecError> {
    Submission::from_directions(state.seed(), state.moves())
}
