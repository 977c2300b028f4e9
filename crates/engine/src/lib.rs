//! Replay and verification of submitted sessions.
//!
//! A verifier receives `{seed, moves, moveCount}`, decodes the moves with the
//! codec, replays them on a fresh [`GameState`](tiles_core::GameState) and
//! compares the replayed score with the claim. The engine never trusts any
//! state beyond the seed and the directions.

pub mod verify;

pub use tiles_codec as codec;
pub use tiles_core as core;
pub use tiles_types as types;

pub use verify::{replay, submission_for, verify, verify_claim, ReplayReport, VerifyError};
