//! Terminal input module (host-facing).
//!
//! Maps `crossterm` key events into [`InputCommand`]s and rate-limits moves.
//! The engine accepts moves at any rate; throttling only smooths out terminal
//! key auto-repeat for interactive play.

pub mod map;
pub mod throttle;

pub use tiles_types as types;

pub use map::{handle_key_event, should_quit, InputCommand};
pub use throttle::{Throttle, DEFAULT_THROTTLE_MS};
