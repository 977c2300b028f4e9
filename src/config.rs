//! Host configuration.
//!
//! # Environment Variables
//!
//! - `TILES_STATE_PATH`: snapshot file (see [`StoreConfig`])
//! - `TILES_THROTTLE_MS`: minimum gap between two interactive moves (default: 100)

use crate::input::DEFAULT_THROTTLE_MS;
use crate::store::StoreConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub throttle_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            throttle_ms: DEFAULT_THROTTLE_MS,
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let throttle_ms = std::env::var("TILES_THROTTLE_MS")
            .ok()
            .and_then(|s| parse_throttle_ms(&s))
            .unwrap_or(DEFAULT_THROTTLE_MS);

        Self {
            store: StoreConfig::from_env(),
            throttle_ms,
        }
    }
}

fn parse_throttle_ms(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}
