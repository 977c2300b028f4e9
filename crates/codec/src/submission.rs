//! Submission payload handed to an external verifier.
//!
//! `{seed, moves, moveCount}`. In JSON the seed is a decimal string and the
//! moves buffer is `0x`-prefixed lowercase hex, the form the ledger call takes.

use serde::{Deserialize, Serialize};

use crate::types::Direction;
use crate::{decode_moves, encode_moves, CodecError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(with = "decimal")]
    pub seed: u64,
    #[serde(with = "hex_bytes")]
    pub moves: Vec<u8>,
    pub move_count: u32,
}

impl Submission {
    /// Pack a session's accepted directions.
    pub fn from_directions(seed: u64, directions: &[Direction]) -> Result<Self, CodecError> {
        let encoded = encode_moves(directions)?;
        Ok(Self {
            seed,
            moves: encoded.bytes,
            move_count: encoded.move_count,
        })
    }

    /// Build from the hex form of the moves buffer.
    pub fn from_hex(seed: u64, moves_hex: &str, move_count: u32) -> Result<Self, CodecError> {
        Ok(Self {
            seed,
            moves: parse_hex(moves_hex)?,
            move_count,
        })
    }

    /// Unpack the directions.
    pub fn decode(&self) -> Result<Vec<Direction>, CodecError> {
        decode_moves(&self.moves, self.move_count)
    }

    pub fn moves_hex(&self) -> String {
        to_hex(&self.moves)
    }
}

/// `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse hex with or without a `0x` prefix. `"0x"` and `""` are empty buffers.
pub fn parse_hex(raw: &str) -> Result<Vec<u8>, CodecError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    hex::decode(digits).map_err(|e| CodecError::InvalidHex(format!("{:?}: {}", raw, e)))
}

mod decimal {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>().map_err(D::Error::custom)
    }
}

mod hex_bytes {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hex(&raw).map_err(D::Error::custom)
    }
}
