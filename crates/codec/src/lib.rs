//! Move codec - packs a direction history into 2 bits per move
//!
//! The packed form is what a finished session submits for verification:
//! a byte buffer plus an explicit move count.
//!
//! # Layout
//!
//! - Each move takes one 2-bit pair; four pairs per byte
//! - The first move sits in bits 7-6 of byte 0, the second in bits 5-4, ...
//! - Buffer length is `ceil(move_count / 4)`; unused trailing pairs are zero
//! - The count travels alongside because padding pairs read as `left`
//!
//! # Bit Table
//!
//! | Direction | Pair |
//! |-----------|------|
//! | up | `0b10` |
//! | right | `0b01` |
//! | down | `0b11` |
//! | left | `0b00` |
//!
//! This table is unrelated to the history codes stored in a session's move list.
//!
//! # Example
//!
//! ```
//! use tiles_codec::{decode_moves, encode_moves};
//! use tiles_types::Direction;
//!
//! let moves = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];
//! let encoded = encode_moves(&moves).unwrap();
//! assert_eq!(encoded.bytes, vec![0x9C]);
//! assert_eq!(encoded.move_count, 4);
//!
//! let decoded = decode_moves(&encoded.bytes, encoded.move_count).unwrap();
//! assert_eq!(decoded, moves);
//! ```

pub mod submission;

pub use tiles_types as types;

pub use submission::{parse_hex, to_hex, Submission};

use thiserror::Error;

use crate::types::Direction;

/// Moves packed into one byte.
pub const MOVES_PER_BYTE: usize = 4;

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("moves buffer too short: {move_count} moves need {needed} bytes, got {actual}")]
    Truncated {
        move_count: u32,
        needed: usize,
        actual: usize,
    },

    #[error("bit pair {bits:#04b} at move {index} does not map to a direction")]
    InvalidBits { index: usize, bits: u8 },

    #[error("{0} moves exceed the 32-bit move count")]
    TooManyMoves(usize),

    #[error("invalid hex moves buffer: {0}")]
    InvalidHex(String),
}

/// Packed moves plus their count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedMoves {
    pub bytes: Vec<u8>,
    pub move_count: u32,
}

/// Wire pair for a direction.
pub fn to_bits(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 0b10,
        Direction::Right => 0b01,
        Direction::Down => 0b11,
        Direction::Left => 0b00,
    }
}

/// Direction for a wire pair. Only the low two bits are meaningful.
pub fn from_bits(bits: u8) -> Option<Direction> {
    match bits {
        0b10 => Some(Direction::Up),
        0b01 => Some(Direction::Right),
        0b11 => Some(Direction::Down),
        0b00 => Some(Direction::Left),
        _ => None,
    }
}

/// Bytes needed for `move_count` moves.
pub fn packed_len(move_count: usize) -> usize {
    move_count.div_ceil(MOVES_PER_BYTE)
}

/// Pack a direction sequence.
pub fn encode_moves(moves: &[Direction]) -> Result<EncodedMoves, CodecError> {
    let move_count = u32::try_from(moves.len()).map_err(|_| CodecError::TooManyMoves(moves.len()))?;

    let mut bytes = vec![0u8; packed_len(moves.len())];
    for (i, &direction) in moves.iter().enumerate() {
        bytes[i / MOVES_PER_BYTE] |= to_bits(direction) << shift(i);
    }

    Ok(EncodedMoves { bytes, move_count })
}

/// Unpack `move_count` directions from `bytes`.
///
/// Bytes past `ceil(move_count / 4)` are ignored.
pub fn decode_moves(bytes: &[u8], move_count: u32) -> Result<Vec<Direction>, CodecError> {
    let count = move_count as usize;
    let needed = packed_len(count);
    if bytes.len() < needed {
        return Err(CodecError::Truncated {
            move_count,
            needed,
            actual: bytes.len(),
        });
    }

    (0..count)
        .map(|index| {
            let bits = (bytes[index / MOVES_PER_BYTE] >> shift(index)) & 0b11;
            from_bits(bits).ok_or(CodecError::InvalidBits { index, bits })
        })
        .collect()
}

/// Left shift of move `i` inside its byte (6, 4, 2, 0).
#[inline(always)]
fn shift(i: usize) -> u32 {
    (6 - 2 * (i % MOVES_PER_BYTE)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const L: Direction = Direction::Left;
    const U: Direction = Direction::Up;
    const R: Direction = Direction::Right;
    const D: Direction = Direction::Down;

    #[test]
    fn four_moves_pack_into_one_byte() {
        let encoded = encode_moves(&[U, R, D, L]).unwrap();
        assert_eq!(encoded.bytes, vec![0b10_01_11_00]);
        assert_eq!(encoded.bytes, vec![0x9C]);
        assert_eq!(encoded.move_count, 4);
    }

    #[test]
    fn empty_history_is_empty_buffer() {
        let encoded = encode_moves(&[]).unwrap();
        assert!(encoded.bytes.is_empty());
        assert_eq!(encoded.move_count, 0);
        assert_eq!(decode_moves(&[], 0).unwrap(), Vec::<Direction>::new());
    }

    #[test]
    fn partial_last_byte_is_zero_padded() {
        let encoded = encode_moves(&[D, D, D, D, U]).unwrap();
        assert_eq!(encoded.bytes, vec![0xFF, 0b10_00_00_00]);
        assert_eq!(encoded.move_count, 5);
        assert_eq!(decode_moves(&encoded.bytes, 5).unwrap(), vec![D, D, D, D, U]);
    }

    #[test]
    fn decodes_validator_fixture() {
        // 7 moves: Left, Up, Left, Up, Up, Left, Left
        let moves = decode_moves(&[0x22, 0x81], 7).unwrap();
        assert_eq!(moves, vec![L, U, L, U, U, L, L]);
        assert_eq!(encode_moves(&moves).unwrap().bytes, vec![0x22, 0x80]);
    }

    #[test]
    fn count_limits_decoding() {
        assert_eq!(decode_moves(&[0x9C], 2).unwrap(), vec![U, R]);
        // Extra trailing bytes are not an error.
        assert_eq!(decode_moves(&[0x9C, 0xFF], 4).unwrap(), vec![U, R, D, L]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert_eq!(
            decode_moves(&[0x9C], 5),
            Err(CodecError::Truncated {
                move_count: 5,
                needed: 2,
                actual: 1
            })
        );
        assert!(decode_moves(&[], 1).is_err());
    }

    #[test]
    fn bit_table_is_a_bijection() {
        for dir in Direction::ALL {
            assert_eq!(from_bits(to_bits(dir)), Some(dir));
        }
        assert_eq!(from_bits(0b100), None);
        // Wire pairs differ from history codes.
        assert_ne!(to_bits(Direction::Up), Direction::Up.code());
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(U), Just(R), Just(D), Just(L)]
    }

    proptest! {
        #[test]
        fn roundtrip_up_to_1000_moves(moves in prop::collection::vec(direction(), 0..=1000)) {
            let encoded = encode_moves(&moves).unwrap();
            prop_assert_eq!(encoded.bytes.len(), packed_len(moves.len()));
            prop_assert_eq!(encoded.move_count as usize, moves.len());
            prop_assert_eq!(decode_moves(&encoded.bytes, encoded.move_count).unwrap(), moves);
        }
    }
}
