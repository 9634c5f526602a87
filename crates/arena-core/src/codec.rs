//! Move-list codec.
//!
//! A finished game's move list is stored as a compact string of base-10
//! digits, one per claimed board position, in play order. The board has
//! nine positions, so a single digit 0-8 covers every move.

use thiserror::Error;

/// Highest encodable board position.
const MAX_MOVE: u8 = 8;

/// Errors produced while encoding or decoding a move list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("move {0} is outside the board (expected 0-8)")]
    InvalidMove(u8),

    #[error("invalid move character {0:?}")]
    InvalidChar(char),
}

/// Encode a move list into its digit-string form.
pub fn encode_moves(moves: &[u8]) -> Result<String, CodecError> {
    let mut encoded = String::with_capacity(moves.len());
    for &m in moves {
        if m > MAX_MOVE {
            return Err(CodecError::InvalidMove(m));
        }
        encoded.push(char::from(b'0' + m));
    }
    Ok(encoded)
}

/// Decode a digit string back into the move list it encodes.
pub fn decode_moves(encoded: &str) -> Result<Vec<u8>, CodecError> {
    encoded
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if d <= MAX_MOVE as u32 => Ok(d as u8),
            Some(d) => Err(CodecError::InvalidMove(d as u8)),
            None => Err(CodecError::InvalidChar(c)),
        })
        .collect()
}
