//! # Error Types
//!
//! Errors raised while encoding or decoding consensus bytes.

use thiserror::Error;

/// Errors from the canonical encoding layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Value exceeds the maximum allowed for a bounded varint.
    #[error("value {value} out of range for a {bits}-bit varint")]
    Range { value: u64, bits: u8 },

    /// Input ended before a complete value could be read.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// Varint continues past ten bytes or overflows 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// Bytes remain after a complete top-level value was decoded.
    #[error("trailing garbage ({0} bytes)")]
    TrailingGarbage(usize),

    /// Structural problem in the decoded data.
    #[error("malformed input: {0}")]
    Malformed(String),
}

/// Errors from parsing the hex text form of a hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Text did not contain exactly 64 hex digits.
    #[error("invalid hash length: expected 64 hex digits, got {0}")]
    InvalidLength(usize),

    /// Text contained a non-hex character.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Raw byte slice was not 32 bytes long.
    #[error("invalid byte length: expected 32, got {0}")]
    InvalidByteLength(usize),
}

/// Result type for encoding operations.
pub type EncodingResult<T> = Result<T, EncodingError>;
