//! # Domain Errors
//!
//! Errors from decoding the legacy wire format and mapping it to entries.

use ec_01_entries::EntryError;
use shared_types::{AssetId, EncodingError};
use thiserror::Error;

/// Errors from the legacy layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegacyError {
    /// Low-level encoding failure (range, truncation, trailing bytes).
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),

    /// Transactions must be decoded with every section present.
    #[error("unsupported transaction serialization flags {0:#04x}")]
    InvalidSerFlags(u8),

    /// Block serialization flags outside the known set.
    #[error("unsupported block serialization flags {0:#04x}")]
    InvalidBlockSerFlags(u8),

    /// Input commitment type byte is neither issuance nor spend.
    #[error("unsupported input type {0}")]
    UnknownInputType(u8),

    /// Issuance witness does not hash to the committed asset ID.
    #[error("issuance witness asset ID {computed} does not match commitment {declared}")]
    BadAssetId {
        computed: AssetId,
        declared: AssetId,
    },

    /// Decoded list longer than the configured limit.
    #[error("too many {what}: {count} > {max}")]
    TooMany {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// Decoded byte string longer than the configured limit.
    #[error("{field} is {len} bytes, limit is {max}")]
    ByteStringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// An issuance without a nonce needs a spend in the same transaction.
    #[error("issuance at input {input_index} has no nonce and the transaction has no spend")]
    MissingAnchor { input_index: usize },

    /// Text form is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Entry construction failed.
    #[error(transparent)]
    Entry(#[from] EntryError),
}

/// Result type for legacy operations.
pub type LegacyResult<T> = Result<T, LegacyError>;
