//! # Value Objects
//!
//! Serialization flags and decode limits.

use serde::{Deserialize, Serialize};

use super::errors::{LegacyError, LegacyResult};

// =============================================================================
// TRANSACTION SERIALIZATION FLAGS
// =============================================================================

/// Include input and output witnesses.
pub const SER_WITNESS: u8 = 0x1;
/// Include full spend commitments instead of their hashes.
pub const SER_PREVOUT: u8 = 0x2;
/// Include reference data instead of its hash.
pub const SER_METADATA: u8 = 0x4;
/// The only flag combination accepted on decode.
pub const SER_VALID: u8 = SER_WITNESS | SER_PREVOUT | SER_METADATA;

// =============================================================================
// BLOCK SERIALIZATION FLAGS
// =============================================================================

pub const SER_BLOCK_WITNESS: u8 = 0x1;
pub const SER_BLOCK_TRANSACTIONS: u8 = 0x2;

pub const SER_BLOCK_SIG_HASH: u8 = 0;
pub const SER_BLOCK_HEADER: u8 = SER_BLOCK_WITNESS;
pub const SER_BLOCK_FULL: u8 = SER_BLOCK_WITNESS | SER_BLOCK_TRANSACTIONS;

// =============================================================================
// INPUT COMMITMENT TYPES
// =============================================================================

pub const ISSUANCE_INPUT_TYPE: u8 = 0;
pub const SPEND_INPUT_TYPE: u8 = 1;

/// The only asset version whose commitments and witnesses are understood.
pub const ASSET_VERSION_1: u64 = 1;

// =============================================================================
// DECODE LIMITS
// =============================================================================

/// Bounds applied while decoding untrusted bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    pub max_inputs: usize,
    pub max_outputs: usize,
    pub max_transactions: usize,
    /// Entries in one witness argument list.
    pub max_arguments: usize,
    /// Applies to every variable-length byte string: reference data,
    /// programs, nonces, asset definitions and witness arguments.
    pub max_byte_string_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_inputs: 10_000,
            max_outputs: 10_000,
            max_transactions: 100_000,
            max_arguments: 1_000,
            max_byte_string_len: 1 << 20,
        }
    }
}

impl DecodeLimits {
    /// No limits beyond what the input itself bounds.
    pub fn unbounded() -> Self {
        Self {
            max_inputs: usize::MAX,
            max_outputs: usize::MAX,
            max_transactions: usize::MAX,
            max_arguments: usize::MAX,
            max_byte_string_len: usize::MAX,
        }
    }

    pub fn with_max_inputs(mut self, max: usize) -> Self {
        self.max_inputs = max;
        self
    }

    pub fn with_max_outputs(mut self, max: usize) -> Self {
        self.max_outputs = max;
        self
    }

    pub fn with_max_transactions(mut self, max: usize) -> Self {
        self.max_transactions = max;
        self
    }

    pub fn with_max_arguments(mut self, max: usize) -> Self {
        self.max_arguments = max;
        self
    }

    pub fn with_max_byte_string_len(mut self, max: usize) -> Self {
        self.max_byte_string_len = max;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_inputs == 0 && self.max_outputs == 0 {
            return Err("max_inputs and max_outputs cannot both be 0".into());
        }
        if self.max_transactions == 0 {
            return Err("max_transactions must be > 0".into());
        }
        Ok(())
    }

    pub(crate) fn check_inputs(&self, count: u64) -> LegacyResult<usize> {
        check_count("inputs", count, self.max_inputs)
    }

    pub(crate) fn check_outputs(&self, count: u64) -> LegacyResult<usize> {
        check_count("outputs", count, self.max_outputs)
    }

    pub(crate) fn check_transactions(&self, count: u64) -> LegacyResult<usize> {
        check_count("transactions", count, self.max_transactions)
    }

    pub(crate) fn check_len(&self, field: &'static str, bytes: &[u8]) -> LegacyResult<()> {
        if bytes.len() > self.max_byte_string_len {
            return Err(LegacyError::ByteStringTooLong {
                field,
                len: bytes.len(),
                max: self.max_byte_string_len,
            });
        }
        Ok(())
    }

    /// Count and per-item length of a byte-string list.
    pub(crate) fn check_list(&self, field: &'static str, items: &[Vec<u8>]) -> LegacyResult<()> {
        check_count(field, items.len() as u64, self.max_arguments)?;
        items.iter().try_for_each(|item| self.check_len(field, item))
    }
}

fn check_count(what: &'static str, count: u64, max: usize) -> LegacyResult<usize> {
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    if count > max {
        return Err(LegacyError::TooMany { what, count, max });
    }
    Ok(count)
}
