//! # Validation Errors
//!
//! One variant per consensus rule, so callers can tell rejections apart
//! without parsing messages. `Context` wraps an error with where it was
//! found (which input, which entry) while unwinding.

use ec_01_entries::{AssetAmount, EntryError};
use ec_03_patricia::PatriciaError;
use shared_types::{AssetId, EncodingError, Hash};
use thiserror::Error;

/// Failures reported by a program verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("program evaluated to false")]
    FalseResult,

    #[error("unsupported vm version {0}")]
    UnsupportedVm(u64),

    #[error("unsupported opcode 0x{0:02x}")]
    UnsupportedOp(u8),

    #[error("program failed: {0}")]
    Failed(String),

    #[error("bad value: {0}")]
    BadValue(String),

    /// Introspection not available for the entry being verified.
    #[error("operation not valid in this context")]
    Context,

    #[error("missing entry {0}")]
    MissingEntry(Hash),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ---- structure -------------------------------------------------------
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("entry {entry_id} is missing its {field}")]
    MissingField {
        entry_id: Hash,
        field: &'static str,
    },

    #[error("entry {entry_id} references itself through its own checks")]
    Cycle { entry_id: Hash },

    #[error("position {position} out of range ({count} available)")]
    Position { position: u64, count: usize },

    #[error("mismatched reference: expected {expected}, got {actual}")]
    MismatchedReference { expected: Hash, actual: Hash },

    #[error("mismatched position: expected {expected}, got {actual}")]
    MismatchedPosition { expected: u64, actual: u64 },

    #[error("mismatched value: expected {expected:?}, got {actual:?}")]
    MismatchedValue {
        expected: AssetAmount,
        actual: AssetAmount,
    },

    // ---- transaction rules ----------------------------------------------
    #[error("amounts of asset {asset_id} overflow")]
    Overflow { asset_id: AssetId },

    #[error("destination asset {asset_id} has no source")]
    NoSource { asset_id: AssetId },

    #[error("unbalanced asset {asset_id}: {sources} in, {destinations} out")]
    Unbalanced {
        asset_id: AssetId,
        sources: u64,
        destinations: u64,
    },

    #[error("entry {entry_id} has a non-empty extension hash")]
    NonemptyExtHash { entry_id: Hash },

    #[error("transaction has no results")]
    EmptyResults,

    #[error("bad time range [{min_time_ms}, {max_time_ms}]")]
    BadTimeRange { min_time_ms: u64, max_time_ms: u64 },

    #[error("nonce time range must have non-zero bounds")]
    ZeroTime,

    #[error("asset defined for blockchain {actual}, expected {expected}")]
    WrongBlockchain { expected: Hash, actual: Hash },

    #[error("mismatched asset id: computed {computed}, declared {declared}")]
    MismatchedAssetId { computed: AssetId, declared: AssetId },

    #[error(transparent)]
    Vm(#[from] VmError),

    // ---- block rules ----------------------------------------------------
    #[error("no previous block for block at height {height}")]
    NoPrevBlock { height: u64 },

    #[error("block height {height} does not follow {prev}")]
    MisorderedBlockHeight { prev: u64, height: u64 },

    #[error("block version {version} is lower than {prev}")]
    VersionRegression { prev: u64, version: u64 },

    #[error("previous block id {actual} does not match {expected}")]
    MismatchedBlock { expected: Hash, actual: Hash },

    #[error("block timestamp {timestamp_ms} not after {prev}")]
    MisorderedBlockTime { prev: u64, timestamp_ms: u64 },

    #[error("block version 1 requires transaction version 1, got {version}")]
    TxVersion { version: u64 },

    #[error("transaction window [{min_time_ms}, {max_time_ms}] excludes block time {timestamp_ms}")]
    Untimely {
        timestamp_ms: u64,
        min_time_ms: u64,
        max_time_ms: u64,
    },

    #[error("mismatched transactions root: computed {computed}, declared {declared}")]
    MismatchedMerkleRoot { computed: Hash, declared: Hash },

    #[error("mismatched assets root: computed {computed}, declared {declared}")]
    MismatchedAssetsRoot { computed: Hash, declared: Hash },

    #[error(transparent)]
    Snapshot(#[from] PatriciaError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    // ---- wrapping -------------------------------------------------------
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// The underlying rule violation, with all context stripped.
    pub fn root(&self) -> &ValidationError {
        let mut err = self;
        while let ValidationError::Context { source, .. } = err {
            err = source;
        }
        err
    }

    /// Wrap this error with a description of where it was found.
    pub fn wrap(self, context: impl Into<String>) -> Self {
        ValidationError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Attach context to any error convertible into `ValidationError`.
pub trait ValidationResultExt<T> {
    fn context(self, context: &str) -> ValidationResult<T>;

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ValidationResult<T>;
}

impl<T, E: Into<ValidationError>> ValidationResultExt<T> for Result<T, E> {
    fn context(self, context: &str) -> ValidationResult<T> {
        self.map_err(|e| e.into().wrap(context))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ValidationResult<T> {
        self.map_err(|e| e.into().wrap(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_strips_context() {
        let err: ValidationResult<()> = Err(ValidationError::EmptyResults);
        let err = err
            .context("checking header")
            .with_context(|| format!("tx {}", 3))
            .unwrap_err();
        assert_eq!(err.root(), &ValidationError::EmptyResults);
        assert_eq!(err.to_string(), "tx 3: checking header: transaction has no results");
    }

    #[test]
    fn test_context_from_foreign_error() {
        let res: Result<(), VmError> = Err(VmError::FalseResult);
        let err = res.context("checking mux program").unwrap_err();
        assert_eq!(err.root(), &ValidationError::Vm(VmError::FalseResult));
    }
}
