use ec_01_entries::EntryError;
use shared_types::Hash;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatriciaError {
    /// A key would be a strict prefix of another key, or an interior path.
    #[error("key is a prefix of, or prefixed by, an existing key ({bits} bits)")]
    Prefix { bits: usize },

    #[error("nonce {nonce_id} already used and not yet expired")]
    NonceConflict { nonce_id: Hash },

    #[error("spent output {output_id} not in the snapshot")]
    MissingSpentOutput { output_id: Hash },

    #[error(transparent)]
    Entry(#[from] EntryError),
}

pub type PatriciaResult<T> = Result<T, PatriciaError>;
