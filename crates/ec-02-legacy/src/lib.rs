//! # Legacy Subsystem (ec-02)
//!
//! Decodes and encodes transactions and blocks in the legacy wire format,
//! and maps them to the entry graph that is hashed and validated.
//!
//! ```text
//! hex / bytes ──decode──→ TxData ──map_tx──→ ec_01_entries::Tx
//!                         Block  ──map_block─→ ec_01_entries::Block
//! ```
//!
//! Transactions are only accepted with serialization flags `0x07` (witness,
//! prevout and metadata all present). Bytes left after a complete value are
//! rejected. Unknown trailing fields inside extensible strings are kept as
//! suffixes and written back unchanged.

pub mod domain;

pub use domain::{
    map_block, map_block_header, map_tx, Block, BlockCommitment, BlockHeader, BlockWitness,
    DecodeLimits, IssuanceInput, LegacyError, LegacyResult, OutputCommitment, SpendCommitment,
    SpendInput, TxData, TxInput, TxOutput, TypedInput,
};
