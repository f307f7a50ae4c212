//! # Entries Subsystem (ec-01)
//!
//! The entry graph that transactions and blocks are hashed and validated as.
//!
//! A transaction is a small DAG of typed entries, each identified by the
//! hash of its body:
//!
//! ```text
//!   Spend ─┐                ┌─→ Output
//!          ├─→ Mux ─────────┤
//! Issuance ┘    (sources)   └─→ Retirement
//!    │                          (destinations)
//!    └─ anchor: Nonce ─→ TimeRange
//!
//! TxHeader.result_ids = [Output | Retirement, ...]    id(TxHeader) = tx ID
//! ```
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `domain::entries` | The nine entry kinds and the `Entry` enum |
//! | `domain::entry_id` | Domain-separated content IDs |
//! | `domain::tx` | `Tx` aggregate, derived indices, `sig_hash` |
//! | `domain::block` | `Block` aggregate and block IDs |
//! | `domain::merkle` | Transaction Merkle root and inclusion proofs |
//! | `domain::value_objects` | Programs, amounts, value references, asset IDs |
//! | `domain::program` | Opcodes and a bytecode builder |

pub mod domain;

pub use domain::{
    block_header_id, compute_asset_id, entry_id, hash_data, merkle_root, optional_entry_id,
    tagged_id, AssetAmount, AssetDefinition, Block, BlockHeaderEntry, Entry, EntryError,
    EntryResult, Issuance, MerkleProof, MerkleTree, Mux, Nonce, Output, Program, Retirement,
    Spend, TimeRange, Tx, TxHeader, ValueDestination, ValueSource,
};
pub use domain::{program, value_objects};
