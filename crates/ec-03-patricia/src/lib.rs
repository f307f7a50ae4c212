//! # Patricia Subsystem (ec-03)
//!
//! Commitment to the unspent output set.
//!
//! ```text
//!            root (key = common prefix)
//!           /                          \
//!     bit 0 subtree               bit 1 subtree
//!        ...                          ...
//!   leaf(output ID)             leaf(output ID)
//!
//! leaf     = H(0x00 || value)
//! interior = H(0x01 || child[0] || child[1])
//! ```
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `domain::tree` | Persistent binary radix tree |
//! | `domain::snapshot` | UTXO set + live nonces, applied per tx and per block |
//! | `ports::output_set` | Yes/no lookup of unspent outputs |
//!
//! ## Concurrency
//!
//! Trees share structure through `Arc`, so a snapshot clone can be read
//! from other threads while the next block is applied to another clone.
//! Writers must be serialized by the caller.

pub mod domain;
pub mod ports;

pub use domain::*;
pub use ports::*;
