//! # Shared Types Crate
//!
//! Leaf crate of the Entry-Chain workspace. Everything that ends up inside a
//! hash is defined here so that every subsystem produces byte-identical
//! output.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `encoding` | Varints, length-prefixed strings, extensible strings |
//! | `hash` | `Hash` / `AssetId`, SHA3-256 hashing, hex text form |
//! | `write_for_hash` | Type-directed encoder feeding entry IDs |
//! | `serde_hex` | Hex rendering of byte-string fields |
//! | `errors` | Encoding and hash parsing errors |
//!
//! ## Design Principles
//!
//! - **Consensus-critical bytes**: Field order and integer widths are part of
//!   the protocol. Changing them is a hard fork.
//! - **No panics on untrusted input**: Every read returns `EncodingResult`.

pub mod encoding;
pub mod errors;
pub mod hash;
pub mod serde_hex;
pub mod write_for_hash;

pub use encoding::{ByteSink, Reader};
pub use errors::*;
pub use hash::{sha3_256, AssetId, Hash, Sha3Hasher};
pub use write_for_hash::{write_slice_for_hash, WriteForHash};
