//! # Entries
//!
//! The nine entry kinds that make up transaction and block graphs.
//!
//! Every entry has a *body*, which is hashed into its ID, and for most kinds
//! a *witness*, which is not. Witness fields carry VM arguments and the
//! reverse pointers that complete the source/destination wiring; they can be
//! filled in after the ID is known without changing it.
//!
//! Cross-references between entries are plain `Hash` values resolved through
//! the owning `Tx`'s entry map.

use serde::{Deserialize, Serialize};
use shared_types::{write_slice_for_hash, ByteSink, EncodingResult, Hash, WriteForHash};

use super::value_objects::*;

// =============================================================================
// TRANSACTION HEADER
// =============================================================================

/// The transaction's hash-of-record. Its ID is the transaction ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    pub version: u64,
    pub result_ids: Vec<Hash>,
    pub data: Hash,
    pub min_time_ms: u64,
    pub max_time_ms: u64,
    pub ext_hash: Hash,
}

impl WriteForHash for TxHeader {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.version.write_for_hash(w)?;
        self.result_ids.write_for_hash(w)?;
        self.data.write_for_hash(w)?;
        self.min_time_ms.write_for_hash(w)?;
        self.max_time_ms.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

// =============================================================================
// MUX
// =============================================================================

/// Routes all value entering a transaction to all value leaving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mux {
    pub sources: Vec<ValueSource>,
    pub program: Program,
    pub ext_hash: Hash,

    // witness
    pub witness_destinations: Vec<ValueDestination>,
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub witness_arguments: Vec<Vec<u8>>,
}

impl WriteForHash for Mux {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        write_slice_for_hash(w, &self.sources)?;
        self.program.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// New value locked by a control program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub source: ValueSource,
    pub control_program: Program,
    pub data: Hash,
    pub ext_hash: Hash,
    pub ordinal: u64,
}

impl WriteForHash for Output {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.source.write_for_hash(w)?;
        self.control_program.write_for_hash(w)?;
        self.data.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

/// Value removed from circulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retirement {
    pub source: ValueSource,
    pub data: Hash,
    pub ext_hash: Hash,
    pub ordinal: u64,
}

impl WriteForHash for Retirement {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.source.write_for_hash(w)?;
        self.data.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

// =============================================================================
// INPUTS
// =============================================================================

/// Consumes a previous output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spend {
    pub spent_output_id: Hash,
    pub data: Hash,
    pub ext_hash: Hash,
    pub ordinal: u64,

    // witness
    pub witness_destination: Option<ValueDestination>,
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub witness_arguments: Vec<Vec<u8>>,
    pub witness_anchored_id: Option<Hash>,
}

impl WriteForHash for Spend {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.spent_output_id.write_for_hash(w)?;
        self.data.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

/// Creates new units of an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuance {
    pub anchor_id: Hash,
    pub value: AssetAmount,
    pub data: Hash,
    pub ext_hash: Hash,
    pub ordinal: u64,

    // witness
    pub witness_destination: Option<ValueDestination>,
    pub witness_asset_definition: AssetDefinition,
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub witness_arguments: Vec<Vec<u8>>,
    pub witness_anchored_id: Option<Hash>,
}

impl WriteForHash for Issuance {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.anchor_id.write_for_hash(w)?;
        self.value.write_for_hash(w)?;
        self.data.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

// =============================================================================
// ANCHORS
// =============================================================================

/// Unique anchor for an issuance that has no spend to anchor on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce {
    pub program: Program,
    pub time_range_id: Hash,
    pub ext_hash: Hash,

    // witness
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub witness_arguments: Vec<Vec<u8>>,
    pub witness_anchored_id: Option<Hash>,
}

impl WriteForHash for Nonce {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.program.write_for_hash(w)?;
        self.time_range_id.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

/// Time window a nonce is valid in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min_time_ms: u64,
    pub max_time_ms: u64,
    pub ext_hash: Hash,
}

impl WriteForHash for TimeRange {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.min_time_ms.write_for_hash(w)?;
        self.max_time_ms.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

// =============================================================================
// BLOCK HEADER
// =============================================================================

/// The block's hash-of-record. Its ID is the block ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderEntry {
    pub version: u64,
    pub height: u64,
    pub previous_block_id: Hash,
    pub timestamp_ms: u64,
    pub transactions_root: Hash,
    pub assets_root: Hash,
    #[serde(with = "shared_types::serde_hex::bytes")]
    pub next_consensus_program: Vec<u8>,
    pub ext_hash: Hash,

    // witness
    #[serde(with = "shared_types::serde_hex::byte_list")]
    pub witness_arguments: Vec<Vec<u8>>,
}

impl WriteForHash for BlockHeaderEntry {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        self.version.write_for_hash(w)?;
        self.height.write_for_hash(w)?;
        self.previous_block_id.write_for_hash(w)?;
        self.timestamp_ms.write_for_hash(w)?;
        self.transactions_root.write_for_hash(w)?;
        self.assets_root.write_for_hash(w)?;
        self.next_consensus_program.write_for_hash(w)?;
        self.ext_hash.write_for_hash(w)
    }
}

// =============================================================================
// ENTRY
// =============================================================================

/// Any entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    TxHeader(TxHeader),
    Mux(Mux),
    Output(Output),
    Retirement(Retirement),
    Spend(Spend),
    Issuance(Issuance),
    Nonce(Nonce),
    TimeRange(TimeRange),
    BlockHeader(BlockHeaderEntry),
}

impl Entry {
    /// Type tag mixed into the entry ID.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Entry::TxHeader(_) => TYPE_TX_HEADER,
            Entry::Mux(_) => TYPE_MUX,
            Entry::Output(_) => TYPE_OUTPUT,
            Entry::Retirement(_) => TYPE_RETIREMENT,
            Entry::Spend(_) => TYPE_SPEND,
            Entry::Issuance(_) => TYPE_ISSUANCE,
            Entry::Nonce(_) => TYPE_NONCE,
            Entry::TimeRange(_) => TYPE_TIME_RANGE,
            Entry::BlockHeader(_) => TYPE_BLOCK_HEADER,
        }
    }

    /// Position among the legacy transaction's inputs or outputs.
    ///
    /// `None` for entries that did not originate from one.
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            Entry::Output(e) => Some(e.ordinal),
            Entry::Retirement(e) => Some(e.ordinal),
            Entry::Spend(e) => Some(e.ordinal),
            Entry::Issuance(e) => Some(e.ordinal),
            Entry::TxHeader(_)
            | Entry::Mux(_)
            | Entry::Nonce(_)
            | Entry::TimeRange(_)
            | Entry::BlockHeader(_) => None,
        }
    }

    /// The extension hash carried in the body.
    pub fn ext_hash(&self) -> &Hash {
        match self {
            Entry::TxHeader(e) => &e.ext_hash,
            Entry::Mux(e) => &e.ext_hash,
            Entry::Output(e) => &e.ext_hash,
            Entry::Retirement(e) => &e.ext_hash,
            Entry::Spend(e) => &e.ext_hash,
            Entry::Issuance(e) => &e.ext_hash,
            Entry::Nonce(e) => &e.ext_hash,
            Entry::TimeRange(e) => &e.ext_hash,
            Entry::BlockHeader(e) => &e.ext_hash,
        }
    }
}

impl WriteForHash for Entry {
    fn write_for_hash<W: ByteSink + ?Sized>(&self, w: &mut W) -> EncodingResult<()> {
        match self {
            Entry::TxHeader(e) => e.write_for_hash(w),
            Entry::Mux(e) => e.write_for_hash(w),
            Entry::Output(e) => e.write_for_hash(w),
            Entry::Retirement(e) => e.write_for_hash(w),
            Entry::Spend(e) => e.write_for_hash(w),
            Entry::Issuance(e) => e.write_for_hash(w),
            Entry::Nonce(e) => e.write_for_hash(w),
            Entry::TimeRange(e) => e.write_for_hash(w),
            Entry::BlockHeader(e) => e.write_for_hash(w),
        }
    }
}

macro_rules! impl_from_body {
    ($($body:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$body> for Entry {
                fn from(body: $body) -> Self {
                    Entry::$variant(body)
                }
            }
        )*
    };
}

impl_from_body!(
    TxHeader => TxHeader,
    Mux => Mux,
    Output => Output,
    Retirement => Retirement,
    Spend => Spend,
    Issuance => Issuance,
    Nonce => Nonce,
    TimeRange => TimeRange,
    BlockHeaderEntry => BlockHeader,
);
