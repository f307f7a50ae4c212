//! # Block Aggregate
//!
//! A block header entry, its ID, and the block's transactions.

use shared_types::Hash;

use super::entries::BlockHeaderEntry;
use super::entry_id::tagged_id;
use super::errors::EntryResult;
use super::merkle::merkle_root;
use super::tx::Tx;
use super::value_objects::TYPE_BLOCK_HEADER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeaderEntry,
    /// The header's entry ID.
    pub id: Hash,
    pub transactions: Vec<Tx>,
}

impl Block {
    pub fn new(header: BlockHeaderEntry, transactions: Vec<Tx>) -> EntryResult<Self> {
        let id = block_header_id(&header)?;
        Ok(Self {
            header,
            id,
            transactions,
        })
    }

    pub fn version(&self) -> u64 {
        self.header.version
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.header.timestamp_ms
    }

    pub fn transaction_ids(&self) -> Vec<Hash> {
        self.transactions.iter().map(|tx| tx.id).collect()
    }

    /// Merkle root recomputed from the contained transactions.
    pub fn compute_transactions_root(&self) -> Hash {
        merkle_root(&self.transaction_ids())
    }
}

/// Entry ID of a block header.
pub fn block_header_id(header: &BlockHeaderEntry) -> EntryResult<Hash> {
    tagged_id(TYPE_BLOCK_HEADER, header)
}
