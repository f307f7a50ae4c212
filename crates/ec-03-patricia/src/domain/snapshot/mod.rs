//! # UTXO Snapshot
//!
//! The unspent output set as a patricia tree, plus the nonces that are
//! still inside their time window. The tree root is the block's assets
//! root.
//!
//! Output IDs are stored as both key and value.

use std::collections::HashMap;

use ec_01_entries::{Block, Tx};
use shared_types::Hash;
use tracing::debug;

use super::errors::{PatriciaError, PatriciaResult};
use super::tree::Tree;
use crate::ports::OutputSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tree: Tree,
    /// Nonce ID -> expiry (the nonce time range's max, in ms).
    pub nonces: HashMap<Hash, u64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets_root(&self) -> Hash {
        self.tree.root_hash()
    }

    /// Apply one transaction: record its nonces, remove the outputs it
    /// spends and add the outputs it creates. Retirements are not stored.
    ///
    /// On error the snapshot is unchanged.
    pub fn apply_tx(&mut self, tx: &Tx) -> PatriciaResult<()> {
        let mut nonces = Vec::with_capacity(tx.nonce_ids.len());
        for nonce_id in &tx.nonce_ids {
            if self.nonces.contains_key(nonce_id) || nonces.iter().any(|(id, _)| id == nonce_id) {
                return Err(PatriciaError::NonceConflict {
                    nonce_id: *nonce_id,
                });
            }
            let nonce = tx.nonce(nonce_id)?;
            let time_range = tx.time_range(&nonce.time_range_id)?;
            nonces.push((*nonce_id, time_range.max_time_ms));
        }

        if let Some(missing) = tx
            .spent_output_ids
            .iter()
            .find(|id| !self.contains_output(id))
        {
            return Err(PatriciaError::MissingSpentOutput {
                output_id: *missing,
            });
        }

        let mut tree = self.tree.clone();
        for id in &tx.spent_output_ids {
            tree.delete(id.as_bytes());
        }
        for id in &tx.output_ids {
            tree.insert(id.as_bytes(), *id)?;
        }

        self.tree = tree;
        self.nonces.extend(nonces);
        debug!(
            "[ec-03] applied tx {}: -{} +{} outputs",
            tx.id,
            tx.spent_output_ids.len(),
            tx.output_ids.len()
        );
        Ok(())
    }

    /// Forget nonces whose window closed before `timestamp_ms`.
    pub fn prune_nonces(&mut self, timestamp_ms: u64) {
        let before = self.nonces.len();
        self.nonces.retain(|_, expiry| *expiry >= timestamp_ms);
        let pruned = before - self.nonces.len();
        if pruned > 0 {
            debug!("[ec-03] pruned {} expired nonces", pruned);
        }
    }

    /// Prune expired nonces at the block's timestamp, then apply every
    /// transaction in order. All or nothing.
    pub fn apply_block(&mut self, block: &Block) -> PatriciaResult<()> {
        let mut next = self.clone();
        next.prune_nonces(block.timestamp_ms());
        for tx in &block.transactions {
            next.apply_tx(tx)?;
        }
        *self = next;
        debug!(
            "[ec-03] applied block {} at height {}, assets root {}",
            block.id,
            block.height(),
            self.assets_root()
        );
        Ok(())
    }
}

impl OutputSet for Snapshot {
    fn contains_output(&self, output_id: &Hash) -> bool {
        self.tree.contains(output_id.as_bytes(), output_id)
    }
}

#[cfg(test)]
mod tests;
