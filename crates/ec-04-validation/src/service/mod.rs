//! # Validation Service
//!
//! Binds a `ValidationConfig` to a program verifier and threads the UTXO
//! snapshot through block application.

use std::sync::Arc;

use ec_01_entries::{Block, Tx};
use ec_03_patricia::Snapshot;
use tracing::info;

use crate::domain::{
    validate_block, validate_tx, ValidationConfig, ValidationError, ValidationResult,
};
use crate::ports::ProgramVerifier;

pub struct ValidationService<V: ProgramVerifier> {
    verifier: Arc<V>,
    config: ValidationConfig,
}

impl<V: ProgramVerifier> ValidationService<V> {
    pub fn new(verifier: Arc<V>, config: ValidationConfig) -> ValidationResult<Self> {
        config.validate()?;
        Ok(Self { verifier, config })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate_tx(&self, tx: &Tx) -> ValidationResult<()> {
        validate_tx(tx, &self.config.initial_block_id, self.verifier.as_ref())
    }

    pub fn validate_block(&self, block: &Block, prev: Option<&Block>) -> ValidationResult<()> {
        validate_block(block, prev, &self.config, self.verifier.as_ref())
    }

    /// Validate `block`, apply it to a copy of `snapshot` and check the
    /// resulting assets root. Returns the new snapshot; `snapshot` itself
    /// is never modified.
    pub fn validate_and_apply_block(
        &self,
        snapshot: &Snapshot,
        block: &Block,
        prev: Option<&Block>,
    ) -> ValidationResult<Snapshot> {
        self.validate_block(block, prev)?;

        let mut next = snapshot.clone();
        next.apply_block(block)?;

        let computed = next.assets_root();
        if self.config.check_assets_root && computed != block.header.assets_root {
            return Err(ValidationError::MismatchedAssetsRoot {
                computed,
                declared: block.header.assets_root,
            });
        }

        info!(
            "[ec-04] accepted block {} at height {} ({} txs, {} unspent outputs)",
            block.id,
            block.height(),
            block.transactions.len(),
            next.tree.len()
        );
        Ok(next)
    }
}
