//! # Block Validation
//!
//! Sequencing against the previous block, the previous block's consensus
//! program, per-transaction rules and the transactions root. The first
//! failing check is returned.

use ec_01_entries::program::DEFAULT_VM_VERSION;
use ec_01_entries::{Block, Program, Tx};
use tracing::debug;

use super::config::ValidationConfig;
use super::errors::{ValidationError, ValidationResult, ValidationResultExt};
use super::tx_validation::validate_tx;
use super::vm_context::VmContext;
use crate::ports::ProgramVerifier;

/// Validate `block` as the successor of `prev`.
///
/// `prev` is `None` only for the first block, which must be at height 1.
pub fn validate_block(
    block: &Block,
    prev: Option<&Block>,
    config: &ValidationConfig,
    verifier: &dyn ProgramVerifier,
) -> ValidationResult<()> {
    let result = check_block(block, prev, config, verifier);
    if let Err(err) = &result {
        debug!(
            "[ec-04] rejected block {} at height {}: {}",
            block.id,
            block.height(),
            err
        );
    }
    result
}

fn check_block(
    block: &Block,
    prev: Option<&Block>,
    config: &ValidationConfig,
    verifier: &dyn ProgramVerifier,
) -> ValidationResult<()> {
    match prev {
        None => {
            if block.height() != 1 {
                return Err(ValidationError::NoPrevBlock {
                    height: block.height(),
                });
            }
        }
        Some(prev) => {
            check_against_prev(block, prev)?;
            if config.run_predicate {
                let program = Program::new(
                    DEFAULT_VM_VERSION,
                    prev.header.next_consensus_program.clone(),
                );
                verifier
                    .verify(&VmContext::for_block(block, &program))
                    .context("checking consensus program")?;
            }
        }
    }

    if block.version() <= 1 && !block.header.ext_hash.is_zero() {
        return Err(ValidationError::NonemptyExtHash { entry_id: block.id });
    }

    for (i, tx) in block.transactions.iter().enumerate() {
        check_tx_in_block(block, tx)
            .and_then(|()| validate_tx(tx, &config.initial_block_id, verifier))
            .with_context(|| format!("validating tx {i} ({})", tx.id))?;
    }

    let computed = block.compute_transactions_root();
    if computed != block.header.transactions_root {
        return Err(ValidationError::MismatchedMerkleRoot {
            computed,
            declared: block.header.transactions_root,
        });
    }
    Ok(())
}

fn check_against_prev(block: &Block, prev: &Block) -> ValidationResult<()> {
    if block.version() < prev.version() {
        return Err(ValidationError::VersionRegression {
            prev: prev.version(),
            version: block.version(),
        });
    }
    if Some(block.height()) != prev.height().checked_add(1) {
        return Err(ValidationError::MisorderedBlockHeight {
            prev: prev.height(),
            height: block.height(),
        });
    }
    if block.header.previous_block_id != prev.id {
        return Err(ValidationError::MismatchedBlock {
            expected: prev.id,
            actual: block.header.previous_block_id,
        });
    }
    if block.timestamp_ms() <= prev.timestamp_ms() {
        return Err(ValidationError::MisorderedBlockTime {
            prev: prev.timestamp_ms(),
            timestamp_ms: block.timestamp_ms(),
        });
    }
    Ok(())
}

/// Rules tying a transaction to the block carrying it.
fn check_tx_in_block(block: &Block, tx: &Tx) -> ValidationResult<()> {
    if block.version() == 1 && tx.version() != 1 {
        return Err(ValidationError::TxVersion {
            version: tx.version(),
        });
    }
    let timestamp_ms = block.timestamp_ms();
    let too_late = tx.max_time_ms() > 0 && timestamp_ms > tx.max_time_ms();
    let too_early = tx.min_time_ms() > 0 && timestamp_ms < tx.min_time_ms();
    if too_late || too_early {
        return Err(ValidationError::Untimely {
            timestamp_ms,
            min_time_ms: tx.min_time_ms(),
            max_time_ms: tx.max_time_ms(),
        });
    }
    Ok(())
}
