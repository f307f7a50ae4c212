use serde::{Deserialize, Serialize};
use shared_types::Hash;

use super::errors::{ValidationError, ValidationResult};

/// Validation settings for one blockchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// ID of the chain's first block; issuances must name it.
    pub initial_block_id: Hash,
    /// Evaluate the previous block's consensus program against each new
    /// block's witness.
    pub run_predicate: bool,
    /// Compare the post-block snapshot root with the header's assets root.
    pub check_assets_root: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            initial_block_id: Hash::ZERO,
            run_predicate: true,
            check_assets_root: true,
        }
    }
}

impl ValidationConfig {
    pub fn new(initial_block_id: Hash) -> ValidationResult<Self> {
        let config = Self::default().with_initial_block_id(initial_block_id);
        config.validate()?;
        Ok(config)
    }

    /// The chain ID must be set before anything is validated against it.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.initial_block_id.is_zero() {
            return Err(ValidationError::InvalidConfig(
                "initial_block_id cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_initial_block_id(mut self, id: Hash) -> Self {
        self.initial_block_id = id;
        self
    }

    pub fn with_run_predicate(mut self, run: bool) -> Self {
        self.run_predicate = run;
        self
    }

    pub fn with_check_assets_root(mut self, check: bool) -> Self {
        self.check_assets_root = check;
        self
    }
}
