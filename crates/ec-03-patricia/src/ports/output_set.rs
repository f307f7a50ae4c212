use std::collections::HashSet;

use shared_types::Hash;

/// Read access to the unspent output set.
///
/// Validation only needs a yes/no answer; where and how outputs are stored
/// is the caller's concern.
pub trait OutputSet {
    fn contains_output(&self, output_id: &Hash) -> bool;
}

impl OutputSet for HashSet<Hash> {
    fn contains_output(&self, output_id: &Hash) -> bool {
        self.contains(output_id)
    }
}
