//! # Transaction Merkle Tree
//!
//! Left-balanced binary hash tree over transaction IDs, shaped like the
//! Certificate Transparency tree:
//!
//! ```text
//! root([])      = SHA3("")
//! root([x])     = SHA3(0x00 || x)
//! root(xs)      = SHA3(0x01 || root(xs[..k]) || root(xs[k..]))
//!                 where k is the largest power of two < len(xs)
//! ```
//!
//! Leaves and interior nodes carry distinct prefixes, so an interior node can
//! never be passed off as a leaf. No padding or leaf duplication is done.

use serde::{Deserialize, Serialize};
use shared_types::{sha3_256, Hash, Sha3Hasher};

use super::errors::{EntryError, EntryResult};

const LEAF_PREFIX: u8 = 0x00;
const INTERIOR_PREFIX: u8 = 0x01;

/// Merkle root of a list of transaction IDs.
pub fn merkle_root(ids: &[Hash]) -> Hash {
    match ids.len() {
        0 => sha3_256(&[]),
        1 => leaf_hash(&ids[0]),
        n => {
            let k = split_point(n);
            interior_hash(&merkle_root(&ids[..k]), &merkle_root(&ids[k..]))
        }
    }
}

/// `SHA3(0x00 || id)`.
pub fn leaf_hash(id: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher.update(&[LEAF_PREFIX]).update(id.as_bytes());
    hasher.finalize()
}

/// `SHA3(0x01 || left || right)`.
pub fn interior_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher
        .update(&[INTERIOR_PREFIX])
        .update(left.as_bytes())
        .update(right.as_bytes());
    hasher.finalize()
}

/// Largest power of two strictly less than `n` (`n >= 2`).
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

// =============================================================================
// TREE AND INCLUSION PROOFS
// =============================================================================

/// A Merkle tree over a block's transaction IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    leaves: Vec<Hash>,
    root: Hash,
}

impl MerkleTree {
    pub fn build(transaction_ids: Vec<Hash>) -> Self {
        let root = merkle_root(&transaction_ids);
        Self {
            leaves: transaction_ids,
            root,
        }
    }

    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Audit path for the transaction at `index`.
    pub fn generate_proof(&self, index: usize) -> EntryResult<MerkleProof> {
        if index >= self.leaves.len() {
            return Err(EntryError::LeafIndex {
                index,
                count: self.leaves.len(),
            });
        }
        Ok(MerkleProof {
            transaction_id: self.leaves[index],
            index,
            root: self.root,
            path: audit_path(index, &self.leaves),
        })
    }

    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        Self::verify_proof_static(&proof.transaction_id, &proof.path, &self.root)
    }

    /// Recompute the root from a transaction ID and its audit path.
    pub fn verify_proof_static(transaction_id: &Hash, path: &[ProofNode], root: &Hash) -> bool {
        let mut current = leaf_hash(transaction_id);
        for node in path {
            current = match node.position {
                SiblingPosition::Left => interior_hash(&node.hash, &current),
                SiblingPosition::Right => interior_hash(&current, &node.hash),
            };
        }
        current == *root
    }
}

// Siblings are ordered leaf to root.
fn audit_path(index: usize, leaves: &[Hash]) -> Vec<ProofNode> {
    if leaves.len() <= 1 {
        return Vec::new();
    }
    let k = split_point(leaves.len());
    if index < k {
        let mut path = audit_path(index, &leaves[..k]);
        path.push(ProofNode {
            hash: merkle_root(&leaves[k..]),
            position: SiblingPosition::Right,
        });
        path
    } else {
        let mut path = audit_path(index - k, &leaves[k..]);
        path.push(ProofNode {
            hash: merkle_root(&leaves[..k]),
            position: SiblingPosition::Left,
        });
        path
    }
}

/// Proof that a transaction is included under a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub transaction_id: Hash,
    pub index: usize,
    pub root: Hash,
    pub path: Vec<ProofNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    pub hash: Hash,
    pub position: SiblingPosition,
}

/// Side of the sibling relative to the running hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingPosition {
    Left,
    Right,
}
