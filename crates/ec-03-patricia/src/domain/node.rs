use std::sync::Arc;

use shared_types::{Hash, Sha3Hasher};

use super::bits::BitKey;

/// Domain prefix for leaf hashes.
pub const LEAF_PREFIX: u8 = 0x00;
/// Domain prefix for interior hashes.
pub const INTERIOR_PREFIX: u8 = 0x01;

// =============================================================================
// TREE NODE
// =============================================================================

/// A node of the patricia tree.
///
/// Keys are absolute: every node stores the full bit path from the root,
/// not the suffix below its parent. Interior nodes always have exactly two
/// children, so the tree stays maximally compressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub key: BitKey,
    pub hash: Hash,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { value: Hash },
    Interior { children: [Arc<Node>; 2] },
}

impl Node {
    pub fn leaf(key: BitKey, value: Hash) -> Arc<Self> {
        Arc::new(Self {
            key,
            hash: leaf_hash(&value),
            kind: NodeKind::Leaf { value },
        })
    }

    pub fn interior(key: BitKey, children: [Arc<Node>; 2]) -> Arc<Self> {
        Arc::new(Self {
            key,
            hash: interior_hash(&children[0].hash, &children[1].hash),
            kind: NodeKind::Interior { children },
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Copy of this interior node with one child replaced.
    ///
    /// The other child is shared, not copied.
    pub(crate) fn with_child(&self, bit: usize, child: Arc<Node>) -> Arc<Self> {
        match &self.kind {
            NodeKind::Interior { children } => {
                let mut children = children.clone();
                children[bit] = child;
                Node::interior(self.key.clone(), children)
            }
            // Callers only descend through interior nodes.
            NodeKind::Leaf { .. } => child,
        }
    }
}

pub fn leaf_hash(value: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher.update(&[LEAF_PREFIX]).update(value.as_bytes());
    hasher.finalize()
}

pub fn interior_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher
        .update(&[INTERIOR_PREFIX])
        .update(left.as_bytes())
        .update(right.as_bytes());
    hasher.finalize()
}
