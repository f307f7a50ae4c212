//! # Patricia Tree
//!
//! Persistent binary radix tree over fixed-length keys.
//!
//! Every mutation builds new nodes along the touched path only and shares
//! the remaining subtrees with the previous version, so cloning a `Tree`
//! is O(1) and old clones stay valid.
//!
//! ## Invariants
//!
//! - No key is a strict prefix of another key.
//! - Interior nodes have exactly two children.
//! - An empty tree has the zero root hash.

use std::sync::Arc;

use shared_types::Hash;
use tracing::trace;

use super::bits::BitKey;
use super::errors::{PatriciaError, PatriciaResult};
use super::node::{Node, NodeKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    root: Option<Arc<Node>>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root commitment, or the zero hash when empty.
    pub fn root_hash(&self) -> Hash {
        self.root.as_ref().map_or(Hash::ZERO, |n| n.hash)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert or replace the value stored under `key`.
    ///
    /// On `PatriciaError::Prefix` the tree is left unmodified.
    pub fn insert(&mut self, key: &[u8], value: Hash) -> PatriciaResult<()> {
        let bits = BitKey::from_bytes(key);
        let root = match &self.root {
            None => Node::leaf(bits, value),
            Some(root) => insert(root, &bits, value)?,
        };
        self.root = Some(root);
        Ok(())
    }

    /// Remove `key`. Returns whether it was present.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        let bits = BitKey::from_bytes(key);
        match delete(root, &bits) {
            Removal::Unchanged => false,
            Removal::Replaced(node) => {
                self.root = node;
                true
            }
        }
    }

    /// Value stored under `key`, if any.
    pub fn lookup(&self, key: &[u8]) -> Option<Hash> {
        let bits = BitKey::from_bytes(key);
        let mut node = self.root.as_ref()?;
        loop {
            if !bits.starts_with(&node.key) {
                return None;
            }
            match &node.kind {
                NodeKind::Leaf { value } => {
                    return (node.key == bits).then_some(*value);
                }
                NodeKind::Interior { children } => {
                    if bits.len() == node.key.len() {
                        return None;
                    }
                    node = &children[bits.at(node.key.len())];
                }
            }
        }
    }

    pub fn contains(&self, key: &[u8], value: &Hash) -> bool {
        self.lookup(key).as_ref() == Some(value)
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        fn count(node: &Node) -> usize {
            match &node.kind {
                NodeKind::Leaf { .. } => 1,
                NodeKind::Interior { children } => count(&children[0]) + count(&children[1]),
            }
        }
        self.root.as_deref().map_or(0, count)
    }
}

fn insert(node: &Arc<Node>, key: &BitKey, value: Hash) -> PatriciaResult<Arc<Node>> {
    if node.key == *key {
        if node.is_leaf() {
            return Ok(Node::leaf(key.clone(), value));
        }
        return Err(PatriciaError::Prefix { bits: key.len() });
    }

    if key.starts_with(&node.key) {
        let NodeKind::Interior { children } = &node.kind else {
            return Err(PatriciaError::Prefix { bits: key.len() });
        };
        let bit = key.at(node.key.len());
        let child = insert(&children[bit], key, value)?;
        return Ok(node.with_child(bit, child));
    }

    if node.key.starts_with(key) {
        return Err(PatriciaError::Prefix { bits: key.len() });
    }

    let common = node.key.common_prefix_len(key);
    let leaf = Node::leaf(key.clone(), value);
    let children = if key.at(common) == 0 {
        [leaf, Arc::clone(node)]
    } else {
        [Arc::clone(node), leaf]
    };
    trace!("[ec-03] split at bit {}", common);
    Ok(Node::interior(key.prefix(common), children))
}

enum Removal {
    Unchanged,
    /// New subtree in place of the old one; `None` when it became empty.
    Replaced(Option<Arc<Node>>),
}

fn delete(node: &Arc<Node>, key: &BitKey) -> Removal {
    match &node.kind {
        NodeKind::Leaf { .. } => {
            if node.key == *key {
                Removal::Replaced(None)
            } else {
                Removal::Unchanged
            }
        }
        NodeKind::Interior { children } => {
            if !key.starts_with(&node.key) || key.len() == node.key.len() {
                return Removal::Unchanged;
            }
            let bit = key.at(node.key.len());
            match delete(&children[bit], key) {
                Removal::Unchanged => Removal::Unchanged,
                // Collapse: the sibling takes the parent's place.
                Removal::Replaced(None) => Removal::Replaced(Some(Arc::clone(&children[1 - bit]))),
                Removal::Replaced(Some(child)) => {
                    Removal::Replaced(Some(node.with_child(bit, child)))
                }
            }
        }
    }
}
