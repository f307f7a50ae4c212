pub mod bits;
pub mod errors;
pub mod node;
pub mod snapshot;
pub mod tree;

pub use bits::*;
pub use errors::*;
pub use node::{interior_hash, leaf_hash, Node, NodeKind};
pub use snapshot::*;
pub use tree::*;
