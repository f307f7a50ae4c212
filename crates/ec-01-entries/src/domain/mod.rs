//! # Domain Layer
//!
//! Pure entry-graph logic. No I/O.

pub mod block;
pub mod entries;
pub mod entry_id;
pub mod errors;
pub mod merkle;
pub mod program;
pub mod tx;
pub mod value_objects;

pub use block::*;
pub use entries::*;
pub use entry_id::*;
pub use errors::*;
pub use merkle::*;
pub use tx::*;
pub use value_objects::*;
