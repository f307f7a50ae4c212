//! # Domain Layer
//!
//! The legacy wire model and its mapping to entries.

pub mod block;
pub mod errors;
pub mod map;
pub mod tx_data;
pub mod tx_input;
pub mod tx_output;
pub mod value_objects;

pub use block::*;
pub use errors::*;
pub use map::*;
pub use tx_data::*;
pub use tx_input::*;
pub use tx_output::*;
pub use value_objects::*;
