pub mod block_validation;
pub mod config;
pub mod errors;
pub mod tx_validation;
pub mod vm_context;

pub use block_validation::*;
pub use config::*;
pub use errors::*;
pub use tx_validation::*;
pub use vm_context::*;
