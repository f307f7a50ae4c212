//! # Validation Subsystem (ec-04)
//!
//! Consensus rules over the entry graph.
//!
//! ```text
//!   Block ──validate_block──→ sequencing vs previous block
//!     │                       consensus program (ProgramVerifier)
//!     │                       transactions root
//!     └─ Tx ──validate_tx──→  per-entry rules, memoized by entry ID
//!                             predicates (ProgramVerifier)
//!
//!   ValidationService::validate_and_apply_block
//!     = validate_block + Snapshot::apply_block + assets root check
//! ```
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `domain::tx_validation` | Per-entry checks, balance, wiring |
//! | `domain::block_validation` | Block sequencing and roots |
//! | `domain::vm_context` | What a program can see, `check_output` |
//! | `domain::errors` | `ValidationError` with context chaining |
//! | `ports::vm` | `ProgramVerifier`, the VM boundary |
//! | `adapters::basic_vm` | Verifier for the programs the mapper emits |
//! | `service` | Config + verifier + snapshot threading |
//!
//! Everything is synchronous. Validate independent blocks or transactions
//! on separate threads if needed; each call carries its own state.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::*;
