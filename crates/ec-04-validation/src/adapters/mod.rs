pub mod basic_vm;

pub use basic_vm::*;
