pub mod output_set;

pub use output_set::*;
