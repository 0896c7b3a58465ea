//! Core traits and types for conjugate gradient optimization.

pub mod error;
pub mod objective;
pub mod parameter;
pub mod types;

// Re-export core types
pub use error::*;
pub use objective::*;
pub use parameter::*;
pub use types::*;
