//! Step length policies and optimizer bookkeeping.

pub mod line_search;
pub mod param_group;
pub mod step_size;

// Re-export optimization components
pub use line_search::*;
pub use param_group::*;
pub use step_size::*;
