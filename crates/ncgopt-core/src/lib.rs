//! Core traits and types for nonlinear conjugate gradient optimization.
//!
//! This crate provides the building blocks the Fletcher-Reeves optimizer in
//! `ncgopt-optim` is assembled from: shared parameter tensors with gradient
//! slots, injected objectives and curvature oracles, line searches and the
//! exact quadratic step, and per-parameter state bookkeeping.
//!
//! # Modules
//!
//! - [`error`]: Error types and configuration warnings
//! - [`line_search`]: Armijo, Wolfe and strong Wolfe line searches
//! - [`objective`]: Curvature oracles and the quadratic reference objective
//! - [`param_group`]: Parameter groups and state storage
//! - [`parameter`]: Shared parameter tensors
//! - [`step_size`]: Exact step length for quadratics
//! - [`types`]: Scalar trait and type aliases

pub mod core;
pub mod optimization;

pub use crate::core::{error, objective, parameter, types};
pub use crate::optimization::{line_search, param_group, step_size};

// Re-export commonly used items at the crate root
pub use crate::core::error::{ConfigurationWarning, OptimizerError, OptimizerResult};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use ncgopt_core::prelude::*;
///
/// let p = Parameter::<f64>::from_slice(&[1.0, 2.0]);
/// assert_eq!(p.len(), 2);
/// ```
pub mod prelude {
    pub use crate::error::{ConfigurationWarning, OptimizerError, OptimizerResult};
    pub use crate::line_search::{
        ArmijoLineSearch, Closure, LineSearch, LineSearchResult, StrongWolfeLineSearch,
        WolfeLineSearch,
    };
    pub use crate::objective::{CurvatureOracle, FiniteDifferenceCurvature, QuadraticObjective};
    pub use crate::param_group::{ParamGroup, StateStore};
    pub use crate::parameter::{ParamId, Parameter};
    pub use crate::step_size::{assemble_curvature_operator, exact_quadratic_step};
    pub use crate::types::{DMatrix, DVector, Scalar};
}
