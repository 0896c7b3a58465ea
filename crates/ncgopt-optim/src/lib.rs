//! Fletcher-Reeves nonlinear conjugate gradient optimization.
//!
//! This crate provides the optimizer built on the parameter, line search and
//! curvature primitives of `ncgopt-core`. Parameters are shared handles: the
//! optimizer updates their values in place and the caller's evaluation
//! closure writes their gradients.
//!
//! # Examples
//!
//! ```rust
//! use ncgopt_core::prelude::*;
//! use ncgopt_optim::{FletcherReeves, FletcherReevesConfig, LineSearchKind};
//!
//! let objective = QuadraticObjective::<f64>::diagonal(&[1.0, 10.0]);
//! let x = Parameter::from_slice(&[1.0, 1.0]);
//!
//! let config = FletcherReevesConfig::new()
//!     .with_line_search(LineSearchKind::StrongWolfe)
//!     .with_eps(1e-6);
//! let mut optimizer = FletcherReeves::new(vec![x.clone()], config)?;
//!
//! let loss = optimizer.step_with_closure(objective.closure(&x))?;
//! assert!(loss > 0.0);
//! # Ok::<(), OptimizerError>(())
//! ```

pub mod fletcher_reeves;

// Re-export main optimizer for convenience
pub use fletcher_reeves::{
    FletcherReeves, FletcherReevesConfig, FletcherReevesStateDict, LineSearchKind, ParameterState,
};
