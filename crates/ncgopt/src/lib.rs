//! # ncgopt
//!
//! Fletcher-Reeves nonlinear conjugate gradient for externally owned
//! parameter tensors.
//!
//! The optimizer keeps one conjugate gradient recurrence per parameter
//! tensor, takes gradients from a caller-supplied evaluation closure and
//! updates the parameters in place. Step lengths come from one of four
//! policies: the exact step for quadratic objectives, Armijo backtracking,
//! or a Wolfe / strong Wolfe line search.
//!
//! ## Quick Start
//!
//! ```rust
//! use ncgopt::prelude::*;
//!
//! # fn main() -> OptimizerResult<()> {
//! // f(x, y) = x² + 2y² with x and y held in separate tensors
//! let x = Parameter::scalar(3.0_f64);
//! let y = Parameter::scalar(3.0_f64);
//! let mut optimizer = FletcherReeves::new(vec![x.clone(), y.clone()], FletcherReevesConfig::default())?;
//!
//! for _ in 0..50 {
//!     optimizer.step_with_closure(|| {
//!         let (xv, yv) = (x.value()[0], y.value()[0]);
//!         x.set_grad(DVector::from_element(1, 2.0 * xv))?;
//!         y.set_grad(DVector::from_element(1, 4.0 * yv))?;
//!         Ok(xv * xv + 2.0 * yv * yv)
//!     })?;
//! }
//!
//! assert!(x.value()[0].abs() < 0.1 && y.value()[0].abs() < 0.1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - `ncgopt-core`: parameters, objectives, curvature oracles, line searches
//! - `ncgopt-optim`: the Fletcher-Reeves optimizer and its configuration

pub use nalgebra;
pub use ncgopt_core;
pub use ncgopt_optim;

pub use ncgopt_core::{ConfigurationWarning, OptimizerError, OptimizerResult};
pub use ncgopt_optim::{
    FletcherReeves, FletcherReevesConfig, FletcherReevesStateDict, LineSearchKind, ParameterState,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use ncgopt_core::prelude::*;
    pub use ncgopt_optim::{
        FletcherReeves, FletcherReevesConfig, FletcherReevesStateDict, LineSearchKind,
        ParameterState,
    };
}
