//! Error types for conjugate gradient optimization.
//!
//! Construction-time validation failures, collaborator failures (closure,
//! curvature oracle, line search) and tensor shape mismatches all surface
//! through [`OptimizerError`]. Non-fatal configuration notices are modelled
//! separately by [`ConfigurationWarning`].

use std::fmt;
use thiserror::Error;

/// Errors that can occur while configuring or running an optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when the optimizer is configured with a value outside
    /// its documented range (e.g., `c1 >= 0.5`, `rho <= 0`).
    #[error("Invalid optimizer configuration: {reason} ({parameter} = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Dimension mismatch between tensors.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// The evaluation closure or a curvature oracle reported a failure.
    #[error("Objective evaluation failed: {reason}")]
    Evaluation {
        /// Description reported by the collaborator
        reason: String,
    },

    /// A parameter had no gradient where one was required.
    #[error("Parameter {parameter} has no gradient after evaluation")]
    MissingGradient {
        /// Identifier of the parameter
        parameter: usize,
    },

    /// A step length policy that re-evaluates the objective was used without a closure.
    #[error("Line search '{line_search}' requires an evaluation closure")]
    MissingClosure {
        /// Name of the line search that needed the closure
        line_search: String,
    },

    /// A loaded state dictionary does not match the optimizer layout.
    #[error("Invalid optimizer state: {reason}")]
    InvalidState {
        /// Description of the mismatch
        reason: String,
    },
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: fmt::Display,
        S2: fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an Evaluation error with a custom reason.
    pub fn evaluation<S: Into<String>>(reason: S) -> Self {
        Self::Evaluation {
            reason: reason.into(),
        }
    }

    /// Create an InvalidState error.
    pub fn invalid_state<S: Into<String>>(reason: S) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }
}

/// Non-fatal configuration notices surfaced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationWarning {
    /// The exact step length policy is only correct for quadratic objectives,
    /// which cannot be checked.
    ExactStepRequiresQuadratic,
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactStepRequiresQuadratic => {
                write!(f, "Unless the loss is a quadratic function, the exact step is not correct")
            }
        }
    }
}

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
