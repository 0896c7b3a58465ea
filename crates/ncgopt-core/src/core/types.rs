//! Type definitions and aliases for conjugate gradient optimization.
//!
//! This module provides the scalar trait shared by every component, the
//! and the vector/matrix aliases used as tensor storage.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in optimization (f32 or f64).
///
/// This trait combines all the numeric traits required by the line searches,
/// the exact quadratic step and the Fletcher-Reeves recurrence.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default gradient-norm stopping threshold.
    const DEFAULT_GRADIENT_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_GRADIENT_TOLERANCE: Self = 1e-3;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_GRADIENT_TOLERANCE: Self = 1e-3;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
///
/// Parameter tensors are stored flattened in this type; shape bookkeeping
/// belongs to the caller.
pub type DVector<T> = OVector<T, Dyn>;
