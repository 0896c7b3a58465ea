//! Objectives and second-order oracles.
//!
//! The optimizer consumes two capabilities from the outside world: an
//! evaluation closure that recomputes the loss and writes gradients into the
//! parameters, and (for the exact quadratic step only) a [`CurvatureOracle`]
//! producing Hessian-vector products. Both are injected, so nothing here
//! depends on a global differentiation context.
//!
//! [`QuadraticObjective`] provides both capabilities in closed form and is the
//! reference problem for tests and demos.

use crate::{
    error::{OptimizerError, OptimizerResult},
    parameter::Parameter,
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use std::fmt::{self, Debug};

/// Source of Hessian-vector products for a parameter tensor.
///
/// Implementations return `H v`, where `H` is the Hessian of the objective
/// with respect to `parameter` at its current value.
pub trait CurvatureOracle<T: Scalar> {
    /// Computes the product of the Hessian at `parameter` with `vector`.
    ///
    /// # Errors
    ///
    /// Implementations report failures as `OptimizerError::Evaluation` or
    /// `OptimizerError::DimensionMismatch`; the optimizer propagates them
    /// unchanged.
    fn hessian_vector_product(
        &mut self,
        parameter: &Parameter<T>,
        vector: &DVector<T>,
    ) -> OptimizerResult<DVector<T>>;
}

impl<T, F> CurvatureOracle<T> for F
where
    T: Scalar,
    F: FnMut(&Parameter<T>, &DVector<T>) -> OptimizerResult<DVector<T>>,
{
    fn hessian_vector_product(
        &mut self,
        parameter: &Parameter<T>,
        vector: &DVector<T>,
    ) -> OptimizerResult<DVector<T>> {
        self(parameter, vector)
    }
}

/// Quadratic objective f(x) = 0.5 * x^T * A * x + b^T * x + c.
#[derive(Debug, Clone)]
pub struct QuadraticObjective<T: Scalar> {
    /// The quadratic form matrix (should be symmetric)
    pub a: DMatrix<T>,
    /// The linear term
    pub b: DVector<T>,
    /// The constant term
    pub c: T,
}

impl<T: Scalar> QuadraticObjective<T> {
    /// Creates a new quadratic objective.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `a` is not square or `b` does not match it.
    pub fn new(a: DMatrix<T>, b: DVector<T>, c: T) -> OptimizerResult<Self> {
        if !a.is_square() {
            return Err(OptimizerError::dimension_mismatch(
                format!("square matrix ({0}, {0})", a.nrows()),
                format!("({}, {})", a.nrows(), a.ncols()),
            ));
        }
        if b.len() != a.nrows() {
            return Err(OptimizerError::dimension_mismatch(a.nrows(), b.len()));
        }
        Ok(Self { a, b, c })
    }

    /// Creates a simple quadratic with identity matrix: f(x) = 0.5 * ||x||^2
    pub fn simple(dim: usize) -> Self {
        Self {
            a: DMatrix::identity(dim, dim),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }

    /// Creates f(x) = 0.5 * sum_i d_i * x_i^2.
    pub fn diagonal(diag: &[T]) -> Self {
        let d = DVector::from_column_slice(diag);
        Self {
            a: DMatrix::from_diagonal(&d),
            b: DVector::zeros(diag.len()),
            c: T::zero(),
        }
    }

    /// Dimension of the domain.
    pub fn dim(&self) -> usize {
        self.b.len()
    }

    fn check_dim(&self, len: usize) -> OptimizerResult<()> {
        if len != self.dim() {
            return Err(OptimizerError::dimension_mismatch(self.dim(), len));
        }
        Ok(())
    }

    /// Evaluates the objective at `x`.
    pub fn cost(&self, x: &DVector<T>) -> OptimizerResult<T> {
        self.check_dim(x.len())?;
        let ax = &self.a * x;
        Ok(x.dot(&ax) * <T as Scalar>::from_f64(0.5) + self.b.dot(x) + self.c)
    }

    /// Evaluates the gradient A x + b.
    pub fn gradient(&self, x: &DVector<T>) -> OptimizerResult<DVector<T>> {
        self.check_dim(x.len())?;
        Ok(&self.a * x + &self.b)
    }

    /// Evaluates the objective and its gradient at `x`.
    pub fn cost_and_gradient(&self, x: &DVector<T>) -> OptimizerResult<(T, DVector<T>)> {
        self.check_dim(x.len())?;
        let ax = &self.a * x;
        let cost = x.dot(&ax) * <T as Scalar>::from_f64(0.5) + self.b.dot(x) + self.c;
        Ok((cost, ax + &self.b))
    }

    /// Evaluates the objective at the current value of `parameter` and writes
    /// the gradient into it. This is the body of a typical closure.
    pub fn evaluate(&self, parameter: &Parameter<T>) -> OptimizerResult<T> {
        let (cost, gradient) = parameter.with_value(|x| self.cost_and_gradient(x))?;
        parameter.set_grad(gradient)?;
        Ok(cost)
    }

    /// Returns an evaluation closure over `parameter`.
    pub fn closure<'a>(
        &'a self,
        parameter: &'a Parameter<T>,
    ) -> impl FnMut() -> OptimizerResult<T> + 'a {
        move || self.evaluate(parameter)
    }

    /// The unique minimizer -A^{-1} b, when A is invertible.
    pub fn minimizer(&self) -> Option<DVector<T>> {
        self.a.clone().lu().solve(&(-&self.b))
    }
}

impl<T: Scalar> CurvatureOracle<T> for QuadraticObjective<T> {
    fn hessian_vector_product(
        &mut self,
        parameter: &Parameter<T>,
        vector: &DVector<T>,
    ) -> OptimizerResult<DVector<T>> {
        self.check_dim(parameter.len())?;
        self.check_dim(vector.len())?;
        Ok(&self.a * vector)
    }
}

/// Hessian-vector products by forward differences of a gradient map.
///
/// Computes `(grad(x + t v) - grad(x)) / t` with `t = sqrt(eps) / ||v||`.
pub struct FiniteDifferenceCurvature<F> {
    gradient: F,
}

impl<F> FiniteDifferenceCurvature<F> {
    /// Wraps a gradient map `x -> grad f(x)`.
    pub fn new(gradient: F) -> Self {
        Self { gradient }
    }
}

impl<F> Debug for FiniteDifferenceCurvature<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteDifferenceCurvature").finish_non_exhaustive()
    }
}

impl<T, F> CurvatureOracle<T> for FiniteDifferenceCurvature<F>
where
    T: Scalar,
    F: FnMut(&DVector<T>) -> OptimizerResult<DVector<T>>,
{
    fn hessian_vector_product(
        &mut self,
        parameter: &Parameter<T>,
        vector: &DVector<T>,
    ) -> OptimizerResult<DVector<T>> {
        let point = parameter.value();
        if point.len() != vector.len() {
            return Err(OptimizerError::dimension_mismatch(point.len(), vector.len()));
        }

        let norm = vector.norm();
        if norm < T::EPSILON {
            return Ok(DVector::zeros(point.len()));
        }

        let t = <T as Float>::sqrt(T::EPSILON) / norm;
        let perturbed = &point + vector * t;

        let grad1 = (self.gradient)(&point)?;
        let grad2 = (self.gradient)(&perturbed)?;

        Ok((grad2 - grad1) / t)
    }
}
