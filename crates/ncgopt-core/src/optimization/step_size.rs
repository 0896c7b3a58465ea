//! Exact step length for quadratic objectives.
//!
//! For f(x) = ½ xᵀAx + bᵀx + c the minimizer of f(x + α d) along a direction
//! d has the closed form α = (-d·g) / (dᵀ A d). The operator A is not known to
//! the optimizer; it is assembled row by row from Hessian-vector products.

use crate::{
    error::{OptimizerError, OptimizerResult},
    objective::CurvatureOracle,
    parameter::Parameter,
    types::{DMatrix, DVector, Scalar},
};

/// Assembles the curvature operator of `parameter` as a dense matrix.
///
/// Row `i` is the oracle's Hessian-vector product with the `i`-th unit
/// vector, so an `n`-element parameter costs `n` oracle calls.
///
/// # Errors
///
/// Propagates oracle errors, and returns `DimensionMismatch` if a product
/// does not have the parameter's length.
pub fn assemble_curvature_operator<T: Scalar>(
    oracle: &mut dyn CurvatureOracle<T>,
    parameter: &Parameter<T>,
) -> OptimizerResult<DMatrix<T>> {
    let n = parameter.len();
    let mut operator = DMatrix::zeros(n, n);
    let mut unit = DVector::zeros(n);

    for i in 0..n {
        unit[i] = T::one();
        let row = oracle.hessian_vector_product(parameter, &unit)?;
        unit[i] = T::zero();

        if row.len() != n {
            return Err(OptimizerError::dimension_mismatch(n, row.len()));
        }
        operator.row_mut(i).tr_copy_from(&row);
    }

    Ok(operator)
}

/// Exact minimizing step α = (-d·g) / (d·(A d)).
///
/// The denominator is not guarded: a direction of zero curvature yields a
/// non-finite step.
pub fn exact_quadratic_step<T: Scalar>(
    operator: &DMatrix<T>,
    gradient: &DVector<T>,
    direction: &DVector<T>,
) -> OptimizerResult<T> {
    let n = direction.len();
    if operator.nrows() != n || operator.ncols() != n {
        return Err(OptimizerError::dimension_mismatch(
            format!("({0}, {0})", n),
            format!("({}, {})", operator.nrows(), operator.ncols()),
        ));
    }
    if gradient.len() != n {
        return Err(OptimizerError::dimension_mismatch(n, gradient.len()));
    }

    let curvature = direction.dot(&(operator * direction));
    Ok(-direction.dot(gradient) / curvature)
}
