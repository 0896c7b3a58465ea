//! Line search algorithms for conjugate gradient step lengths.
//!
//! Given a parameter tensor x, its gradient g and a search direction d, a
//! line search picks a step length α along the ray x + α d. The objective is
//! only reachable through the caller's evaluation closure, so every trial
//! step is realised by writing the trial point into the live parameter,
//! invoking the closure (which recomputes the loss and all gradients), and
//! reading the loss and the new gradient back.
//!
//! # Conditions
//!
//! With φ(α) = f(x + α d) and φ'(α) = ∇f(x + α d) · d:
//!
//! - **Armijo (sufficient decrease)**: φ(α) ≤ φ(0) + c₁ α φ'(0)
//! - **Wolfe (curvature)**: φ'(α) ≥ c₂ φ'(0)
//! - **Strong Wolfe (curvature)**: |φ'(α)| ≤ c₂ |φ'(0)|
//!
//! where 0 < c₁ < c₂ < 1.
//!
//! # Contract
//!
//! Every search leaves the parameter exactly as it found it: the value is
//! copied back element-wise (never reallocated) and the parameter's gradient
//! slot is restored, whether the search succeeds, exhausts its budget or
//! propagates a closure error. The caller applies the returned step itself.
//!
//! A search that exhausts `max_steps` trial evaluations does not fail: it
//! reports `success = false` together with the last step length it would
//! have tried, which is always non-negative.

use crate::{
    error::{OptimizerError, OptimizerResult},
    parameter::Parameter,
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

/// Evaluation closure: recomputes the loss and populates gradients.
pub type Closure<'a, T> = dyn FnMut() -> OptimizerResult<T> + 'a;

/// Result of a line search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSearchResult<T: Scalar> {
    /// The step length α to apply along the search direction
    pub step_size: T,

    /// Loss at the accepted trial point, if one was accepted
    pub new_value: Option<T>,

    /// Total number of closure evaluations performed
    pub function_evals: usize,

    /// True if the step length satisfies the search's acceptance conditions
    pub success: bool,
}

/// Interface for line search algorithms.
///
/// Implementations find a step length α ≥ 0 for the ray
/// `parameter + α × direction`, using `closure` to evaluate trial points and
/// `gradient` as the gradient at the starting point.
pub trait LineSearch<T: Scalar>: Debug {
    /// Performs the line search.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `closure`. Returns `MissingGradient`
    /// if a curvature condition is needed and the closure leaves the
    /// parameter without a gradient, and `DimensionMismatch` if `gradient` or
    /// `direction` do not match the parameter.
    fn search(
        &mut self,
        closure: &mut Closure<'_, T>,
        parameter: &Parameter<T>,
        gradient: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>>;

    /// Returns a human-readable name identifying the line search algorithm.
    fn name(&self) -> &str;
}

/// Saved starting point of a search, used to place trial points and to
/// restore the parameter afterwards.
struct TrialPoint<'p, T: Scalar> {
    parameter: &'p Parameter<T>,
    origin: DVector<T>,
    saved_grad: Option<DVector<T>>,
    evals: usize,
}

impl<'p, T: Scalar> TrialPoint<'p, T> {
    fn new(
        parameter: &'p Parameter<T>,
        gradient: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<Self> {
        let origin = parameter.value();
        if gradient.len() != origin.len() {
            return Err(OptimizerError::dimension_mismatch(origin.len(), gradient.len()));
        }
        if direction.len() != origin.len() {
            return Err(OptimizerError::dimension_mismatch(origin.len(), direction.len()));
        }
        Ok(Self {
            parameter,
            saved_grad: parameter.grad(),
            origin,
            evals: 0,
        })
    }

    /// Loss at the starting point.
    fn value_at_origin(&mut self, closure: &mut Closure<'_, T>) -> OptimizerResult<T> {
        self.parameter.copy_from(&self.origin)?;
        self.evals += 1;
        closure()
    }

    /// Loss at `origin + alpha * direction`.
    fn value_at(
        &mut self,
        closure: &mut Closure<'_, T>,
        direction: &DVector<T>,
        alpha: T,
    ) -> OptimizerResult<T> {
        self.parameter.copy_from(&self.origin)?;
        self.parameter.add_scaled(alpha, direction)?;
        self.evals += 1;
        closure()
    }

    /// Loss and directional derivative at `origin + alpha * direction`.
    fn value_and_slope_at(
        &mut self,
        closure: &mut Closure<'_, T>,
        direction: &DVector<T>,
        alpha: T,
    ) -> OptimizerResult<(T, T)> {
        let value = self.value_at(closure, direction, alpha)?;
        let grad = self
            .parameter
            .grad()
            .ok_or(OptimizerError::MissingGradient {
                parameter: self.parameter.id().index(),
            })?;
        Ok((value, grad.dot(direction)))
    }

    fn restore(self) -> OptimizerResult<usize> {
        self.parameter.copy_from(&self.origin)?;
        self.parameter.replace_grad(self.saved_grad);
        Ok(self.evals)
    }
}

/// Runs `body` against a fresh trial point and restores the parameter
/// afterwards, also when `body` fails.
fn with_trial_point<T, F>(
    parameter: &Parameter<T>,
    gradient: &DVector<T>,
    direction: &DVector<T>,
    body: F,
) -> OptimizerResult<LineSearchResult<T>>
where
    T: Scalar,
    F: FnOnce(&mut TrialPoint<'_, T>) -> OptimizerResult<(T, Option<T>, bool)>,
{
    let mut trial = TrialPoint::new(parameter, gradient, direction)?;
    let outcome = body(&mut trial);
    let function_evals = trial.restore()?;
    let (step_size, new_value, success) = outcome?;
    Ok(LineSearchResult {
        step_size,
        new_value,
        function_evals,
        success,
    })
}

/// Backtracking line search with the Armijo sufficient decrease condition.
///
/// Starting from α = `initial_step`:
/// 1. Evaluate φ(α)
/// 2. Accept if φ(α) ≤ φ(0) + c₁ α φ'(0)
/// 3. Otherwise α ← ρ α and repeat, at most `max_steps` times
///
/// Gradient evaluations are not needed; only losses are compared.
#[derive(Debug, Clone, Copy)]
pub struct ArmijoLineSearch<T: Scalar> {
    /// Initial trial step length α₀ ≥ 0
    pub initial_step: T,
    /// Contraction factor ρ ∈ (0, 1)
    pub rho: T,
    /// Sufficient decrease constant c₁
    pub c1: T,
    /// Maximum number of trial evaluations
    pub max_steps: usize,
}

impl<T: Scalar> ArmijoLineSearch<T> {
    /// Creates a new Armijo backtracking search.
    pub fn new(initial_step: T, rho: T, c1: T, max_steps: usize) -> Self {
        Self {
            initial_step,
            rho,
            c1,
            max_steps,
        }
    }
}

impl<T: Scalar> LineSearch<T> for ArmijoLineSearch<T> {
    fn search(
        &mut self,
        closure: &mut Closure<'_, T>,
        parameter: &Parameter<T>,
        gradient: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>> {
        let params = *self;
        with_trial_point(parameter, gradient, direction, |trial| {
            let f0 = trial.value_at_origin(closure)?;
            let slope = gradient.dot(direction);

            let mut alpha = params.initial_step;
            for _ in 0..params.max_steps {
                let value = trial.value_at(closure, direction, alpha)?;
                if value <= f0 + params.c1 * alpha * slope {
                    return Ok((alpha, Some(value), true));
                }
                alpha *= params.rho;
            }

            log::debug!(
                "Armijo search exhausted {} steps on parameter {}, returning step {}",
                params.max_steps,
                parameter.id(),
                alpha
            );
            Ok((alpha, None, false))
        })
    }

    fn name(&self) -> &str {
        "Armijo"
    }
}

/// Line search for the weak Wolfe conditions by bracketing.
///
/// Keeps a bracket [lo, hi] (hi initially +∞) around acceptable steps:
/// - if the Armijo condition fails, the step is too long: hi ← α
/// - if the curvature condition φ'(α) ≥ c₂ φ'(0) fails, the step is too
///   short: lo ← α
///
/// The next trial is the bracket midpoint once hi is finite, otherwise the
/// current step expanded by η.
///
/// `iteration` is the index of the outer conjugate gradient iteration this
/// search belongs to; it is reported in trace output.
#[derive(Debug, Clone, Copy)]
pub struct WolfeLineSearch<T: Scalar> {
    /// Initial trial step length α₀ ≥ 0
    pub initial_step: T,
    /// Sufficient decrease constant c₁
    pub c1: T,
    /// Curvature constant c₂ ∈ (c₁, 1)
    pub c2: T,
    /// Expansion factor η > 1
    pub eta: T,
    /// Outer iteration index
    pub iteration: usize,
    /// Maximum number of trial evaluations
    pub max_steps: usize,
}

impl<T: Scalar> WolfeLineSearch<T> {
    /// Creates a new Wolfe search.
    pub fn new(initial_step: T, c1: T, c2: T, eta: T, iteration: usize, max_steps: usize) -> Self {
        Self {
            initial_step,
            c1,
            c2,
            eta,
            iteration,
            max_steps,
        }
    }
}

impl<T: Scalar> LineSearch<T> for WolfeLineSearch<T> {
    fn search(
        &mut self,
        closure: &mut Closure<'_, T>,
        parameter: &Parameter<T>,
        gradient: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>> {
        let params = *self;
        with_trial_point(parameter, gradient, direction, |trial| {
            let f0 = trial.value_at_origin(closure)?;
            let slope = gradient.dot(direction);
            let two = <T as Scalar>::from_f64(2.0);

            let mut lo = T::zero();
            let mut hi = <T as Float>::infinity();
            let mut alpha = params.initial_step;

            for _ in 0..params.max_steps {
                let (value, new_slope) = trial.value_and_slope_at(closure, direction, alpha)?;
                log::trace!(
                    "Wolfe iteration {} on {}: alpha = {}, f = {}, slope = {}",
                    params.iteration,
                    parameter.id(),
                    alpha,
                    value,
                    new_slope
                );

                if value > f0 + params.c1 * alpha * slope {
                    hi = alpha;
                    alpha = (lo + hi) / two;
                } else if new_slope < params.c2 * slope {
                    lo = alpha;
                    alpha = if <T as Float>::is_finite(hi) {
                        (lo + hi) / two
                    } else {
                        params.eta * alpha
                    };
                } else {
                    return Ok((alpha, Some(value), true));
                }
            }

            log::debug!(
                "Wolfe search exhausted {} steps on parameter {} (iteration {}), returning step {}",
                params.max_steps,
                parameter.id(),
                params.iteration,
                alpha
            );
            Ok((alpha, None, false))
        })
    }

    fn name(&self) -> &str {
        "Wolfe"
    }
}

/// Line search for the strong Wolfe conditions.
///
/// Follows the bracketing/zoom scheme: trial steps grow (doubling, capped at
/// `amax`) until a step violates sufficient decrease, fails to decrease
/// relative to the previous trial, or reaches a non-negative slope; the
/// bracket found is then refined by bisection. Both phases share the
/// `max_steps` evaluation budget.
///
/// When the budget runs out during the zoom, the best step found so far that
/// satisfies sufficient decrease is returned (possibly zero).
#[derive(Debug, Clone, Copy)]
pub struct StrongWolfeLineSearch<T: Scalar> {
    /// Initial trial step length α₀ ≥ 0, clipped to `amax`
    pub initial_step: T,
    /// Sufficient decrease constant c₁
    pub c1: T,
    /// Curvature constant c₂ ∈ (c₁, 1)
    pub c2: T,
    /// Maximum trial step length
    pub amax: T,
    /// Maximum number of trial evaluations
    pub max_steps: usize,
}

/// Bracket end point: step, loss and slope.
#[derive(Debug, Clone, Copy)]
struct Sample<T> {
    alpha: T,
    value: T,
    slope: T,
}

impl<T: Scalar> StrongWolfeLineSearch<T> {
    /// Creates a new strong Wolfe search.
    pub fn new(initial_step: T, c1: T, c2: T, amax: T, max_steps: usize) -> Self {
        Self {
            initial_step,
            c1,
            c2,
            amax,
            max_steps,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn zoom(
        &self,
        trial: &mut TrialPoint<'_, T>,
        closure: &mut Closure<'_, T>,
        direction: &DVector<T>,
        f0: T,
        slope0: T,
        mut lo: Sample<T>,
        mut hi: T,
    ) -> OptimizerResult<(T, Option<T>, bool)> {
        let two = <T as Scalar>::from_f64(2.0);

        while trial.evals <= self.max_steps {
            let alpha = (lo.alpha + hi) / two;
            let (value, slope) = trial.value_and_slope_at(closure, direction, alpha)?;

            if value > f0 + self.c1 * alpha * slope0 || value >= lo.value {
                hi = alpha;
            } else {
                if <T as Float>::abs(slope) <= -self.c2 * slope0 {
                    return Ok((alpha, Some(value), true));
                }
                if slope * (hi - lo.alpha) >= T::zero() {
                    hi = lo.alpha;
                }
                lo = Sample { alpha, value, slope };
            }
        }

        Ok((lo.alpha, None, false))
    }
}

impl<T: Scalar> LineSearch<T> for StrongWolfeLineSearch<T> {
    fn search(
        &mut self,
        closure: &mut Closure<'_, T>,
        parameter: &Parameter<T>,
        gradient: &DVector<T>,
        direction: &DVector<T>,
    ) -> OptimizerResult<LineSearchResult<T>> {
        let this = *self;
        with_trial_point(parameter, gradient, direction, |trial| {
            let f0 = trial.value_at_origin(closure)?;
            let slope0 = gradient.dot(direction);
            let two = <T as Scalar>::from_f64(2.0);

            let mut previous = Sample {
                alpha: T::zero(),
                value: f0,
                slope: slope0,
            };
            let mut alpha = <T as Float>::min(this.initial_step, this.amax);
            let mut first = true;

            // The origin evaluation is not part of the trial budget.
            while trial.evals <= this.max_steps {
                let (value, slope) = trial.value_and_slope_at(closure, direction, alpha)?;

                if value > f0 + this.c1 * alpha * slope0 || (!first && value >= previous.value) {
                    return this.zoom(trial, closure, direction, f0, slope0, previous, alpha);
                }
                if <T as Float>::abs(slope) <= -this.c2 * slope0 {
                    return Ok((alpha, Some(value), true));
                }
                let current = Sample { alpha, value, slope };
                if slope >= T::zero() {
                    return this.zoom(trial, closure, direction, f0, slope0, current, previous.alpha);
                }
                if alpha >= this.amax {
                    log::debug!(
                        "Strong Wolfe search on parameter {} reached amax = {}",
                        parameter.id(),
                        this.amax
                    );
                    return Ok((alpha, Some(value), false));
                }

                previous = current;
                alpha = <T as Float>::min(two * alpha, this.amax);
                first = false;
            }

            log::debug!(
                "Strong Wolfe search exhausted {} steps on parameter {}, returning step {}",
                this.max_steps,
                parameter.id(),
                previous.alpha
            );
            Ok((previous.alpha, None, false))
        })
    }

    fn name(&self) -> &str {
        "StrongWolfe"
    }
}
