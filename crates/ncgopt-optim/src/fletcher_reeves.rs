//! Fletcher-Reeves nonlinear conjugate gradient optimizer.
//!
//! The optimizer updates a set of externally owned parameter tensors in
//! place, one independent conjugate gradient recurrence per tensor. Gradients
//! are produced by a caller-supplied evaluation closure; the optimizer never
//! differentiates anything itself.
//!
//! # Algorithm Overview
//!
//! For every parameter with a defined gradient g, each step:
//! 1. Updates the per-parameter state. On the first visit the direction is
//!    d = -g. Afterwards β = ‖g‖ / ‖g_prev‖ and d = -g + β d.
//! 2. Stops the whole step as soon as a parameter has ‖g‖ < eps.
//! 3. Picks a step length α with the configured policy.
//! 4. Applies x ← x + α d in place.
//!
//! Note that β is the ratio of gradient norms, not of squared norms.
//!
//! # Step length policies
//!
//! - **None**: exact minimizer along d for quadratic objectives, using a
//!   curvature operator assembled from a [`CurvatureOracle`]
//! - **Armijo**: backtracking with sufficient decrease
//! - **Wolfe**: bracketing for the weak Wolfe conditions
//! - **StrongWolfe**: bracketing and zoom for the strong Wolfe conditions
//!
//! # Example
//!
//! ```
//! use ncgopt_core::prelude::*;
//! use ncgopt_optim::{FletcherReeves, FletcherReevesConfig};
//!
//! let objective = QuadraticObjective::<f64>::diagonal(&[2.0]);
//! let x = Parameter::from_slice(&[3.0]);
//!
//! let mut optimizer = FletcherReeves::new(vec![x.clone()], FletcherReevesConfig::default())?;
//! for _ in 0..50 {
//!     optimizer.step_with_closure(objective.closure(&x))?;
//! }
//! assert!(x.value()[0].abs() < 0.1);
//! # Ok::<(), OptimizerError>(())
//! ```

use ncgopt_core::{
    error::{ConfigurationWarning, OptimizerError, OptimizerResult},
    line_search::{ArmijoLineSearch, Closure, LineSearch, StrongWolfeLineSearch, WolfeLineSearch},
    objective::CurvatureOracle,
    param_group::{ParamGroup, StateStore},
    parameter::{ParamId, Parameter},
    step_size::{assemble_curvature_operator, exact_quadratic_step},
    types::{DMatrix, DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::str::FromStr;

/// Step length policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineSearchKind {
    /// Exact step for quadratic objectives
    None,
    /// Armijo backtracking
    #[default]
    Armijo,
    /// Weak Wolfe conditions
    Wolfe,
    /// Strong Wolfe conditions
    #[cfg_attr(feature = "serde", serde(rename = "Strong_Wolfe"))]
    StrongWolfe,
}

impl LineSearchKind {
    /// Returns true if the policy re-evaluates the objective.
    pub fn needs_closure(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for LineSearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::None => "None",
            Self::Armijo => "Armijo",
            Self::Wolfe => "Wolfe",
            Self::StrongWolfe => "Strong_Wolfe",
        };
        f.write_str(tag)
    }
}

impl FromStr for LineSearchKind {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "armijo" => Ok(Self::Armijo),
            "wolfe" => Ok(Self::Wolfe),
            "strong_wolfe" | "strongwolfe" => Ok(Self::StrongWolfe),
            _ => Err(OptimizerError::invalid_configuration(
                "expected one of None, Armijo, Wolfe, Strong_Wolfe",
                "line_search",
                s,
            )),
        }
    }
}

/// Configuration for the Fletcher-Reeves optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))
)]
pub struct FletcherReevesConfig<T: Scalar> {
    /// Gradient-norm stopping threshold, > 0
    pub eps: T,
    /// Step length policy
    pub line_search: LineSearchKind,
    /// Sufficient decrease constant, in (0, 0.5)
    pub c1: T,
    /// Curvature constant, in (c1, 1)
    pub c2: T,
    /// Initial trial step length, >= 0
    pub lr: T,
    /// Backtracking contraction factor, in (0, 1)
    pub rho: T,
    /// Wolfe expansion factor, > 1
    pub eta: T,
    /// Strong Wolfe maximum step length, > 0
    pub amax: T,
    /// Maximum number of trial evaluations per line search, > 0
    pub max_line_search_steps: usize,
}

impl<T: Scalar> Default for FletcherReevesConfig<T> {
    fn default() -> Self {
        Self {
            eps: T::DEFAULT_GRADIENT_TOLERANCE,
            line_search: LineSearchKind::Armijo,
            c1: <T as Scalar>::from_f64(1e-4),
            c2: <T as Scalar>::from_f64(0.4),
            lr: T::one(),
            rho: <T as Scalar>::from_f64(0.5),
            eta: <T as Scalar>::from_f64(5.0),
            amax: <T as Scalar>::from_f64(0.6),
            max_line_search_steps: 10,
        }
    }
}

impl<T: Scalar> FletcherReevesConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gradient-norm stopping threshold.
    pub fn with_eps(mut self, eps: T) -> Self {
        self.eps = eps;
        self
    }

    /// Sets the step length policy.
    pub fn with_line_search(mut self, kind: LineSearchKind) -> Self {
        self.line_search = kind;
        self
    }

    /// Sets the sufficient decrease constant.
    pub fn with_c1(mut self, c1: T) -> Self {
        self.c1 = c1;
        self
    }

    /// Sets the curvature constant.
    pub fn with_c2(mut self, c2: T) -> Self {
        self.c2 = c2;
        self
    }

    /// Sets the initial trial step length.
    pub fn with_lr(mut self, lr: T) -> Self {
        self.lr = lr;
        self
    }

    /// Sets the backtracking contraction factor.
    pub fn with_rho(mut self, rho: T) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the Wolfe expansion factor.
    pub fn with_eta(mut self, eta: T) -> Self {
        self.eta = eta;
        self
    }

    /// Sets the strong Wolfe maximum step length.
    pub fn with_amax(mut self, amax: T) -> Self {
        self.amax = amax;
        self
    }

    /// Sets the per-search evaluation budget.
    pub fn with_max_line_search_steps(mut self, steps: usize) -> Self {
        self.max_line_search_steps = steps;
        self
    }

    /// Creates a configuration using the exact quadratic step.
    pub fn exact() -> Self {
        Self::new().with_line_search(LineSearchKind::None)
    }

    /// Checks every field against its documented range.
    ///
    /// Comparisons are written so that NaN fails every check.
    pub fn validate(&self) -> OptimizerResult<()> {
        let zero = T::zero();
        let one = T::one();
        let half = <T as Scalar>::from_f64(0.5);

        if !(self.eps > zero) {
            return Err(invalid("eps must be positive", "eps", self.eps));
        }
        if !(self.c1 > zero && self.c1 < half) {
            return Err(invalid("c1 must be in (0, 0.5)", "c1", self.c1));
        }
        if !(self.c2 > self.c1 && self.c2 < one) {
            return Err(invalid("c2 must be in (c1, 1)", "c2", self.c2));
        }
        if !(self.lr >= zero) {
            return Err(invalid("lr must be non-negative", "lr", self.lr));
        }
        if !(self.rho > zero && self.rho < one) {
            return Err(invalid("rho must be in (0, 1)", "rho", self.rho));
        }
        if !(self.eta > one) {
            return Err(invalid("eta must be greater than 1", "eta", self.eta));
        }
        if !(self.amax > zero) {
            return Err(invalid("amax must be positive", "amax", self.amax));
        }
        if self.max_line_search_steps == 0 {
            return Err(invalid(
                "max_line_search_steps must be positive",
                "max_line_search_steps",
                self.max_line_search_steps,
            ));
        }
        Ok(())
    }
}

fn invalid(reason: &str, parameter: &str, value: impl fmt::Display) -> OptimizerError {
    OptimizerError::invalid_configuration(reason, parameter, value.to_string())
}

/// Conjugate gradient state of one parameter tensor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))
)]
pub struct ParameterState<T: Scalar> {
    /// Gradient observed at the most recent step
    pub gradient: DVector<T>,

    /// Current search direction
    pub direction: DVector<T>,

    /// True only during the step that created this state
    pub is_first_iteration: bool,

    /// Index passed to the Wolfe line search
    pub iteration_count: usize,

    /// Cached curvature operator for the exact step
    pub curvature: Option<DMatrix<T>>,

    /// Last Fletcher-Reeves coefficient
    pub beta: Option<T>,
}

impl<T: Scalar> ParameterState<T> {
    fn initial(gradient: &DVector<T>, converged: bool) -> Self {
        let direction = if converged {
            DVector::zeros(gradient.len())
        } else {
            -gradient
        };
        Self {
            gradient: gradient.clone(),
            direction,
            is_first_iteration: true,
            iteration_count: 0,
            curvature: None,
            beta: None,
        }
    }

    fn check_len(&self, len: usize) -> OptimizerResult<()> {
        if self.gradient.len() != len {
            return Err(OptimizerError::dimension_mismatch(len, self.gradient.len()));
        }
        if self.direction.len() != len {
            return Err(OptimizerError::dimension_mismatch(len, self.direction.len()));
        }
        if let Some(curvature) = &self.curvature {
            if curvature.nrows() != len || curvature.ncols() != len {
                return Err(OptimizerError::dimension_mismatch(
                    format!("({0}, {0})", len),
                    format!("({}, {})", curvature.nrows(), curvature.ncols()),
                ));
            }
        }
        Ok(())
    }
}

/// Serializable snapshot of the optimizer.
///
/// `states` is indexed by parameter position, walking the groups in order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))
)]
pub struct FletcherReevesStateDict<T: Scalar> {
    /// Configuration of each group
    pub groups: Vec<FletcherReevesConfig<T>>,
    /// State of each parameter, if one has been created
    pub states: Vec<Option<ParameterState<T>>>,
}

enum Transition {
    Converged,
    Advanced,
}

/// Fletcher-Reeves conjugate gradient optimizer.
pub struct FletcherReeves<T: Scalar> {
    param_groups: Vec<ParamGroup<T, FletcherReevesConfig<T>>>,
    state: StateStore<ParameterState<T>>,
    curvature_oracle: Option<Box<dyn CurvatureOracle<T>>>,
    warnings: Vec<ConfigurationWarning>,
}

impl<T: Scalar> Debug for FletcherReeves<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FletcherReeves")
            .field("param_groups", &self.param_groups)
            .field("state", &self.state)
            .field("has_curvature_oracle", &self.curvature_oracle.is_some())
            .field("warnings", &self.warnings)
            .finish()
    }
}

impl<T: Scalar> FletcherReeves<T> {
    /// Creates an optimizer over `params`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` is out of range, if the
    /// exact step is requested (it needs a curvature oracle, see
    /// [`FletcherReeves::with_curvature_oracle`]) or if a parameter is listed
    /// twice.
    pub fn new(params: Vec<Parameter<T>>, config: FletcherReevesConfig<T>) -> OptimizerResult<Self> {
        let mut optimizer = Self {
            param_groups: Vec::new(),
            state: StateStore::new(),
            curvature_oracle: None,
            warnings: Vec::new(),
        };
        optimizer.add_param_group(params, config)?;
        Ok(optimizer)
    }

    /// Creates an optimizer with a curvature oracle for the exact step.
    pub fn with_curvature_oracle(
        params: Vec<Parameter<T>>,
        config: FletcherReevesConfig<T>,
        oracle: Box<dyn CurvatureOracle<T>>,
    ) -> OptimizerResult<Self> {
        let mut optimizer = Self {
            param_groups: Vec::new(),
            state: StateStore::new(),
            curvature_oracle: Some(oracle),
            warnings: Vec::new(),
        };
        optimizer.add_param_group(params, config)?;
        Ok(optimizer)
    }

    /// Adds a group of parameters with its own configuration.
    ///
    /// Validation is all-or-nothing: on error the optimizer is unchanged.
    pub fn add_param_group(
        &mut self,
        params: Vec<Parameter<T>>,
        config: FletcherReevesConfig<T>,
    ) -> OptimizerResult<()> {
        self.check_config(&config)?;

        let mut seen: HashSet<ParamId> = self.all_params().map(|p| p.id()).collect();
        for param in &params {
            if !seen.insert(param.id()) {
                return Err(OptimizerError::invalid_configuration(
                    "parameter appears more than once",
                    "params",
                    param.id().to_string(),
                ));
            }
        }

        if config.line_search == LineSearchKind::None {
            let warning = ConfigurationWarning::ExactStepRequiresQuadratic;
            log::warn!("{}", warning);
            self.warnings.push(warning);
        }
        self.param_groups.push(ParamGroup::new(params, config));
        Ok(())
    }

    fn check_config(&self, config: &FletcherReevesConfig<T>) -> OptimizerResult<()> {
        config.validate()?;
        if config.line_search == LineSearchKind::None && self.curvature_oracle.is_none() {
            return Err(OptimizerError::invalid_configuration(
                "the exact step requires a curvature oracle",
                "line_search",
                config.line_search.to_string(),
            ));
        }
        Ok(())
    }

    fn all_params(&self) -> impl Iterator<Item = &Parameter<T>> {
        self.param_groups.iter().flat_map(|group| group.params().iter())
    }

    /// The parameter groups, in insertion order.
    pub fn param_groups(&self) -> &[ParamGroup<T, FletcherReevesConfig<T>>] {
        &self.param_groups
    }

    /// Configuration notices raised at construction.
    pub fn warnings(&self) -> &[ConfigurationWarning] {
        &self.warnings
    }

    /// Fills the gradient of every optimized parameter with zeros.
    pub fn zero_grad(&self) {
        for group in &self.param_groups {
            group.zero_grad();
        }
    }

    /// Returns the state of `param`, if one has been created.
    pub fn state(&self, param: &Parameter<T>) -> Option<&ParameterState<T>> {
        self.state.get(param.id())
    }

    /// Overwrites the state of `param`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if `param` is not optimized here, and
    /// `DimensionMismatch` if the state does not fit the parameter.
    pub fn set_state(&mut self, param: &Parameter<T>, state: ParameterState<T>) -> OptimizerResult<()> {
        if !self.all_params().any(|p| p.id() == param.id()) {
            return Err(OptimizerError::invalid_state(format!(
                "parameter {} is not optimized by this optimizer",
                param.id()
            )));
        }
        state.check_len(param.len())?;
        self.state.insert(param.id(), state);
        Ok(())
    }

    /// Captures configurations and states by parameter position.
    pub fn state_dict(&self) -> FletcherReevesStateDict<T> {
        FletcherReevesStateDict {
            groups: self.param_groups.iter().map(|g| *g.config()).collect(),
            states: self
                .all_params()
                .map(|p| self.state.get(p.id()).cloned())
                .collect(),
        }
    }

    /// Restores configurations and states captured by [`FletcherReeves::state_dict`].
    ///
    /// The dictionary must match the group and parameter layout. Validation is
    /// all-or-nothing: on error the optimizer is unchanged.
    pub fn load_state_dict(&mut self, dict: FletcherReevesStateDict<T>) -> OptimizerResult<()> {
        if dict.groups.len() != self.param_groups.len() {
            return Err(OptimizerError::invalid_state(format!(
                "expected {} groups, got {}",
                self.param_groups.len(),
                dict.groups.len()
            )));
        }
        let params: Vec<Parameter<T>> = self.all_params().cloned().collect();
        if dict.states.len() != params.len() {
            return Err(OptimizerError::invalid_state(format!(
                "expected {} parameter states, got {}",
                params.len(),
                dict.states.len()
            )));
        }
        for config in &dict.groups {
            self.check_config(config)?;
        }
        for (param, state) in params.iter().zip(&dict.states) {
            if let Some(state) = state {
                state.check_len(param.len())?;
            }
        }

        let groups = std::mem::take(&mut self.param_groups);
        self.param_groups = groups
            .into_iter()
            .zip(dict.groups)
            .map(|(group, config)| ParamGroup::new(group.into_params(), config))
            .collect();
        self.warnings = self
            .param_groups
            .iter()
            .filter(|g| g.config().line_search == LineSearchKind::None)
            .map(|_| ConfigurationWarning::ExactStepRequiresQuadratic)
            .collect();

        self.state.clear();
        for (param, state) in params.iter().zip(dict.states) {
            if let Some(state) = state {
                self.state.insert(param.id(), state);
            }
        }
        Ok(())
    }

    /// Performs one step using the gradients already stored in the parameters.
    ///
    /// Only the exact step can run without an evaluation closure.
    ///
    /// # Errors
    ///
    /// Returns `MissingClosure` if any group uses a line search.
    pub fn step(&mut self) -> OptimizerResult<()> {
        self.step_internal(None).map(|_| ())
    }

    /// Performs one step, calling `closure` to recompute the loss and the
    /// gradients first. Returns the loss reported by that first call.
    ///
    /// Every parameter after the first one that moved is processed with
    /// gradients from a fresh call at the current point. Once the step ends
    /// the gradients are reset to the ones from the first call.
    pub fn step_with_closure<F>(&mut self, mut closure: F) -> OptimizerResult<T>
    where
        F: FnMut() -> OptimizerResult<T>,
    {
        let closure: &mut Closure<'_, T> = &mut closure;
        let loss = self.step_internal(Some(closure))?;
        loss.ok_or_else(|| OptimizerError::evaluation("closure produced no loss"))
    }

    fn step_internal(&mut self, mut closure: Option<&mut Closure<'_, T>>) -> OptimizerResult<Option<T>> {
        if closure.is_none() {
            if let Some(group) = self
                .param_groups
                .iter()
                .find(|g| g.config().line_search.needs_closure())
            {
                return Err(OptimizerError::MissingClosure {
                    line_search: group.config().line_search.to_string(),
                });
            }
        }

        let loss = match closure.as_deref_mut() {
            Some(evaluate) => Some(evaluate()?),
            None => None,
        };

        let params: Vec<(Parameter<T>, FletcherReevesConfig<T>)> = self
            .param_groups
            .iter()
            .flat_map(|g| g.params().iter().map(move |p| (p.clone(), *g.config())))
            .collect();
        let snapshot: Vec<Option<DVector<T>>> = params.iter().map(|(p, _)| p.grad()).collect();

        let outcome = self.update_parameters(&params, closure);

        for ((param, _), grad) in params.iter().zip(snapshot) {
            param.replace_grad(grad);
        }
        outcome?;
        Ok(loss)
    }

    fn update_parameters(
        &mut self,
        params: &[(Parameter<T>, FletcherReevesConfig<T>)],
        mut closure: Option<&mut Closure<'_, T>>,
    ) -> OptimizerResult<()> {
        let mut stale = false;
        for (param, config) in params {
            // Earlier updates and line-search trials left the gradients at
            // some other point; re-evaluate at the current one.
            if stale {
                if let Some(evaluate) = closure.as_deref_mut() {
                    evaluate()?;
                }
                stale = false;
            }
            let Some(grad) = param.grad() else {
                continue;
            };

            if let Transition::Converged = self.advance_state(param, &grad, config)? {
                log::debug!(
                    "Gradient norm of parameter {} below eps = {}, ending step",
                    param.id(),
                    config.eps
                );
                return Ok(());
            }

            let state = self
                .state
                .get_mut(param.id())
                .ok_or_else(|| OptimizerError::invalid_state("missing parameter state"))?;
            let alpha = Self::step_length(
                state,
                self.curvature_oracle.as_mut(),
                closure.as_deref_mut(),
                param,
                &grad,
                config,
            )?;

            log::trace!(
                "Parameter {}: beta = {:?}, alpha = {}",
                param.id(),
                state.beta,
                alpha
            );
            param.add_scaled(alpha, &state.direction)?;
            stale = true;
        }
        Ok(())
    }

    fn advance_state(
        &mut self,
        param: &Parameter<T>,
        grad: &DVector<T>,
        config: &FletcherReevesConfig<T>,
    ) -> OptimizerResult<Transition> {
        let grad_norm = grad.norm();
        let converged = grad_norm < config.eps;

        match self.state.get_mut(param.id()) {
            None => {
                self.state
                    .insert(param.id(), ParameterState::initial(grad, converged));
            }
            Some(state) => {
                state.check_len(grad.len())?;
                let beta = grad_norm / state.gradient.norm();
                state.gradient.copy_from(grad);
                state.beta = Some(beta);
                if !converged {
                    state.direction = -grad + &state.direction * beta;
                    state.is_first_iteration = false;
                }
            }
        }

        Ok(if converged {
            Transition::Converged
        } else {
            Transition::Advanced
        })
    }

    fn step_length(
        state: &mut ParameterState<T>,
        oracle: Option<&mut Box<dyn CurvatureOracle<T>>>,
        closure: Option<&mut Closure<'_, T>>,
        param: &Parameter<T>,
        grad: &DVector<T>,
        config: &FletcherReevesConfig<T>,
    ) -> OptimizerResult<T> {
        let kind = config.line_search;
        let steps = config.max_line_search_steps;
        let missing_closure = || OptimizerError::MissingClosure {
            line_search: kind.to_string(),
        };

        let result = match kind {
            LineSearchKind::None => {
                let oracle = oracle.ok_or_else(|| {
                    OptimizerError::invalid_configuration(
                        "the exact step requires a curvature oracle",
                        "line_search",
                        kind.to_string(),
                    )
                })?;
                return Self::exact_step(state, &mut **oracle, param, grad);
            }
            LineSearchKind::Armijo => {
                let closure = closure.ok_or_else(missing_closure)?;
                ArmijoLineSearch::new(config.lr, config.rho, config.c1, steps).search(
                    closure,
                    param,
                    &state.gradient,
                    &state.direction,
                )?
            }
            LineSearchKind::Wolfe => {
                let closure = closure.ok_or_else(missing_closure)?;
                let result = WolfeLineSearch::new(
                    config.lr,
                    config.c1,
                    config.c2,
                    config.eta,
                    state.iteration_count,
                    steps,
                )
                .search(closure, param, grad, &state.direction)?;
                state.iteration_count += 1;
                result
            }
            LineSearchKind::StrongWolfe => {
                let closure = closure.ok_or_else(missing_closure)?;
                StrongWolfeLineSearch::new(config.lr, config.c1, config.c2, config.amax, steps)
                    .search(closure, param, grad, &state.direction)?
            }
        };
        Ok(result.step_size)
    }

    /// Exact quadratic step; the curvature operator is rebuilt on the first
    /// iteration of a state and reused afterwards.
    fn exact_step(
        state: &mut ParameterState<T>,
        oracle: &mut dyn CurvatureOracle<T>,
        param: &Parameter<T>,
        grad: &DVector<T>,
    ) -> OptimizerResult<T> {
        let operator = match state.curvature.take() {
            Some(operator) if !state.is_first_iteration => operator,
            _ => assemble_curvature_operator(oracle, param)?,
        };
        let alpha = exact_quadratic_step(&operator, grad, &state.direction)?;
        state.curvature = Some(operator);
        Ok(alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncgopt_core::objective::QuadraticObjective;

    #[test]
    fn test_default_config_is_valid() {
        let config = FletcherReevesConfig::<f64>::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.line_search, LineSearchKind::Armijo);
        assert_eq!(config.eps, 1e-3);
        assert_eq!(config.max_line_search_steps, 10);
    }

    #[test]
    fn test_line_search_kind_tags() {
        assert_eq!("None".parse::<LineSearchKind>().unwrap(), LineSearchKind::None);
        assert_eq!("armijo".parse::<LineSearchKind>().unwrap(), LineSearchKind::Armijo);
        assert_eq!("WOLFE".parse::<LineSearchKind>().unwrap(), LineSearchKind::Wolfe);
        assert_eq!(
            "Strong_Wolfe".parse::<LineSearchKind>().unwrap(),
            LineSearchKind::StrongWolfe
        );
        assert_eq!(
            "StrongWolfe".parse::<LineSearchKind>().unwrap(),
            LineSearchKind::StrongWolfe
        );
        assert!("Backtracking".parse::<LineSearchKind>().is_err());

        for kind in [
            LineSearchKind::None,
            LineSearchKind::Armijo,
            LineSearchKind::Wolfe,
            LineSearchKind::StrongWolfe,
        ] {
            assert_eq!(kind.to_string().parse::<LineSearchKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_nan_fails_validation() {
        let config = FletcherReevesConfig::<f64>::default().with_c1(f64::NAN);
        assert!(config.validate().is_err());
        let config = FletcherReevesConfig::<f64>::default().with_eps(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_exact_step_needs_oracle() {
        let p = Parameter::<f64>::scalar(1.0);
        let err = FletcherReeves::new(vec![p.clone()], FletcherReevesConfig::exact()).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));

        let oracle = Box::new(QuadraticObjective::<f64>::simple(1));
        let optimizer =
            FletcherReeves::with_curvature_oracle(vec![p], FletcherReevesConfig::exact(), oracle)
                .unwrap();
        assert_eq!(
            optimizer.warnings(),
            &[ConfigurationWarning::ExactStepRequiresQuadratic]
        );
    }

    #[test]
    fn test_duplicate_parameters_rejected() {
        let p = Parameter::<f64>::scalar(1.0);
        let err = FletcherReeves::new(vec![p.clone(), p.clone()], FletcherReevesConfig::default())
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));

        let mut optimizer = FletcherReeves::new(vec![p.clone()], FletcherReevesConfig::default()).unwrap();
        assert!(optimizer
            .add_param_group(vec![p], FletcherReevesConfig::default())
            .is_err());
        assert_eq!(optimizer.param_groups().len(), 1);
    }

    #[test]
    fn test_step_without_closure_under_line_search() {
        let p = Parameter::<f64>::scalar(1.0);
        p.set_grad(DVector::from_element(1, 1.0)).unwrap();
        let mut optimizer = FletcherReeves::new(vec![p.clone()], FletcherReevesConfig::default()).unwrap();

        let err = optimizer.step().unwrap_err();
        assert_eq!(
            err,
            OptimizerError::MissingClosure {
                line_search: "Armijo".to_string()
            }
        );
        assert_eq!(p.get(0), Some(1.0));
        assert!(optimizer.state(&p).is_none());
    }

    #[test]
    fn test_first_direction_is_negative_gradient() {
        let q = QuadraticObjective::<f64>::diagonal(&[2.0, 4.0]);
        let p = Parameter::from_slice(&[3.0, 3.0]);
        let mut optimizer = FletcherReeves::new(vec![p.clone()], FletcherReevesConfig::default()).unwrap();

        optimizer.step_with_closure(q.closure(&p)).unwrap();

        let state = optimizer.state(&p).unwrap();
        assert_eq!(state.direction, DVector::from_vec(vec![-6.0, -12.0]));
        assert_eq!(state.gradient, DVector::from_vec(vec![6.0, 12.0]));
        assert!(state.is_first_iteration);
        assert_eq!(state.beta, None);
    }
}
