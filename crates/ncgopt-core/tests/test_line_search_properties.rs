//! Property tests for the line searches.
//!
//! Every search is run on random convex diagonal quadratics along the
//! steepest descent direction, and the accepted step is checked against the
//! conditions the search claims to enforce.

use ncgopt_core::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const C1: f64 = 1e-4;
const C2: f64 = 0.4;

fn problem() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..5).prop_flat_map(|n| {
        (
            prop::collection::vec(0.5f64..10.0, n),
            prop::collection::vec(-5.0f64..5.0, n),
        )
    })
}

fn setup(diag: &[f64], x0: &[f64]) -> (QuadraticObjective<f64>, Parameter<f64>, DVector<f64>) {
    let q = QuadraticObjective::diagonal(diag);
    let p = Parameter::from_slice(x0);
    let g = q.gradient(&p.value()).unwrap();
    (q, p, g)
}

proptest! {
    #[test]
    fn armijo_step_decreases_sufficiently((diag, x0) in problem()) {
        let (q, p, g) = setup(&diag, &x0);
        prop_assume!(g.norm() > 1e-6);
        let d = -&g;
        let x = p.value();
        let mut closure = q.closure(&p);

        let mut ls = ArmijoLineSearch::new(1.0, 0.5, C1, 30);
        let result = ls.search(&mut closure, &p, &g, &d).unwrap();

        prop_assert!(result.success);
        prop_assert!(result.step_size > 0.0);
        let f0 = q.cost(&x).unwrap();
        let f1 = q.cost(&(&x + &d * result.step_size)).unwrap();
        prop_assert!(f1 <= f0 + C1 * result.step_size * g.dot(&d));
        prop_assert_eq!(p.value(), x);
    }

    #[test]
    fn wolfe_step_satisfies_both_conditions((diag, x0) in problem()) {
        let (q, p, g) = setup(&diag, &x0);
        prop_assume!(g.norm() > 1e-6);
        let d = -&g;
        let x = p.value();
        let mut closure = q.closure(&p);

        let mut ls = WolfeLineSearch::new(1.0, C1, C2, 5.0, 0, 30);
        let result = ls.search(&mut closure, &p, &g, &d).unwrap();

        prop_assert!(result.step_size >= 0.0);
        if result.success {
            let x1 = &x + &d * result.step_size;
            let slope0 = g.dot(&d);
            prop_assert!(q.cost(&x1).unwrap() <= q.cost(&x).unwrap() + C1 * result.step_size * slope0);
            prop_assert!(q.gradient(&x1).unwrap().dot(&d) >= C2 * slope0);
        }
        prop_assert_eq!(p.value(), x);
    }

    #[test]
    fn strong_wolfe_step_is_bounded((diag, x0) in problem()) {
        let (q, p, g) = setup(&diag, &x0);
        prop_assume!(g.norm() > 1e-6);
        let d = -&g;
        let x = p.value();
        let mut closure = q.closure(&p);

        let mut ls = StrongWolfeLineSearch::new(1.0, C1, C2, 0.6, 10);
        let result = ls.search(&mut closure, &p, &g, &d).unwrap();

        prop_assert!(result.step_size >= 0.0);
        prop_assert!(result.step_size <= 0.6);
        if result.success {
            let x1 = &x + &d * result.step_size;
            let slope0 = g.dot(&d);
            prop_assert!(q.cost(&x1).unwrap() <= q.cost(&x).unwrap() + C1 * result.step_size * slope0);
            prop_assert!(q.gradient(&x1).unwrap().dot(&d).abs() <= C2 * slope0.abs());
        }
        prop_assert_eq!(p.value(), x);
    }
}

#[test]
fn test_searches_count_evaluations() {
    let (q, p, g) = setup(&[1.0], &[2.0]);
    let d = -&g;

    let mut calls = 0usize;
    let mut closure = || {
        calls += 1;
        q.evaluate(&p)
    };

    let mut ls = ArmijoLineSearch::new(1.0, 0.5, C1, 10);
    let result = ls.search(&mut closure, &p, &g, &d).unwrap();
    drop(closure);

    // f = x²/2, unit step lands on the minimizer
    assert!(result.success);
    assert_eq!(result.step_size, 1.0);
    assert_eq!(result.function_evals, calls);
    assert_eq!(calls, 2);
}

#[test]
fn test_missing_gradient_is_reported() {
    let p = Parameter::<f64>::from_slice(&[1.0]);
    let g = DVector::from_vec(vec![1.0]);
    let d = -&g;
    let probe = p.clone();
    // loss without gradient: curvature conditions cannot be checked
    let mut closure = || -> OptimizerResult<f64> {
        probe.clear_grad();
        Ok(probe.value()[0] * probe.value()[0])
    };

    let mut ls = WolfeLineSearch::new(1.0, C1, C2, 5.0, 0, 10);
    let err = ls.search(&mut closure, &p, &g, &d).unwrap_err();
    assert_eq!(err, OptimizerError::MissingGradient { parameter: p.id().index() });
}
