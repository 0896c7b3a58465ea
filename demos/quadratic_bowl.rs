//! Example: minimizing a quadratic bowl with every step length policy
//!
//! Minimizes f(x, y) = x² + 2y² from (3, 3), with x and y held in separate
//! parameter tensors, and then a coupled two-dimensional quadratic with the
//! exact step.
//!
//! Run with: cargo run --example quadratic_bowl

use ncgopt::prelude::*;

fn bowl(x: &Parameter<f64>, y: &Parameter<f64>) -> OptimizerResult<f64> {
    let (xv, yv) = (x.value()[0], y.value()[0]);
    x.set_grad(DVector::from_element(1, 2.0 * xv))?;
    y.set_grad(DVector::from_element(1, 4.0 * yv))?;
    Ok(xv * xv + 2.0 * yv * yv)
}

fn run_bowl(kind: LineSearchKind) -> OptimizerResult<()> {
    let x = Parameter::scalar(3.0);
    let y = Parameter::scalar(3.0);
    let config = FletcherReevesConfig::new().with_line_search(kind);
    let mut optimizer = FletcherReeves::new(vec![x.clone(), y.clone()], config)?;

    let mut loss = bowl(&x, &y)?;
    let mut steps = 0;
    while steps < 50 && (x.value()[0].abs() >= 0.1 || y.value()[0].abs() >= 0.1) {
        loss = optimizer.step_with_closure(|| bowl(&x, &y))?;
        steps += 1;
    }

    println!(
        "{:<13} steps = {:>2}  loss = {:>10.6}  point = ({:.4}, {:.4})",
        kind.to_string(),
        steps,
        loss,
        x.value()[0],
        y.value()[0]
    );
    Ok(())
}

fn run_exact() -> OptimizerResult<()> {
    let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
    let b = DVector::from_vec(vec![-1.0, 2.0]);
    let objective = QuadraticObjective::new(a, b, 0.0)?;
    let p = Parameter::from_slice(&[2.0, 1.0]);

    let mut optimizer = FletcherReeves::with_curvature_oracle(
        vec![p.clone()],
        FletcherReevesConfig::exact().with_eps(1e-8),
        Box::new(objective.clone()),
    )?;
    for warning in optimizer.warnings() {
        println!("warning: {}", warning);
    }

    for step in 1..=10 {
        let loss = optimizer.step_with_closure(objective.closure(&p))?;
        let state = optimizer.state(&p);
        println!(
            "exact step {:>2}: loss = {:.8}, beta = {:?}",
            step,
            loss,
            state.and_then(|s| s.beta)
        );
    }

    if let Some(minimizer) = objective.minimizer() {
        println!(
            "distance to minimizer: {:.3e}",
            (p.value() - minimizer).norm()
        );
    }
    Ok(())
}

fn main() -> OptimizerResult<()> {
    println!("Fletcher-Reeves on f(x, y) = x² + 2y² from (3, 3)");
    println!("==================================================");
    for kind in [LineSearchKind::Armijo, LineSearchKind::Wolfe, LineSearchKind::StrongWolfe] {
        run_bowl(kind)?;
    }

    println!();
    println!("Exact step on a coupled quadratic");
    println!("=================================");
    run_exact()
}
