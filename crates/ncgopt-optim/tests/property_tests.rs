//! Property tests for the Fletcher-Reeves recurrence and configuration ranges.

use ncgopt_core::prelude::*;
use ncgopt_optim::{FletcherReeves, FletcherReevesConfig, LineSearchKind};
use proptest::prelude::*;

fn gradient(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10.0f64..10.0, n)
}

fn exact_optimizer(p: &Parameter<f64>) -> FletcherReeves<f64> {
    FletcherReeves::with_curvature_oracle(
        vec![p.clone()],
        FletcherReevesConfig::exact(),
        Box::new(QuadraticObjective::<f64>::simple(p.len())),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn second_direction_follows_norm_ratio(
        (g1, g2) in (1usize..6).prop_flat_map(|n| (gradient(n), gradient(n)))
    ) {
        let g1 = DVector::from_vec(g1);
        let g2 = DVector::from_vec(g2);
        prop_assume!(g1.norm() > 1e-2 && g2.norm() > 1e-2);

        let p = Parameter::new(DVector::zeros(g1.len()));
        let mut optimizer = exact_optimizer(&p);

        p.set_grad(g1.clone()).unwrap();
        optimizer.step().unwrap();
        let d1 = optimizer.state(&p).unwrap().direction.clone();
        prop_assert_eq!(&d1, &(-&g1));

        p.set_grad(g2.clone()).unwrap();
        optimizer.step().unwrap();
        let expected = -&g2 + &d1 * (g2.norm() / g1.norm());
        prop_assert_eq!(&optimizer.state(&p).unwrap().direction, &expected);
    }

    #[test]
    fn first_step_length_is_non_negative(
        (diag, x0) in (1usize..5).prop_flat_map(|n| (
            prop::collection::vec(0.5f64..10.0, n),
            prop::collection::vec(-5.0f64..5.0, n),
        )),
        kind in prop_oneof![
            Just(LineSearchKind::Armijo),
            Just(LineSearchKind::Wolfe),
            Just(LineSearchKind::StrongWolfe),
        ],
    ) {
        let q = QuadraticObjective::diagonal(&diag);
        let p = Parameter::from_slice(&x0);
        let start = p.value();
        prop_assume!(q.gradient(&start).unwrap().norm() > 1e-2);

        let mut optimizer =
            FletcherReeves::new(vec![p.clone()], FletcherReevesConfig::new().with_line_search(kind)).unwrap();
        optimizer.step_with_closure(q.closure(&p)).unwrap();

        let direction = &optimizer.state(&p).unwrap().direction;
        prop_assert!((p.value() - &start).dot(direction) >= 0.0);
    }

    #[test]
    fn c1_inside_open_interval_is_accepted(c1 in 1e-9f64..0.399) {
        let config = FletcherReevesConfig::<f64>::new().with_c1(c1);
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn c1_outside_open_interval_is_rejected(c1 in prop_oneof![-1.0f64..=0.0, 0.5f64..2.0]) {
        let config = FletcherReevesConfig::<f64>::new().with_c1(c1);
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn c2_must_exceed_c1(c1 in 1e-6f64..0.49, offset in 0.0f64..1.0) {
        let config = FletcherReevesConfig::<f64>::new().with_c1(c1).with_c2(c1 * offset);
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn rho_range(rho in -2.0f64..3.0) {
        let config = FletcherReevesConfig::<f64>::new().with_rho(rho);
        prop_assert_eq!(config.validate().is_ok(), rho > 0.0 && rho < 1.0);
    }
}

fn rejected_field(config: FletcherReevesConfig<f64>) -> String {
    match config.validate() {
        Err(OptimizerError::InvalidConfiguration { parameter, .. }) => parameter,
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn test_validation_boundaries() {
    let base = FletcherReevesConfig::<f64>::new;

    assert_eq!(rejected_field(base().with_eps(0.0)), "eps");
    assert_eq!(rejected_field(base().with_eps(-1e-3)), "eps");
    assert_eq!(rejected_field(base().with_c1(0.0)), "c1");
    assert_eq!(rejected_field(base().with_c1(0.5)), "c1");
    assert_eq!(rejected_field(base().with_c1(0.1).with_c2(0.1)), "c2");
    assert_eq!(rejected_field(base().with_c2(1.0)), "c2");
    assert_eq!(rejected_field(base().with_lr(-1e-9)), "lr");
    assert_eq!(rejected_field(base().with_rho(0.0)), "rho");
    assert_eq!(rejected_field(base().with_rho(1.0)), "rho");
    assert_eq!(rejected_field(base().with_eta(1.0)), "eta");
    assert_eq!(rejected_field(base().with_amax(0.0)), "amax");
    assert_eq!(rejected_field(base().with_max_line_search_steps(0)), "max_line_search_steps");
    assert_eq!(rejected_field(base().with_amax(f64::NAN)), "amax");

    assert!(base().with_lr(0.0).validate().is_ok());
    assert!(base().with_c1(0.49).with_c2(0.999).validate().is_ok());
    assert!(base().with_eta(1.0001).validate().is_ok());
    assert!(base().with_max_line_search_steps(1).validate().is_ok());
}

#[test]
fn test_constructor_validates_before_any_step() {
    let p = Parameter::<f64>::scalar(1.0);
    let err = FletcherReeves::new(vec![p], FletcherReevesConfig::new().with_eta(0.5)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Invalid optimizer configuration: eta must be greater than 1 (eta = 0.5)"
    );
}
