//! End-to-end behaviour of the surface current source: registration protocol,
//! pass consistency and additivity across boundaries.

use std::f64::consts::PI;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use num_complex::Complex64;

use fresnel_core::assembly::{BoundarySample, LinearFormCollector};
use fresnel_core::boundary::{add_lf_contributions, BoundaryCondition, BoundaryError, SurfaceCurrent};
use fresnel_core::field::{
    AxisEntry, EvaluationError, ScalarFunction, SpecificationError, Symbol, VectorFieldSpec,
};
use fresnel_core::physics::PhysicsModel;
use fresnel_core::scaling::Pass;
use fresnel_core::types::Point;

fn physics(freq: f64) -> PhysicsModel {
    let swirl: ScalarFunction = Arc::new(|p: &Point| Complex64::new(-p[1], p[0]));
    PhysicsModel::default()
        .with_symbol("J0", Symbol::Value(Complex64::new(0.5, -1.5)))
        .with_symbol("swirl", Symbol::Function(swirl))
        .with_frequency(freq)
        .unwrap()
}

fn at(attribute: usize, position: Point) -> BoundarySample {
    BoundarySample { attribute, position }
}

#[test]
fn test_unit_current_at_unit_frequency() {
    let model = physics(1.0);
    let bc = SurfaceCurrent::new(vec![1], VectorFieldSpec::new(1.0, 0.0, 0.0), model.environment()).unwrap();
    let mut target = LinearFormCollector::new();

    bc.contribute(&model, &mut target, 0, Pass::Real).unwrap();
    bc.contribute(&model, &mut target, 0, Pass::Imaginary).unwrap();
    assert_eq!(target.len(), 2);

    let samples = [at(1, [0.3, -0.2, 1.0])];
    let re = target.sample(0, Pass::Real, &samples).unwrap();
    let im = target.sample(0, Pass::Imaginary, &samples).unwrap();

    for c in 0..3 {
        assert_abs_diff_eq!(re[[0, c]], 0.0, epsilon = 1e-15);
    }
    assert_abs_diff_eq!(im[[0, 0]], -2.0 * PI, epsilon = 1e-12);
    assert_abs_diff_eq!(im[[0, 1]], 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(im[[0, 2]], 0.0, epsilon = 1e-15);
}

#[test]
fn test_passes_recombine_to_scaled_current() {
    let model = physics(3.0);
    let omega = 2.0 * PI * 3.0;
    let bc = SurfaceCurrent::new(vec![4], VectorFieldSpec::new("swirl", "J0", "x"), model.environment()).unwrap();
    let mut target = LinearFormCollector::new();
    for pass in Pass::BOTH {
        bc.contribute(&model, &mut target, 0, pass).unwrap();
    }

    let p = [0.7, -0.4, 2.0];
    let samples = [at(4, p)];
    let re = target.sample(0, Pass::Real, &samples).unwrap();
    let im = target.sample(0, Pass::Imaginary, &samples).unwrap();

    let j = [Complex64::new(0.4, 0.7), Complex64::new(0.5, -1.5), Complex64::from(0.7)];
    let fac = Complex64::new(0.0, -omega);
    for c in 0..3 {
        let expected = fac * j[c];
        assert_abs_diff_eq!(re[[0, c]], expected.re, epsilon = 1e-12);
        assert_abs_diff_eq!(im[[0, c]], expected.im, epsilon = 1e-12);
    }
}

#[test]
fn test_nonzero_field_index_is_noop() {
    let model = physics(1.0);
    let bc = SurfaceCurrent::new(vec![1], VectorFieldSpec::new(1.0, 1.0, 1.0), model.environment()).unwrap();
    let mut target = LinearFormCollector::new();

    for k in 1..5 {
        assert!(!bc.has_lf_contribution(k));
        for pass in Pass::BOTH {
            bc.add_lf_contribution(&model, &mut target, k, pass).unwrap();
        }
    }
    assert!(target.is_empty());
}

#[test]
fn test_disjoint_boundaries_do_not_interfere() {
    let model = physics(0.5);
    let boundaries: Vec<Box<dyn BoundaryCondition>> = vec![
        Box::new(SurfaceCurrent::new(vec![1, 2], VectorFieldSpec::new(1.0, 0.0, 0.0), model.environment()).unwrap()),
        Box::new(SurfaceCurrent::new(vec![5], VectorFieldSpec::new(0.0, 0.0, "J0"), model.environment()).unwrap()),
    ];
    let mut target = LinearFormCollector::new();

    let count = add_lf_contributions(&boundaries, &model, &mut target, 0).unwrap();
    assert_eq!(count, 4);
    assert_eq!(target.forms_for(0, Pass::Real).count(), 2);
    assert_eq!(target.forms_for(0, Pass::Imaginary).count(), 2);

    let samples = [at(2, [0.0; 3]), at(5, [0.0; 3]), at(9, [0.0; 3])];
    let im = target.sample(0, Pass::Imaginary, &samples).unwrap();
    let omega = PI;

    // first boundary only
    assert_abs_diff_eq!(im[[0, 0]], -omega, epsilon = 1e-12);
    assert_abs_diff_eq!(im[[0, 2]], 0.0, epsilon = 1e-15);
    // second boundary only: Im(-iω (0.5 - 1.5i)) = -0.5ω
    assert_abs_diff_eq!(im[[1, 0]], 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(im[[1, 2]], -0.5 * omega, epsilon = 1e-12);
    // outside both selections
    assert_eq!(im.row(2).to_vec(), vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_pass_order_does_not_matter() {
    let model = physics(2.0);
    let bc = SurfaceCurrent::new(vec![1], VectorFieldSpec::new("J0", "y", 1.0), model.environment()).unwrap();
    let samples = [at(1, [0.1, 0.2, 0.3]), at(1, [-1.0, 4.0, 0.0])];

    let mut forward = LinearFormCollector::new();
    bc.contribute(&model, &mut forward, 0, Pass::Real).unwrap();
    bc.contribute(&model, &mut forward, 0, Pass::Imaginary).unwrap();

    let mut reverse = LinearFormCollector::new();
    bc.contribute(&model, &mut reverse, 0, Pass::Imaginary).unwrap();
    bc.contribute(&model, &mut reverse, 0, Pass::Real).unwrap();

    for pass in Pass::BOTH {
        assert_eq!(
            forward.sample(0, pass, &samples).unwrap(),
            reverse.sample(0, pass, &samples).unwrap()
        );
    }
}

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    let model = physics(7.25);
    let bc = SurfaceCurrent::new(vec![1], VectorFieldSpec::new("swirl", "J0", "z"), model.environment()).unwrap();
    let ctx = fresnel_core::physics::FrequencySource::frequency(&model).unwrap();
    let p = [0.123, 4.56, -7.89];

    for pass in Pass::BOTH {
        let coeff = bc.coefficient(&ctx, pass);
        let first = fresnel_core::assembly::VectorCoefficient::eval(&coeff, &p).unwrap();
        for _ in 0..10 {
            let again = fresnel_core::assembly::VectorCoefficient::eval(&coeff, &p).unwrap();
            assert_eq!(first.map(f64::to_bits), again.map(f64::to_bits));
        }
    }
}

#[test]
fn test_two_axis_spec_fails_before_registration() {
    let model = physics(1.0);
    let err = SurfaceCurrent::from_entries(
        vec![1],
        vec![AxisEntry::from(1.0), AxisEntry::from(0.0)],
        model.environment(),
    )
    .unwrap_err();
    assert_eq!(err, SpecificationError::Arity { expected: 3, found: 2 });
    assert_eq!(
        BoundaryError::from(err).to_string(),
        "Specification error: Vector field needs exactly 3 axis entries, got 2"
    );
}

#[test]
fn test_undefined_symbol_propagates_from_assembly() {
    let model = physics(1.0);
    let bc = SurfaceCurrent::new(vec![1], VectorFieldSpec::new(0.0, "nowhere", 0.0), model.environment()).unwrap();
    let mut target = LinearFormCollector::new();
    bc.contribute(&model, &mut target, 0, Pass::Real).unwrap();

    let err = target.sample(0, Pass::Real, &[at(1, [0.0; 3])]).unwrap_err();
    assert_eq!(err, EvaluationError::UndefinedSymbol("nowhere".into()));
}

#[test]
fn test_zero_frequency_registers_zero_source() {
    let model = physics(0.0);
    let bc = SurfaceCurrent::new(vec![1], VectorFieldSpec::new("J0", "swirl", 3.0), model.environment()).unwrap();
    let mut target = LinearFormCollector::new();
    for pass in Pass::BOTH {
        bc.contribute(&model, &mut target, 0, pass).unwrap();
    }
    let samples = [at(1, [1.0, 2.0, 3.0])];
    for pass in Pass::BOTH {
        let v = target.sample(0, pass, &samples).unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
