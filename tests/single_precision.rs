use approx::assert_abs_diff_eq;
use ferric_adi::prelude::*;
use ndarray::{ArrayD, IxDyn, s};

const LEVEL: f32 = 1.5;

fn hold(inner: ArrayD<f32>, _ctx: &MarchingContext<'_, f32>) -> Result<ArrayD<f32>, PdeError> {
    Ok(inner)
}

fn stepper() -> ParabolicStepper<f32> {
    ParabolicStepper::new(vec![
        AxisBoundaries::dirichlet(LEVEL),
        AxisBoundaries::neumann(0.0),
    ])
    .with_second_order_coeff_fn(|_t: f32, _g: &CoordinateGrid<f32>| {
        SymmetricCoefficients::diagonal(vec![Coefficient::scalar(1.0); 2])
    })
}

#[test]
fn f32_operators_carry_expected_stencils() {
    // Spacing 0.5 on both axes.
    let coords = CoordinateGrid::<f32>::uniform(&[(0.0, 2.0, 5), (0.0, 3.0, 7)]).expect("grid");
    let values = ArrayD::from_elem(IxDyn(&[5, 7]), LEVEL);
    let params = stepper()
        .equation_params(0.0, &coords, &values)
        .expect("discretization");
    assert_eq!(params.operators().len(), 2);

    let x = params.operator(0).expect("operator");
    assert_eq!(x.shape(), &[3, 5]);
    assert!(x.diag.iter().all(|&v| v == 8.0));
    assert!(x.superdiag.iter().all(|&v| v == -4.0));
    assert!(x.subdiag.iter().all(|&v| v == -4.0));
    let b = params.inhomogeneous_term(0).expect("term");
    assert!(b.slice(s![0, ..]).iter().all(|&v| v == -6.0));
    assert!(b.slice(s![1, ..]).iter().all(|&v| v == 0.0));
    assert!(b.slice(s![2, ..]).iter().all(|&v| v == -6.0));

    // Zero-flux faces fold the ghost point into the first and last rows.
    let y = params.operator(1).expect("operator");
    assert_abs_diff_eq!(y.diag[IxDyn(&[1, 0])], 8.0 / 3.0, epsilon = 1e-5);
    assert_abs_diff_eq!(y.superdiag[IxDyn(&[1, 0])], -8.0 / 3.0, epsilon = 1e-5);
    assert_abs_diff_eq!(y.diag[IxDyn(&[1, 2])], 8.0, epsilon = 1e-6);

    let inner = ArrayD::from_elem(IxDyn(&[3, 5]), LEVEL);
    for dim in 0..2 {
        let op = params.operator(dim).expect("operator");
        let rate = op.apply(&inner, dim).expect("apply")
            + params.inhomogeneous_term(dim).expect("term");
        assert_abs_diff_eq!(rate, ArrayD::zeros(IxDyn(&[3, 5])), epsilon = 1e-5);
    }
}

#[test]
fn f32_step_preserves_shape_and_constant_state() {
    let coords = CoordinateGrid::<f32>::uniform(&[(0.0, 2.0, 5), (0.0, 3.0, 7)]).expect("grid");
    let values = ArrayD::from_elem(IxDyn(&[2, 5, 7]), LEVEL);
    let (coords_out, next) = stepper()
        .step(1.0, 0.5, coords.clone(), &values, &hold)
        .expect("step");
    assert_eq!(coords_out, coords);
    assert_eq!(next.shape(), &[2, 5, 7]);
    assert_abs_diff_eq!(next, values, epsilon = 1e-5);
}
