use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ferric_adi::prelude::*;
use ndarray::{Array, ArrayD, IxDyn};
use std::hint::black_box;

fn hold(inner: ArrayD<f64>, _ctx: &MarchingContext<'_, f64>) -> Result<ArrayD<f64>, PdeError> {
    Ok(inner)
}

/// 2-D equation with every term present and mixed boundary types.
fn full_stepper() -> ParabolicStepper<f64> {
    ParabolicStepper::new(vec![
        AxisBoundaries::new(RobinCondition::dirichlet(0.0), RobinCondition::neumann(1.0)),
        AxisBoundaries::new(RobinCondition::robin(1.0, 0.5, 0.0), RobinCondition::dirichlet(1.0)),
    ])
    .with_second_order_coeff_fn(|_t: f64, g: &CoordinateGrid<f64>| {
        let shape = g.shape();
        let a_xx = Array::from_shape_fn(IxDyn(&shape), |ix| 0.5 + 0.01 * ix[0] as f64);
        SymmetricCoefficients::from_upper_rows(vec![
            vec![Coefficient::array(a_xx), Coefficient::scalar(0.1)],
            vec![Coefficient::scalar(0.3)],
        ])
        .expect("upper rows")
    })
    .with_first_order_coeff_fn(|_t: f64, _g: &CoordinateGrid<f64>| {
        AxisCoefficients::new(vec![Coefficient::scalar(0.05), Coefficient::scalar(-0.02)])
    })
    .with_zeroth_order_coeff_fn(|_t: f64, _g: &CoordinateGrid<f64>| Coefficient::scalar(0.03))
}

fn bench_equation_params(c: &mut Criterion) {
    let stepper = full_stepper();
    let mut group = c.benchmark_group("equation_params_2d");

    for n in [32_usize, 128, 256] {
        let coords =
            CoordinateGrid::uniform(&[(0.0, 1.0, n), (0.0, 1.0, n)]).expect("grid should build");
        let values = ArrayD::<f64>::zeros(IxDyn(&[n, n]));
        group.bench_with_input(BenchmarkId::new("points_per_axis", n), &n, |b, _| {
            b.iter(|| {
                let params = stepper
                    .equation_params(black_box(0.0), black_box(&coords), black_box(&values))
                    .expect("discretization should succeed");
                black_box(params)
            })
        });
    }

    group.finish();
}

fn bench_batched_step(c: &mut Criterion) {
    let stepper = full_stepper();
    let coords = CoordinateGrid::uniform(&[(0.0, 1.0, 64), (0.0, 1.0, 64)]).expect("grid");
    let values = ArrayD::<f64>::from_elem(IxDyn(&[16, 64, 64]), 0.5);

    c.bench_function("step_reattach_16x64x64", |b| {
        b.iter(|| {
            let (_, next) = stepper
                .step(1.0, 0.99, coords.clone(), black_box(&values), &hold)
                .expect("step should succeed");
            black_box(next)
        })
    });
}

criterion_group!(discretization_benches, bench_equation_params, bench_batched_step);
criterion_main!(discretization_benches);
