use std::borrow::Cow;

#[cfg(feature = "parallel")]
use log::debug;
use ndarray::{ArrayD, NdFloat};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boundary::{AxisBoundaries, RobinCondition, normalize_face};
use crate::coefficients::{EvaluatedCoefficients, PdeCoefficients};
use crate::core::PdeError;
use crate::grid::{CoordinateGrid, GridLayout, count_as};
use crate::pde::mixed::{MixedTerm, build_mixed_term};
use crate::pde::operator::{
    AxisTerms, TridiagonalOperator, apply_boundary_conditions, build_tridiagonal,
};

/// Discretized equation at one time point.
///
/// The semi-discrete system is
/// `du/dt = Sum_k (A_k u + b_k) + Sum_{i<j} M_ij u`, with `A_k` the
/// tridiagonal operator of axis `k`, `b_k` its inhomogeneous term and `M_ij`
/// the mixed term of the pair `(i, j)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationParams<F> {
    operators: Vec<TridiagonalOperator<F>>,
    /// Row `i` holds the pairs `(i, j)` for `j = i + 1..n`.
    mixed: Vec<Vec<MixedTerm<F>>>,
    inhomogeneous: Vec<ArrayD<F>>,
}

impl<F: NdFloat> EquationParams<F> {
    pub fn n_dims(&self) -> usize {
        self.operators.len()
    }

    pub fn operator(&self, dim: usize) -> Result<&TridiagonalOperator<F>, PdeError> {
        self.operators.get(dim).ok_or_else(|| self.out_of_range(dim))
    }

    /// Per-axis operators in axis order, for schemes that sweep every axis.
    pub fn operators(&self) -> &[TridiagonalOperator<F>] {
        &self.operators
    }

    /// Mixed term of axes `i` and `j`. With `i > j` the stored `(j, i)` term
    /// is returned transposed.
    pub fn mixed_term(&self, i: usize, j: usize) -> Result<Cow<'_, MixedTerm<F>>, PdeError> {
        if i == j {
            return Err(PdeError::Dimension(format!(
                "mixed term needs two distinct axes, got ({i}, {j})"
            )));
        }
        let (lo, hi) = (i.min(j), i.max(j));
        let term = self
            .mixed
            .get(lo)
            .and_then(|row| row.get(hi - lo - 1))
            .ok_or_else(|| self.out_of_range(hi))?;
        Ok(if i < j {
            Cow::Borrowed(term)
        } else {
            Cow::Owned(term.transposed())
        })
    }

    pub fn inhomogeneous_term(&self, dim: usize) -> Result<&ArrayD<F>, PdeError> {
        self.inhomogeneous
            .get(dim)
            .ok_or_else(|| self.out_of_range(dim))
    }

    fn from_axes(axes: Vec<AxisParams<F>>) -> Self {
        let n_dims = axes.len();
        let mut params = Self {
            operators: Vec::with_capacity(n_dims),
            mixed: Vec::with_capacity(n_dims),
            inhomogeneous: Vec::with_capacity(n_dims),
        };
        for axis in axes {
            params.operators.push(axis.operator);
            params.mixed.push(axis.mixed);
            params.inhomogeneous.push(axis.inhomogeneous);
        }
        params
    }

    fn out_of_range(&self, dim: usize) -> PdeError {
        PdeError::Dimension(format!(
            "axis {dim} out of range for {} spatial dimensions",
            self.n_dims()
        ))
    }
}

struct AxisParams<F> {
    operator: TridiagonalOperator<F>,
    inhomogeneous: ArrayD<F>,
    mixed: Vec<MixedTerm<F>>,
}

/// Everything the per-axis builders read, evaluated once per time point.
struct Inputs<'a, F> {
    coefficients: EvaluatedCoefficients<F>,
    faces: Vec<[RobinCondition<F>; 2]>,
    /// `c / n` over the interior, or `None` without a reaction term.
    reaction_share: Option<ArrayD<F>>,
    coord_grid: &'a CoordinateGrid<F>,
    layout: &'a GridLayout,
}

fn build_axis<F: NdFloat>(inputs: &Inputs<'_, F>, dim: usize) -> Result<AxisParams<F>, PdeError> {
    let layout = inputs.layout;
    let shape = layout.shape();
    let coeffs = &inputs.coefficients;
    let delta = inputs.coord_grid.delta(dim);

    let second_order = coeffs.second_order.get(dim, dim)?.materialize(shape)?;
    let inner_second_order = coeffs.inner_second_order.get(dim, dim)?.materialize(shape)?;
    let first_order = coeffs.first_order.get(dim)?.materialize(shape)?;
    let inner_first_order = coeffs.inner_first_order.get(dim)?.materialize(shape)?;
    let mut operator = build_tridiagonal(
        layout,
        dim,
        delta,
        AxisTerms {
            second_order: second_order.as_ref(),
            inner_second_order: inner_second_order.as_ref(),
            first_order: first_order.as_ref(),
            inner_first_order: inner_first_order.as_ref(),
        },
    )?;

    let [lower, upper] = &inputs.faces[dim];
    let lower = normalize_face(lower, layout, dim, layout.batch_rank())?;
    let upper = normalize_face(upper, layout, dim, layout.batch_rank())?;
    let inhomogeneous =
        apply_boundary_conditions(&mut operator, layout, dim, delta, [&lower, &upper])?;

    if let Some(share) = &inputs.reaction_share {
        operator.diag -= share;
    }

    let mixed = (dim + 1..layout.n_dims())
        .map(|other| {
            let outer = coeffs.second_order.get(dim, other)?.materialize(shape)?;
            let inner = coeffs.inner_second_order.get(dim, other)?.materialize(shape)?;
            build_mixed_term(
                layout,
                [(dim, delta), (other, inputs.coord_grid.delta(other))],
                outer.as_ref(),
                inner.as_ref(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AxisParams {
        operator,
        inhomogeneous,
        mixed,
    })
}

/// Discretizes the equation at time `t` over the grid described by `layout`.
///
/// Coefficients and boundary conditions are evaluated once, then each axis
/// is built independently; with the `parallel` feature the axes are built on
/// the rayon pool.
pub fn construct_equation_params<F: NdFloat>(
    coefficients: &PdeCoefficients<F>,
    boundary_conditions: &[AxisBoundaries<F>],
    coord_grid: &CoordinateGrid<F>,
    layout: &GridLayout,
    t: F,
) -> Result<EquationParams<F>, PdeError> {
    let inputs = Inputs::evaluate(coefficients, boundary_conditions, coord_grid, layout, t)?;
    #[cfg(feature = "parallel")]
    let axes = build_axes_parallel(&inputs)?;
    #[cfg(not(feature = "parallel"))]
    let axes = build_axes(&inputs)?;
    Ok(EquationParams::from_axes(axes))
}

impl<'a, F: NdFloat> Inputs<'a, F> {
    fn evaluate(
        coefficients: &PdeCoefficients<F>,
        boundary_conditions: &[AxisBoundaries<F>],
        coord_grid: &'a CoordinateGrid<F>,
        layout: &'a GridLayout,
        t: F,
    ) -> Result<Self, PdeError> {
        let n_dims = layout.n_dims();
        if coord_grid.n_dims() != n_dims {
            return Err(PdeError::Dimension(format!(
                "coordinate grid has {} axes, layout has {n_dims}",
                coord_grid.n_dims()
            )));
        }
        let extents = &layout.shape()[layout.batch_rank()..];
        if coord_grid.shape() != extents {
            return Err(PdeError::Dimension(format!(
                "coordinate grid has extents {:?}, layout has {extents:?}",
                coord_grid.shape()
            )));
        }
        if boundary_conditions.len() != n_dims {
            return Err(PdeError::Dimension(format!(
                "{} boundary condition pairs supplied for {n_dims} spatial axes",
                boundary_conditions.len()
            )));
        }

        let evaluated = coefficients.evaluate(t, coord_grid)?;
        let reaction_share = match evaluated.zeroth_order.materialize(layout.shape())? {
            Some(c) => {
                let n = count_as::<F>(n_dims)?;
                Some(layout.interior().view(&c)?.mapv(|v| v / n))
            }
            None => None,
        };
        Ok(Self {
            coefficients: evaluated,
            faces: boundary_conditions
                .iter()
                .map(|bc| bc.evaluate(t, coord_grid))
                .collect(),
            reaction_share,
            coord_grid,
            layout,
        })
    }
}

fn build_axes<F: NdFloat>(inputs: &Inputs<'_, F>) -> Result<Vec<AxisParams<F>>, PdeError> {
    (0..inputs.layout.n_dims())
        .map(|dim| build_axis(inputs, dim))
        .collect()
}

#[cfg(feature = "parallel")]
fn build_axes_parallel<F: NdFloat>(
    inputs: &Inputs<'_, F>,
) -> Result<Vec<AxisParams<F>>, PdeError> {
    let n_dims = inputs.layout.n_dims();
    if n_dims < 2 {
        return build_axes(inputs);
    }
    debug!("building {n_dims} axis operators on the rayon pool");
    (0..n_dims)
        .into_par_iter()
        .map(|dim| build_axis(inputs, dim))
        .collect()
}
