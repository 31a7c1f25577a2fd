//! Aligns boundary coefficient arrays with the grid they act on.
//!
//! A boundary coefficient for the faces orthogonal to axis `dim` lives on the
//! grid with that axis removed, e.g. `(b, nz, nx)` for `dim = 1` of a
//! `(b, nz, ny, nx)` grid. Before it can be combined with a face layer it is
//! broadcast to that face shape, trimmed on the axes that are still interior,
//! and given a unit axis back at `dim`, giving `(b, nz - 2, 1, nx - 2)` when
//! every remaining axis is trimmed.

use ndarray::{ArrayD, Axis, NdFloat};

use crate::boundary::{Extrapolation, RobinCondition, discretize_boundary_condition};
use crate::coefficients::Coefficient;
use crate::core::PdeError;
use crate::grid::{GridLayout, Window};

/// Face coefficients reshaped to a 1-thick layer of the working grid.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFace<F> {
    pub alpha: Option<ArrayD<F>>,
    pub beta: Option<ArrayD<F>>,
    pub gamma: ArrayD<F>,
}

impl<F: NdFloat> NormalizedFace<F> {
    pub fn is_dirichlet(&self) -> bool {
        self.beta.is_none()
    }

    /// Two-point extrapolation rule for uniform spacing `delta`.
    pub fn discretize(&self, delta: F) -> Result<Extrapolation<F>, PdeError> {
        discretize_boundary_condition(
            delta,
            delta,
            self.alpha.as_ref(),
            self.beta.as_ref(),
            &self.gamma,
        )
    }
}

/// Reshapes one boundary coefficient of axis `dim`.
///
/// `trim_from` is the first axis of the face array (batch axes included)
/// that is trimmed to the interior.
pub fn normalize_boundary_coefficient<F: NdFloat>(
    raw: &Coefficient<F>,
    layout: &GridLayout,
    dim: usize,
    trim_from: usize,
) -> Result<Option<ArrayD<F>>, PdeError> {
    let face_shape = layout.face_shape(dim);
    let full = raw.materialize(&face_shape).map_err(|err| match err {
        PdeError::Shape(msg) => PdeError::Shape(format!("boundary of axis {dim}: {msg}")),
        other => other,
    })?;
    let Some(full) = full else {
        return Ok(None);
    };
    let trimmed = Window::interior(trim_from).view(&full)?.to_owned();
    Ok(Some(trimmed.insert_axis(Axis(layout.spatial_axis(dim)))))
}

/// Validates a face condition and normalizes all three of its coefficients.
pub fn normalize_face<F: NdFloat>(
    condition: &RobinCondition<F>,
    layout: &GridLayout,
    dim: usize,
    trim_from: usize,
) -> Result<NormalizedFace<F>, PdeError> {
    condition.validate().map_err(|err| match err {
        PdeError::InvalidBoundary(msg) => {
            PdeError::InvalidBoundary(format!("axis {dim}: {msg}"))
        }
        other => other,
    })?;
    let zero = Coefficient::Scalar(F::zero());
    let gamma = if condition.gamma.is_absent() {
        &zero
    } else {
        &condition.gamma
    };
    let gamma = normalize_boundary_coefficient(gamma, layout, dim, trim_from)?.ok_or_else(|| {
        PdeError::InvalidBoundary(format!("axis {dim}: gamma could not be materialized"))
    })?;
    Ok(NormalizedFace {
        alpha: normalize_boundary_coefficient(&condition.alpha, layout, dim, trim_from)?,
        beta: normalize_boundary_coefficient(&condition.beta, layout, dim, trim_from)?,
        gamma,
    })
}
