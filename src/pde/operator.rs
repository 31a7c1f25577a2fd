//! Tridiagonal operators along one spatial axis.
//!
//! For axis `k` with spacing `h` the second-order term `a d2(A V)/dx_k^2`
//! contributes `(-1, 2, -1) / h^2` and the first-order term `b d(B V)/dx_k`
//! contributes `(-1, 0, 1) / (2h)` to the (superdiagonal, diagonal,
//! subdiagonal) at each interior point, scaled by `a` (resp. `b`) at the point
//! and by `A` (resp. `B`) sampled at the neighbour the entry multiplies. Signs
//! correspond to moving every spatial term to the right-hand side, so the
//! semi-discrete system reads `du/dt = A u + b`.

use log::trace;
use ndarray::{ArrayBase, ArrayD, Axis, Data, IxDyn, NdFloat, Slice};
use serde::{Deserialize, Serialize};

use crate::boundary::NormalizedFace;
use crate::core::{Face, PdeError, Shift};
use crate::grid::{GridLayout, layer_slice};

/// Superdiagonal, diagonal, and subdiagonal of a tridiagonal operator along
/// one axis, each shaped like the interior grid.
///
/// `superdiag` at the last interior row and `subdiag` at the first have no
/// interior neighbour and are ignored by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TridiagonalOperator<F> {
    pub superdiag: ArrayD<F>,
    pub diag: ArrayD<F>,
    pub subdiag: ArrayD<F>,
}

impl<F: NdFloat> TridiagonalOperator<F> {
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            superdiag: ArrayD::zeros(IxDyn(shape)),
            diag: ArrayD::zeros(IxDyn(shape)),
            subdiag: ArrayD::zeros(IxDyn(shape)),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.diag.shape()
    }

    /// Multiplies interior values by the operator along array axis `axis`.
    ///
    /// Neighbours outside the interior contribute nothing; their influence is
    /// already folded into the boundary rows and the inhomogeneous term.
    pub fn apply<S>(&self, values: &ArrayBase<S, IxDyn>, axis: usize) -> Result<ArrayD<F>, PdeError>
    where
        S: Data<Elem = F>,
    {
        if values.shape() != self.shape() {
            return Err(PdeError::Shape(format!(
                "values of shape {:?} do not match operator shape {:?}",
                values.shape(),
                self.shape()
            )));
        }
        if axis >= values.ndim() {
            return Err(PdeError::Dimension(format!(
                "axis {axis} out of range for a rank-{} grid",
                values.ndim()
            )));
        }
        let n = values.len_of(Axis(axis));
        let mut out = &self.diag * values;
        if n < 2 {
            return Ok(out);
        }
        let head = Slice::from(0..n - 1);
        let tail = Slice::from(1..n);
        {
            let mut upper = out.slice_axis_mut(Axis(axis), head);
            upper += &(&self.superdiag.slice_axis(Axis(axis), head)
                * &values.slice_axis(Axis(axis), tail));
        }
        {
            let mut lower = out.slice_axis_mut(Axis(axis), tail);
            lower += &(&self.subdiag.slice_axis(Axis(axis), tail)
                * &values.slice_axis(Axis(axis), head));
        }
        Ok(out)
    }
}

impl<F: NdFloat> std::ops::Add for TridiagonalOperator<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            superdiag: self.superdiag + rhs.superdiag,
            diag: self.diag + rhs.diag,
            subdiag: self.subdiag + rhs.subdiag,
        }
    }
}

/// Coefficients of one axis' derivative terms, already broadcast to the
/// full grid shape.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisTerms<'a, F> {
    pub second_order: Option<&'a ArrayD<F>>,
    pub inner_second_order: Option<&'a ArrayD<F>>,
    pub first_order: Option<&'a ArrayD<F>>,
    pub inner_first_order: Option<&'a ArrayD<F>>,
}

/// One derivative term: constant stencil weights scaled by an outer
/// coefficient at the point and an inner coefficient at each neighbour.
fn derivative_term<F: NdFloat>(
    layout: &GridLayout,
    dim: usize,
    [super_w, diag_w, sub_w]: [F; 3],
    outer: Option<&ArrayD<F>>,
    inner: Option<&ArrayD<F>>,
) -> Result<TridiagonalOperator<F>, PdeError> {
    let shape = layout.interior_shape();
    if outer.is_none() && inner.is_none() {
        return Ok(TridiagonalOperator::zeros(&shape));
    }
    let mut op = TridiagonalOperator {
        superdiag: ArrayD::from_elem(IxDyn(&shape), super_w),
        diag: ArrayD::from_elem(IxDyn(&shape), diag_w),
        subdiag: ArrayD::from_elem(IxDyn(&shape), sub_w),
    };
    if let Some(outer) = outer {
        let at_point = layout.interior().view(outer)?;
        op.superdiag *= &at_point;
        op.diag *= &at_point;
        op.subdiag *= &at_point;
    }
    if let Some(inner) = inner {
        op.superdiag *= &layout.interior().shift(dim, Shift::Up).view(inner)?;
        op.diag *= &layout.interior().view(inner)?;
        op.subdiag *= &layout.interior().shift(dim, Shift::Down).view(inner)?;
    }
    Ok(op)
}

/// First- and second-order contributions along axis `dim` over the interior.
pub(crate) fn build_tridiagonal<F: NdFloat>(
    layout: &GridLayout,
    dim: usize,
    delta: F,
    terms: AxisTerms<'_, F>,
) -> Result<TridiagonalOperator<F>, PdeError> {
    let two = F::one() + F::one();

    let first_super = -F::one() / (two * delta);
    let first_sub = F::one() / (two * delta);
    let first = derivative_term(
        layout,
        dim,
        [first_super, -(first_super + first_sub), first_sub],
        terms.first_order,
        terms.inner_first_order,
    )?;

    let second_off = -F::one() / (delta * delta);
    let second = derivative_term(
        layout,
        dim,
        [second_off, -(second_off + second_off), second_off],
        terms.second_order,
        terms.inner_second_order,
    )?;

    Ok(first + second)
}

fn add_to_layer<F: NdFloat>(
    target: &mut ArrayD<F>,
    axis: usize,
    face: Face,
    contribution: &ArrayD<F>,
) {
    let len = target.len_of(Axis(axis));
    let mut layer = target.slice_axis_mut(Axis(axis), layer_slice(len, face, 0));
    layer += contribution;
}

/// Folds the boundary conditions of axis `dim` into the first and last
/// interior rows and returns the resulting inhomogeneous term.
///
/// With `V_0 = xi1 V_1 + xi2 V_2 + eta` on a face, the boundary entry of the
/// adjacent row moves onto that row's diagonal (`xi1`), its inward
/// off-diagonal (`xi2`), and the inhomogeneous term (`eta`). Dirichlet faces
/// have `xi1 = xi2 = 0`, so when both faces are Dirichlet only the
/// inhomogeneous term is formed.
pub(crate) fn apply_boundary_conditions<F: NdFloat>(
    op: &mut TridiagonalOperator<F>,
    layout: &GridLayout,
    dim: usize,
    delta: F,
    [lower, upper]: [&NormalizedFace<F>; 2],
) -> Result<ArrayD<F>, PdeError> {
    let axis = layout.spatial_axis(dim);
    let n = op.diag.len_of(Axis(axis));
    let subdiag_first = op
        .subdiag
        .slice_axis(Axis(axis), layer_slice(n, Face::Lower, 0))
        .to_owned();
    let superdiag_last = op
        .superdiag
        .slice_axis(Axis(axis), layer_slice(n, Face::Upper, 0))
        .to_owned();

    let lower_rule = lower.discretize(delta)?;
    let upper_rule = upper.discretize(delta)?;

    let mut inhomog = ArrayD::zeros(op.diag.raw_dim());
    add_to_layer(&mut inhomog, axis, Face::Lower, &(&subdiag_first * &lower_rule.eta));
    add_to_layer(&mut inhomog, axis, Face::Upper, &(&superdiag_last * &upper_rule.eta));

    if lower.is_dirichlet() && upper.is_dirichlet() {
        trace!("axis {dim}: Dirichlet on both faces, inhomogeneous term only");
        return Ok(inhomog);
    }
    trace!("axis {dim}: applying Robin corrections to boundary rows");

    if n == 1 {
        // The second inward layer is the opposite boundary: treat it as the
        // single interior point, consistent with reconstruction.
        let lower_xi = &lower_rule.xi1 + &lower_rule.xi2;
        let upper_xi = &upper_rule.xi1 + &upper_rule.xi2;
        op.diag += &(&subdiag_first * &lower_xi + &superdiag_last * &upper_xi);
        return Ok(inhomog);
    }

    add_to_layer(&mut op.diag, axis, Face::Lower, &(&subdiag_first * &lower_rule.xi1));
    add_to_layer(&mut op.superdiag, axis, Face::Lower, &(&subdiag_first * &lower_rule.xi2));
    add_to_layer(&mut op.diag, axis, Face::Upper, &(&superdiag_last * &upper_rule.xi1));
    add_to_layer(&mut op.subdiag, axis, Face::Upper, &(&superdiag_last * &upper_rule.xi2));
    Ok(inhomog)
}
