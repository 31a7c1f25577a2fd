//! Mixed second-derivative terms `a_ij d2(A_ij V)/dx_i dx_j`, `i != j`.
//!
//! The four-point stencil reads the diagonal neighbours of each interior
//! point in the `(i, j)` plane. Since `a_ij = a_ji`, the pair appears twice in
//! the equation and the per-pair weight is `-a_ij / (2 h_i h_j)`.

use ndarray::{ArrayBase, ArrayD, Data, IxDyn, NdFloat};
use serde::{Deserialize, Serialize};

use crate::core::{PdeError, Shift};
use crate::grid::{GridLayout, Window};

/// Contribution of one axis pair at the diagonal neighbours `(++, +-, -+, --)`,
/// where the first sign is the step along the first axis of the pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum MixedTerm<F> {
    #[default]
    Absent,
    Quad {
        pp: ArrayD<F>,
        pm: ArrayD<F>,
        mp: ArrayD<F>,
        mm: ArrayD<F>,
    },
}

const NEIGHBOURS: [(Shift, Shift); 4] = [
    (Shift::Up, Shift::Up),
    (Shift::Up, Shift::Down),
    (Shift::Down, Shift::Up),
    (Shift::Down, Shift::Down),
];

impl<F: NdFloat> MixedTerm<F> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The same contribution seen with the two axes exchanged.
    pub fn transposed(&self) -> Self {
        match self {
            Self::Absent => Self::Absent,
            Self::Quad { pp, pm, mp, mm } => Self::Quad {
                pp: pp.clone(),
                pm: mp.clone(),
                mp: pm.clone(),
                mm: mm.clone(),
            },
        }
    }

    /// Evaluates the stencil on a full grid (boundary layers included) for
    /// spatial axes `dim_i`, `dim_j`, returning an interior-shaped array.
    pub fn apply<S>(
        &self,
        full_values: &ArrayBase<S, IxDyn>,
        batch_rank: usize,
        dim_i: usize,
        dim_j: usize,
    ) -> Result<ArrayD<F>, PdeError>
    where
        S: Data<Elem = F>,
    {
        let centered = Window::interior(batch_rank).view(full_values)?;
        let Self::Quad { pp, pm, mp, mm } = self else {
            return Ok(ArrayD::zeros(centered.raw_dim()));
        };
        if pp.shape() != centered.shape() {
            return Err(PdeError::Shape(format!(
                "mixed term of shape {:?} does not match interior shape {:?}",
                pp.shape(),
                centered.shape()
            )));
        }
        let mut out = ArrayD::zeros(centered.raw_dim());
        for (weights, (si, sj)) in [pp, pm, mp, mm].into_iter().zip(NEIGHBOURS) {
            let neighbour = Window::interior(batch_rank)
                .shift(dim_i, si)
                .shift(dim_j, sj)
                .view(full_values)?;
            out += &(weights * &neighbour);
        }
        Ok(out)
    }
}

/// Builds the mixed term of spatial axes `(dim_i, dim_j)`.
///
/// `outer` and `inner` are full-grid arrays of `a_ij` and `A_ij`. The inner
/// coefficient is sampled at each diagonal neighbour it multiplies. The
/// result is `Absent` when both are absent.
pub(crate) fn build_mixed_term<F: NdFloat>(
    layout: &GridLayout,
    [(dim_i, delta_i), (dim_j, delta_j)]: [(usize, F); 2],
    outer: Option<&ArrayD<F>>,
    inner: Option<&ArrayD<F>>,
) -> Result<MixedTerm<F>, PdeError> {
    if outer.is_none() && inner.is_none() {
        return Ok(MixedTerm::Absent);
    }
    let two = F::one() + F::one();
    let base = -F::one() / (two * delta_i * delta_j);
    let mut weight = ArrayD::from_elem(IxDyn(&layout.interior_shape()), base);
    if let Some(outer) = outer {
        weight *= &layout.interior().view(outer)?;
    }

    let entry = |sign: F, (si, sj): (Shift, Shift)| -> Result<ArrayD<F>, PdeError> {
        let mut out = weight.mapv(|w| sign * w);
        if let Some(inner) = inner {
            out *= &layout
                .interior()
                .shift(dim_i, si)
                .shift(dim_j, sj)
                .view(inner)?;
        }
        Ok(out)
    };
    let [pp, pm, mp, mm] = NEIGHBOURS;
    Ok(MixedTerm::Quad {
        pp: entry(F::one(), pp)?,
        pm: entry(-F::one(), pm)?,
        mp: entry(-F::one(), mp)?,
        mm: entry(F::one(), mm)?,
    })
}
