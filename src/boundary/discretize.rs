//! Ghost-point elimination for Robin conditions.
//!
//! A condition `alpha V + beta V_n = gamma` on a face is turned into the
//! two-point rule `V_0 = xi1 V_1 + xi2 V_2 + eta`, where `V_1`, `V_2` are the
//! next two grid layers inward. The rule is exact for any function that is
//! quadratic across those three layers, and identical in form on both faces
//! because `V_n` is taken along the exterior normal.

use ndarray::{ArrayBase, ArrayD, Data, IxDyn, NdFloat};

use crate::core::PdeError;

/// Coefficients of `V_0 = xi1 V_1 + xi2 V_2 + eta` on one face.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrapolation<F> {
    pub xi1: ArrayD<F>,
    pub xi2: ArrayD<F>,
    pub eta: ArrayD<F>,
}

impl<F: NdFloat> Extrapolation<F> {
    /// Boundary layer values given the first and second inward layers.
    pub fn extrapolate<S1, S2>(
        &self,
        next: &ArrayBase<S1, IxDyn>,
        next2: &ArrayBase<S2, IxDyn>,
    ) -> ArrayD<F>
    where
        S1: Data<Elem = F>,
        S2: Data<Elem = F>,
    {
        &self.xi1 * next + &self.xi2 * next2 + &self.eta
    }
}

/// Discretizes `alpha V + beta V_n = gamma` with spacings `dx0` (boundary to
/// first layer) and `dx1` (first to second layer).
///
/// `alpha`, `beta` and `gamma` must share one shape. With `beta` absent the
/// condition is Dirichlet and `V_0 = gamma / alpha`.
pub fn discretize_boundary_condition<F: NdFloat>(
    dx0: F,
    dx1: F,
    alpha: Option<&ArrayD<F>>,
    beta: Option<&ArrayD<F>>,
    gamma: &ArrayD<F>,
) -> Result<Extrapolation<F>, PdeError> {
    let Some(beta) = beta else {
        let Some(alpha) = alpha else {
            return Err(PdeError::InvalidBoundary(
                "alpha and beta can't both be absent".to_string(),
            ));
        };
        let zeros = ArrayD::zeros(gamma.raw_dim());
        return Ok(Extrapolation {
            xi1: zeros.clone(),
            xi2: zeros,
            eta: gamma / alpha,
        });
    };

    let two = F::one() + F::one();
    let span = dx0 + dx1;
    let mut denom = beta * (dx1 * (two * dx0 + dx1));
    if let Some(alpha) = alpha {
        denom = denom + &(alpha * (dx0 * dx1 * span));
    }
    Ok(Extrapolation {
        xi1: beta * (span * span) / &denom,
        xi2: beta * (-(dx0 * dx0)) / &denom,
        eta: gamma * (dx0 * dx1 * span) / &denom,
    })
}
