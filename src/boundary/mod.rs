//! Robin boundary conditions on the faces of a rectangular domain.
//!
//! Each face carries `alpha V + beta V_n = gamma`, with `V_n` the derivative
//! along the exterior normal. `beta` absent is a Dirichlet condition, `alpha`
//! absent a Neumann condition; both absent is invalid.

pub mod discretize;
pub mod normalize;

use ndarray::NdFloat;
use serde::{Deserialize, Serialize};

use crate::coefficients::Coefficient;
use crate::core::{Face, PdeError};
use crate::grid::CoordinateGrid;

pub use discretize::{Extrapolation, discretize_boundary_condition};
pub use normalize::{NormalizedFace, normalize_boundary_coefficient, normalize_face};

/// Coefficients of `alpha V + beta V_n = gamma` on one face.
///
/// Array values are laid out on the grid with the face's axis removed.
/// An absent `gamma` is a homogeneous condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobinCondition<F> {
    pub alpha: Coefficient<F>,
    pub beta: Coefficient<F>,
    pub gamma: Coefficient<F>,
}

impl<F: NdFloat> RobinCondition<F> {
    pub fn new(alpha: Coefficient<F>, beta: Coefficient<F>, gamma: Coefficient<F>) -> Self {
        Self { alpha, beta, gamma }
    }

    /// `V = value` on the face.
    pub fn dirichlet(value: F) -> Self {
        Self::new(
            Coefficient::Scalar(F::one()),
            Coefficient::Absent,
            Coefficient::Scalar(value),
        )
    }

    /// `V_n = value` on the face.
    pub fn neumann(value: F) -> Self {
        Self::new(
            Coefficient::Absent,
            Coefficient::Scalar(F::one()),
            Coefficient::Scalar(value),
        )
    }

    /// Constant `alpha V + beta V_n = gamma`.
    pub fn robin(alpha: F, beta: F, gamma: F) -> Self {
        Self::new(
            Coefficient::Scalar(alpha),
            Coefficient::Scalar(beta),
            Coefficient::Scalar(gamma),
        )
    }

    pub fn is_dirichlet(&self) -> bool {
        self.beta.is_absent()
    }

    pub fn validate(&self) -> Result<(), PdeError> {
        if self.alpha.is_absent() && self.beta.is_absent() {
            return Err(PdeError::InvalidBoundary(
                "alpha and beta can't both be absent".to_string(),
            ));
        }
        Ok(())
    }
}

/// Capability producing the Robin coefficients of one face at time `t`.
///
/// Closures `Fn(F, &CoordinateGrid<F>) -> RobinCondition<F>` implement this
/// directly, and a [`RobinCondition`] value is a time-independent condition.
pub trait BoundaryCondition<F> {
    fn evaluate(&self, t: F, coord_grid: &CoordinateGrid<F>) -> RobinCondition<F>;
}

impl<F, C> BoundaryCondition<F> for C
where
    C: Fn(F, &CoordinateGrid<F>) -> RobinCondition<F>,
{
    fn evaluate(&self, t: F, coord_grid: &CoordinateGrid<F>) -> RobinCondition<F> {
        self(t, coord_grid)
    }
}

impl<F: NdFloat> BoundaryCondition<F> for RobinCondition<F> {
    fn evaluate(&self, _t: F, _coord_grid: &CoordinateGrid<F>) -> RobinCondition<F> {
        self.clone()
    }
}

pub type BoundaryFn<F> = Box<dyn BoundaryCondition<F> + Send + Sync>;

/// Lower and upper face conditions of one axis.
pub struct AxisBoundaries<F> {
    lower: BoundaryFn<F>,
    upper: BoundaryFn<F>,
}

impl<F: NdFloat> AxisBoundaries<F> {
    pub fn new<L, U>(lower: L, upper: U) -> Self
    where
        L: BoundaryCondition<F> + Send + Sync + 'static,
        U: BoundaryCondition<F> + Send + Sync + 'static,
    {
        Self {
            lower: Box::new(lower),
            upper: Box::new(upper),
        }
    }

    /// Same Dirichlet value on both faces.
    pub fn dirichlet(value: F) -> Self {
        Self::new(RobinCondition::dirichlet(value), RobinCondition::dirichlet(value))
    }

    /// Same Neumann value on both faces.
    pub fn neumann(value: F) -> Self {
        Self::new(RobinCondition::neumann(value), RobinCondition::neumann(value))
    }

    pub fn face(&self, face: Face) -> &(dyn BoundaryCondition<F> + Send + Sync) {
        match face {
            Face::Lower => self.lower.as_ref(),
            Face::Upper => self.upper.as_ref(),
        }
    }

    /// Evaluates both faces at `t`, lower first.
    pub fn evaluate(&self, t: F, coord_grid: &CoordinateGrid<F>) -> [RobinCondition<F>; 2] {
        [
            self.lower.evaluate(t, coord_grid),
            self.upper.evaluate(t, coord_grid),
        ]
    }
}

impl<F> std::fmt::Debug for AxisBoundaries<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisBoundaries").finish_non_exhaustive()
    }
}
