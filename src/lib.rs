//! ferric-adi discretizes second-order linear parabolic PDEs on rectangular,
//! uniformly spaced grids for Alternating-Direction-Implicit time stepping.
//!
//! For the equation
//!
//! ```text
//! dV/dt + Sum[a_ij d2(A_ij V)/dx_i dx_j] + Sum[b_i d(B_i V)/dx_i] + c V = 0
//! ```
//!
//! one step produces, over the interior of the grid, a tridiagonal operator
//! per axis, a mixed-derivative term per pair of axes, and a per-axis
//! inhomogeneous term carrying the boundary data. An externally supplied
//! [`pde::TimeMarchingScheme`] (Douglas, Craig-Sneyd, ...) consumes them, and
//! the boundary layers of its result are restored from the boundary
//! conditions.
//!
//! Numerical considerations:
//! - Central differences in the interior, second order in the grid spacing.
//! - Robin conditions `alpha V + beta V_n = gamma` are eliminated with a
//!   one-sided quadratic extrapolation through the boundary and the two
//!   nearest interior layers.
//! - Value grids may carry any number of leading batch axes; they are never
//!   trimmed.
//!
//! # Feature Flags
//! - `parallel`: builds the per-axis operators on the Rayon pool.
//!
//! # Quick Start
//! Discretize pure diffusion on a 5x5 grid with zero Dirichlet boundaries:
//! ```rust
//! use ferric_adi::prelude::*;
//! use ndarray::{ArrayD, IxDyn};
//!
//! let stepper = ParabolicStepper::new(vec![
//!     AxisBoundaries::dirichlet(0.0),
//!     AxisBoundaries::dirichlet(0.0),
//! ])
//! .with_second_order_coeff_fn(|_t: f64, _g: &CoordinateGrid<f64>| {
//!     SymmetricCoefficients::diagonal(vec![Coefficient::scalar(1.0); 2])
//! });
//!
//! let coords = CoordinateGrid::uniform(&[(0.0, 4.0, 5), (0.0, 4.0, 5)]).unwrap();
//! let mut values = ArrayD::<f64>::zeros(IxDyn(&[5, 5]));
//! values[IxDyn(&[2, 2])] = 1.0;
//!
//! let params = stepper.equation_params(0.0, &coords, &values).unwrap();
//! for dim in 0..2 {
//!     let op = params.operator(dim).unwrap();
//!     assert!(op.diag.iter().all(|&d| (d - 2.0).abs() < 1e-12));
//!     assert!(op.superdiag.iter().all(|&u| (u + 1.0).abs() < 1e-12));
//!     assert!(op.subdiag.iter().all(|&l| (l + 1.0).abs() < 1e-12));
//!     assert!(params.inhomogeneous_term(dim).unwrap().iter().all(|&b| b == 0.0));
//! }
//! assert!(params.mixed_term(0, 1).unwrap().is_absent());
//! ```
//!
//! Step with a scheme supplied as a plain function:
//! ```rust
//! use ferric_adi::prelude::*;
//! use ndarray::{ArrayD, IxDyn};
//!
//! fn hold(inner: ArrayD<f64>, _ctx: &MarchingContext<'_, f64>) -> Result<ArrayD<f64>, PdeError> {
//!     Ok(inner)
//! }
//!
//! let stepper = ParabolicStepper::new(vec![AxisBoundaries::dirichlet(1.0)]);
//! let coords = CoordinateGrid::uniform(&[(0.0, 1.0, 6)]).unwrap();
//! let values = ArrayD::<f64>::zeros(IxDyn(&[2, 6]));
//! let (_, next) = stepper.step(0.0, 0.1, coords, &values, &hold).unwrap();
//! assert_eq!(next.shape(), &[2, 6]);
//! assert_eq!(next[IxDyn(&[1, 5])], 1.0);
//! ```

pub mod boundary;
pub mod coefficients;
pub mod core;
pub mod grid;
pub mod pde;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::boundary::{AxisBoundaries, BoundaryCondition, RobinCondition};
    pub use crate::coefficients::{
        AxisCoefficients, Coefficient, CoefficientFn, NoCoefficient, PdeCoefficients,
        SymmetricCoefficients,
    };
    pub use crate::core::{Face, PdeError};
    pub use crate::grid::CoordinateGrid;
    pub use crate::pde::{
        EquationParams, MarchingContext, MixedTerm, ParabolicStepper, TimeMarchingScheme,
        TridiagonalOperator,
    };
}
