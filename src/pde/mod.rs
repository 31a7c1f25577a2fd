//! Discretization of one time step of a multidimensional parabolic PDE.
//!
//! [`ParabolicStepper`] evaluates the equation's coefficients and boundary
//! conditions, builds per-axis [`TridiagonalOperator`]s, pairwise
//! [`MixedTerm`]s and inhomogeneous terms over the interior of the grid, and
//! hands them to a [`TimeMarchingScheme`]. The scheme owns the ADI recurrence
//! and the tridiagonal solves; this module never advances the solution
//! itself.

pub mod mixed;
pub mod operator;
pub mod params;
pub mod reconstruct;
pub mod stepper;

pub use mixed::MixedTerm;
pub use operator::TridiagonalOperator;
pub use params::{EquationParams, construct_equation_params};
pub use reconstruct::append_boundaries;
pub use stepper::{MarchingContext, ParabolicStepper, TimeMarchingScheme};
