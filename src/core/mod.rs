//! Core error type, shared axis/face enums, and serialization helpers.

pub mod serialization;
pub mod types;

pub use serialization::*;
pub use types::*;

/// Errors surfaced while discretizing or stepping a parabolic PDE.
///
/// Every variant is a precondition violation by caller-supplied data and is
/// fatal to the step in which it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdeError {
    /// A coefficient or boundary array does not broadcast to the expected shape.
    Shape(String),
    /// A boundary face has neither `alpha` nor `beta`.
    InvalidBoundary(String),
    /// Grid rank, axis count, or axis length is inconsistent.
    Dimension(String),
    /// Numerical failure reported by an external time-marching scheme.
    Numerical(String),
}

impl std::fmt::Display for PdeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape(msg) => write!(f, "shape error: {msg}"),
            Self::InvalidBoundary(msg) => write!(f, "invalid boundary condition: {msg}"),
            Self::Dimension(msg) => write!(f, "dimension error: {msg}"),
            Self::Numerical(msg) => write!(f, "numerical error: {msg}"),
        }
    }
}

impl std::error::Error for PdeError {}

impl From<ndarray::ShapeError> for PdeError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}
