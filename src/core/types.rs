use serde::{Deserialize, Serialize};

/// One of the two faces of the domain orthogonal to an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// The face at the smallest coordinate along the axis.
    Lower,
    /// The face at the largest coordinate along the axis.
    Upper,
}

/// Offset of a trimming window along one axis.
///
/// `Center` selects the interior `[1..n-1]`, `Down` the window `[0..n-2]`
/// (the lower neighbour of every interior point), `Up` the window `[2..n]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shift {
    Down,
    #[default]
    Center,
    Up,
}

impl Shift {
    /// Start index of the window along an axis.
    #[inline]
    pub fn start(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Center => 1,
            Self::Up => 2,
        }
    }
}
