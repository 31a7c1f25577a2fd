//! Coordinate grids, grid layout bookkeeping, and trimming windows.
//!
//! A value grid has shape `B + [d_1, ..., d_n]`: optional leading batch axes
//! followed by one axis per spatial dimension. [`GridLayout`] records that
//! split once per step so helpers never re-derive the batch rank.

pub mod window;

use ndarray::{Array1, ArrayD, NdFloat};
use num_traits::NumCast;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::PdeError;

pub use window::{Window, face_layer, layer_slice, trim};

/// Minimum number of points along a spatial axis: two boundary layers plus
/// at least one interior point.
pub const MIN_AXIS_POINTS: usize = 3;

/// Ordered coordinates of a rectangular, uniformly spaced grid, one 1-D
/// array per spatial axis.
///
/// Deserialization runs the same checks as [`CoordinateGrid::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateGrid<F> {
    axes: Vec<Array1<F>>,
}

impl<'de, F> Deserialize<'de> for CoordinateGrid<F>
where
    F: NdFloat + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Axes<F> {
            axes: Vec<Array1<F>>,
        }

        let Axes { axes } = Axes::deserialize(deserializer)?;
        Self::new(axes).map_err(serde::de::Error::custom)
    }
}

impl<F: NdFloat> CoordinateGrid<F> {
    /// Builds a coordinate grid from explicit axis coordinates.
    ///
    /// Every axis needs at least [`MIN_AXIS_POINTS`] points and a finite,
    /// non-zero spacing `coord[1] - coord[0]`.
    pub fn new(axes: Vec<Array1<F>>) -> Result<Self, PdeError> {
        if axes.is_empty() {
            return Err(PdeError::Dimension(
                "coordinate grid needs at least one axis".to_string(),
            ));
        }
        for (dim, axis) in axes.iter().enumerate() {
            if axis.len() < MIN_AXIS_POINTS {
                return Err(PdeError::Dimension(format!(
                    "axis {dim} has {} points, need at least {MIN_AXIS_POINTS}",
                    axis.len()
                )));
            }
            let delta = axis[1] - axis[0];
            if !delta.is_finite() || delta == F::zero() {
                return Err(PdeError::Dimension(format!(
                    "axis {dim} spacing must be finite and non-zero, got {delta}"
                )));
            }
        }
        Ok(Self { axes })
    }

    /// Builds a uniform grid from `(lower, upper, points)` triples.
    pub fn uniform(bounds: &[(F, F, usize)]) -> Result<Self, PdeError> {
        Self::new(
            bounds
                .iter()
                .map(|&(lo, hi, n)| Array1::linspace(lo, hi, n))
                .collect(),
        )
    }

    /// Number of spatial dimensions.
    pub fn n_dims(&self) -> usize {
        self.axes.len()
    }

    /// Coordinates along spatial axis `dim`.
    pub fn axis(&self, dim: usize) -> &Array1<F> {
        &self.axes[dim]
    }

    /// Coordinates of every spatial axis, in axis order.
    pub fn axes(&self) -> &[Array1<F>] {
        &self.axes
    }

    /// Number of points along each spatial axis.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Array1::len).collect()
    }

    /// Grid spacing along `dim`. Spacing is assumed uniform per axis.
    pub fn delta(&self, dim: usize) -> F {
        let axis = &self.axes[dim];
        axis[1] - axis[0]
    }
}

/// Split of a value grid's shape into batch and spatial axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    batch_rank: usize,
    shape: Vec<usize>,
}

impl GridLayout {
    /// Infers the layout of `value_grid` against `coord_grid`.
    ///
    /// The trailing axes of the value grid must match the coordinate axes
    /// one to one; whatever precedes them is batch.
    pub fn infer<F: NdFloat>(
        value_grid: &ArrayD<F>,
        coord_grid: &CoordinateGrid<F>,
    ) -> Result<Self, PdeError> {
        let n_dims = coord_grid.n_dims();
        let shape = value_grid.shape().to_vec();
        if shape.len() < n_dims {
            return Err(PdeError::Dimension(format!(
                "value grid rank {} is smaller than the number of spatial axes {n_dims}",
                shape.len()
            )));
        }
        let batch_rank = shape.len() - n_dims;
        for (dim, expected) in coord_grid.shape().into_iter().enumerate() {
            let actual = shape[batch_rank + dim];
            if actual != expected {
                return Err(PdeError::Dimension(format!(
                    "value grid has {actual} points on axis {dim}, coordinate grid has {expected}"
                )));
            }
            if actual < MIN_AXIS_POINTS {
                return Err(PdeError::Dimension(format!(
                    "axis {dim} has {actual} points, need at least {MIN_AXIS_POINTS}"
                )));
            }
        }
        Ok(Self { batch_rank, shape })
    }

    pub fn batch_rank(&self) -> usize {
        self.batch_rank
    }

    pub fn n_dims(&self) -> usize {
        self.shape.len() - self.batch_rank
    }

    /// Full grid shape, batch axes included.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Absolute array axis of spatial dimension `dim`.
    #[inline]
    pub fn spatial_axis(&self, dim: usize) -> usize {
        self.batch_rank + dim
    }

    /// Shape of the grid with both boundary layers removed on every spatial axis.
    pub fn interior_shape(&self) -> Vec<usize> {
        self.shape
            .iter()
            .enumerate()
            .map(|(ax, &n)| if ax < self.batch_rank { n } else { n - 2 })
            .collect()
    }

    /// Shape of a boundary face orthogonal to `dim`: the grid shape with that
    /// axis removed.
    pub fn face_shape(&self, dim: usize) -> Vec<usize> {
        let removed = self.spatial_axis(dim);
        self.shape
            .iter()
            .enumerate()
            .filter_map(|(ax, &n)| (ax != removed).then_some(n))
            .collect()
    }

    /// Centered interior window over the spatial axes.
    pub fn interior(&self) -> Window {
        Window::interior(self.batch_rank)
    }
}

/// Converts an axis count into the working float type.
pub(crate) fn count_as<F: NdFloat>(n: usize) -> Result<F, PdeError> {
    <F as NumCast>::from(n)
        .ok_or_else(|| PdeError::Dimension(format!("count {n} has no floating-point value")))
}
