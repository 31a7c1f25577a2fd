use log::trace;
use ndarray::{ArrayD, Axis, NdFloat, concatenate};

use crate::boundary::{AxisBoundaries, RobinCondition, normalize_face};
use crate::core::{Face, PdeError};
use crate::grid::{CoordinateGrid, GridLayout, face_layer};

/// Restores the boundary layers of an interior grid.
///
/// Axes are processed in order; each pass extrapolates both faces of one
/// axis from the two nearest layers and widens the grid along it, so later
/// passes also fill the edges and corners shared with earlier axes.
/// Boundary conditions are evaluated at `t`.
pub fn append_boundaries<F: NdFloat>(
    boundary_conditions: &[AxisBoundaries<F>],
    coord_grid: &CoordinateGrid<F>,
    layout: &GridLayout,
    inner: &ArrayD<F>,
    t: F,
) -> Result<ArrayD<F>, PdeError> {
    let expected = layout.interior_shape();
    if inner.shape() != expected.as_slice() {
        return Err(PdeError::Shape(format!(
            "interior grid has shape {:?}, expected {expected:?}",
            inner.shape()
        )));
    }
    if boundary_conditions.len() != layout.n_dims() {
        return Err(PdeError::Dimension(format!(
            "{} boundary condition pairs supplied for {} spatial axes",
            boundary_conditions.len(),
            layout.n_dims()
        )));
    }

    let mut grid = inner.clone();
    for (dim, bounds) in boundary_conditions.iter().enumerate() {
        let axis = layout.spatial_axis(dim);
        let [lower, upper] = bounds.evaluate(t, coord_grid);
        let extrapolate = |face: Face, condition: &RobinCondition<F>| {
            // Axes before `dim` are already full width in the face array.
            let rule = normalize_face(condition, layout, dim, axis)?
                .discretize(coord_grid.delta(dim))?;
            Ok::<_, PdeError>(rule.extrapolate(
                &face_layer(&grid, axis, face, 0)?,
                &face_layer(&grid, axis, face, 1)?,
            ))
        };
        let first = extrapolate(Face::Lower, &lower)?;
        let last = extrapolate(Face::Upper, &upper)?;
        grid = concatenate(Axis(axis), &[first.view(), grid.view(), last.view()])?;
        trace!("restored boundaries of axis {dim}: grid now {:?}", grid.shape());
    }
    Ok(grid)
}
