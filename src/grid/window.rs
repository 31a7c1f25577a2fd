//! Trimming and shifting windows over grid arrays.
//!
//! Every stencil in the discretization reads the grid through a [`Window`]:
//! the interior `[1..n-1]` along each spatial axis, optionally moved one step
//! down (`[0..n-2]`) or up (`[2..n]`) along selected axes. Batch axes (those
//! before `from_axis`) are never trimmed.

use ndarray::{ArrayBase, ArrayViewD, Axis, Data, IxDyn, Slice};

use crate::core::{Face, PdeError, Shift};

/// Interior window with optional per-axis shifts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Window {
    from_axis: usize,
    shifts: Vec<(usize, Shift)>,
}

impl Window {
    /// Centered interior window trimming every axis at or after `from_axis`.
    pub fn interior(from_axis: usize) -> Self {
        Self {
            from_axis,
            shifts: Vec::new(),
        }
    }

    /// Shifts the window along spatial axis `dim`, counted from `from_axis`.
    pub fn shift(mut self, dim: usize, shift: Shift) -> Self {
        self.shifts.retain(|&(d, _)| d != dim);
        if shift != Shift::Center {
            self.shifts.push((dim, shift));
        }
        self
    }

    /// First axis the window trims; axes before it are batch axes.
    pub fn from_axis(&self) -> usize {
        self.from_axis
    }

    /// Shift applied along spatial axis `dim`.
    pub fn shift_of(&self, dim: usize) -> Shift {
        self.shifts
            .iter()
            .find_map(|&(d, s)| (d == dim).then_some(s))
            .unwrap_or_default()
    }

    /// Applies the window, returning a view of shape `[.., n_k - 2, ..]` on
    /// every trimmed axis.
    pub fn view<'a, F, S>(
        &self,
        array: &'a ArrayBase<S, IxDyn>,
    ) -> Result<ArrayViewD<'a, F>, PdeError>
    where
        S: Data<Elem = F>,
    {
        let rank = array.ndim();
        if self.from_axis > rank {
            return Err(PdeError::Dimension(format!(
                "cannot trim from axis {} of a rank-{rank} array",
                self.from_axis
            )));
        }
        if let Some(&(dim, _)) = self
            .shifts
            .iter()
            .find(|&&(dim, _)| self.from_axis + dim >= rank)
        {
            return Err(PdeError::Dimension(format!(
                "shift on spatial axis {dim} is outside a rank-{rank} array trimmed from axis {}",
                self.from_axis
            )));
        }
        if let Some(ax) = (self.from_axis..rank).find(|&ax| array.len_of(Axis(ax)) < 2) {
            return Err(PdeError::Dimension(format!(
                "axis {ax} has {} points, too few to trim boundary layers",
                array.len_of(Axis(ax))
            )));
        }

        Ok(array.slice_each_axis(|desc| {
            let ax = desc.axis.index();
            if ax < self.from_axis {
                return Slice::from(..);
            }
            let start = self.shift_of(ax - self.from_axis).start();
            Slice::from(start..start + desc.len - 2)
        }))
    }
}

/// Centered interior of `array`, trimming every axis at or after `from_axis`.
pub fn trim<F, S>(
    array: &ArrayBase<S, IxDyn>,
    from_axis: usize,
) -> Result<ArrayViewD<'_, F>, PdeError>
where
    S: Data<Elem = F>,
{
    Window::interior(from_axis).view(array)
}

/// Slice selecting the 1-thick layer `depth` steps in from `face` along an
/// axis of length `len`. Depths past the far face clamp to it.
pub fn layer_slice(len: usize, face: Face, depth: usize) -> Slice {
    let depth = depth.min(len.saturating_sub(1));
    let index = match face {
        Face::Lower => depth,
        Face::Upper => len.saturating_sub(1) - depth,
    };
    Slice::from(index..index + 1)
}

/// 1-thick layer of `array` at `depth` from `face` along `axis`.
pub fn face_layer<F, S>(
    array: &ArrayBase<S, IxDyn>,
    axis: usize,
    face: Face,
    depth: usize,
) -> Result<ArrayViewD<'_, F>, PdeError>
where
    S: Data<Elem = F>,
{
    if axis >= array.ndim() {
        return Err(PdeError::Dimension(format!(
            "axis {axis} out of range for a rank-{} array",
            array.ndim()
        )));
    }
    let len = array.len_of(Axis(axis));
    if len == 0 {
        return Err(PdeError::Dimension(format!("axis {axis} is empty")));
    }
    Ok(array.slice_axis(Axis(axis), layer_slice(len, face, depth)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, ArrayD, array};

    fn ramp(shape: &[usize]) -> ArrayD<f64> {
        let n: usize = shape.iter().product();
        Array::from_iter((0..n).map(|v| v as f64))
            .into_shape_with_order(IxDyn(shape))
            .unwrap()
    }

    #[test]
    fn centered_window_drops_boundary_layers() {
        let a = ramp(&[5]);
        assert_eq!(Window::interior(0).from_axis(), 0);
        let v = trim(&a, 0).unwrap();
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn shifted_windows_select_neighbours() {
        let a = ramp(&[5]);
        let down = Window::interior(0).shift(0, Shift::Down).view(&a).unwrap();
        let up = Window::interior(0).shift(0, Shift::Up).view(&a).unwrap();
        assert_eq!(down.iter().copied().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
        assert_eq!(up.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn two_axis_shift_reads_diagonal_neighbour() {
        // a[i, j] = 10 * i + j
        let a = array![
            [0.0, 1.0, 2.0, 3.0],
            [10.0, 11.0, 12.0, 13.0],
            [20.0, 21.0, 22.0, 23.0],
            [30.0, 31.0, 32.0, 33.0]
        ]
        .into_dyn();
        let center = trim(&a, 0).unwrap();
        let pm = Window::interior(0)
            .shift(0, Shift::Up)
            .shift(1, Shift::Down)
            .view(&a)
            .unwrap();
        for (&c, &n) in center.iter().zip(pm.iter()) {
            assert_eq!(n, c + 10.0 - 1.0);
        }
        assert_eq!(pm.shape(), &[2, 2]);
    }

    #[test]
    fn batch_axes_are_left_intact() {
        let a = ramp(&[2, 5, 4]);
        let v = Window::interior(1).shift(1, Shift::Up).view(&a).unwrap();
        assert_eq!(v.shape(), &[2, 3, 2]);
        // First batch, first interior row, upper neighbour along the last axis.
        assert_eq!(v[IxDyn(&[0, 0, 0])], a[IxDyn(&[0, 1, 2])]);
        assert_eq!(v[IxDyn(&[1, 2, 1])], a[IxDyn(&[1, 3, 3])]);
    }

    #[test]
    fn reshifting_an_axis_replaces_the_previous_shift() {
        let w = Window::interior(0)
            .shift(0, Shift::Up)
            .shift(0, Shift::Down);
        assert_eq!(w.shift_of(0), Shift::Down);
        assert_eq!(w, Window::interior(0).shift(0, Shift::Down));
        assert_eq!(Window::interior(0).shift(1, Shift::Center), Window::interior(0));
    }

    #[test]
    fn too_short_axis_is_a_dimension_error() {
        let a = ramp(&[3, 1]);
        assert!(matches!(trim(&a, 0), Err(PdeError::Dimension(_))));
        // Batch axes may be arbitrarily short.
        assert_eq!(trim(&a, 2).unwrap().shape(), &[3, 1]);
    }

    #[test]
    fn shift_outside_rank_is_rejected() {
        let a = ramp(&[4, 4]);
        let err = Window::interior(1).shift(1, Shift::Up).view(&a).unwrap_err();
        assert!(matches!(err, PdeError::Dimension(_)));
    }

    fn layer(a: &ArrayD<f64>, axis: usize, face: Face, depth: usize) -> Vec<f64> {
        face_layer(a, axis, face, depth).unwrap().iter().copied().collect()
    }

    #[test]
    fn face_layers_count_inward() {
        let a = ramp(&[2, 5]);
        assert_eq!(layer(&a, 1, Face::Lower, 0), vec![0.0, 5.0]);
        assert_eq!(layer(&a, 1, Face::Lower, 1), vec![1.0, 6.0]);
        assert_eq!(layer(&a, 1, Face::Upper, 0), vec![4.0, 9.0]);
        assert_eq!(layer(&a, 1, Face::Upper, 1), vec![3.0, 8.0]);
        assert_eq!(face_layer(&a, 1, Face::Upper, 1).unwrap().shape(), &[2, 1]);
    }

    #[test]
    fn layer_depth_clamps_on_single_point_axis() {
        let a = ramp(&[1]);
        assert_eq!(layer(&a, 0, Face::Lower, 1), vec![0.0]);
        assert_eq!(layer(&a, 0, Face::Upper, 1), vec![0.0]);
    }
}
