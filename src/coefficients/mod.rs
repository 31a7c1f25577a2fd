//! PDE coefficients and the functions that produce them.
//!
//! The equation handled by this crate is
//!
//! ```text
//! dV/dt + Sum[a_ij d2(A_ij V)/dx_i dx_j] + Sum[b_i d(B_i V)/dx_i] + c V = 0
//! ```
//!
//! where the outer coefficients `a_ij`, `b_i`, `c` and the inner coefficients
//! `A_ij`, `B_i` may vary in space and time. Each is optional; an absent
//! coefficient removes its term instead of multiplying it by one.

use ndarray::{ArrayD, IxDyn, NdFloat};
use serde::{Deserialize, Serialize};

use crate::core::PdeError;
use crate::grid::CoordinateGrid;

/// A single coefficient value: absent, constant, or spatially varying.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Coefficient<F> {
    /// The term is not present in the equation.
    #[default]
    Absent,
    /// Constant over the grid.
    Scalar(F),
    /// Values broadcastable to the grid shape.
    Array(ArrayD<F>),
}

impl<F: NdFloat> Coefficient<F> {
    pub fn scalar(value: F) -> Self {
        Self::Scalar(value)
    }

    pub fn array(values: ArrayD<F>) -> Self {
        Self::Array(values)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Broadcasts the coefficient to a full array of `shape`.
    ///
    /// Returns `None` for an absent coefficient and a [`PdeError::Shape`]
    /// when an array value does not broadcast.
    pub fn materialize(&self, shape: &[usize]) -> Result<Option<ArrayD<F>>, PdeError> {
        match self {
            Self::Absent => Ok(None),
            Self::Scalar(value) => Ok(Some(ArrayD::from_elem(IxDyn(shape), *value))),
            Self::Array(values) => values
                .broadcast(IxDyn(shape))
                .map(|view| Some(view.to_owned()))
                .ok_or_else(|| {
                    PdeError::Shape(format!(
                        "coefficient of shape {:?} does not broadcast to {shape:?}",
                        values.shape()
                    ))
                }),
        }
    }
}

impl<F> From<ArrayD<F>> for Coefficient<F> {
    fn from(values: ArrayD<F>) -> Self {
        Self::Array(values)
    }
}

impl<F> From<Option<F>> for Coefficient<F> {
    fn from(value: Option<F>) -> Self {
        value.map_or(Self::Absent, Self::Scalar)
    }
}

/// Symmetric matrix of second-order coefficients.
///
/// Only the upper triangle `i <= j` is stored; lookups with `i > j` read the
/// mirrored entry, so `a_ij = a_ji` holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricCoefficients<F> {
    n_dims: usize,
    upper: Vec<Coefficient<F>>,
}

impl<F: NdFloat> SymmetricCoefficients<F> {
    /// All entries absent.
    pub fn absent(n_dims: usize) -> Self {
        Self {
            n_dims,
            upper: vec![Coefficient::Absent; n_dims * (n_dims + 1) / 2],
        }
    }

    /// Diagonal entries `a_ii`; mixed entries absent.
    pub fn diagonal(values: Vec<Coefficient<F>>) -> Self {
        let mut out = Self::absent(values.len());
        for (dim, value) in values.into_iter().enumerate() {
            let slot = out.packed_index(dim, dim);
            out.upper[slot] = value;
        }
        out
    }

    /// Builds the matrix from a ragged upper triangle: row `i` holds the
    /// entries `j = i..n`.
    pub fn from_upper_rows(rows: Vec<Vec<Coefficient<F>>>) -> Result<Self, PdeError> {
        let n_dims = rows.len();
        let mut out = Self::absent(n_dims);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_dims - i {
                return Err(PdeError::Dimension(format!(
                    "upper-triangular row {i} has {} entries, expected {}",
                    row.len(),
                    n_dims - i
                )));
            }
            for (offset, value) in row.into_iter().enumerate() {
                out.set(i, i + offset, value)?;
            }
        }
        Ok(out)
    }

    /// Sets `a_ij` (and therefore `a_ji`).
    pub fn set(&mut self, i: usize, j: usize, value: Coefficient<F>) -> Result<(), PdeError> {
        self.check_indices(i, j)?;
        let slot = self.packed_index(i.min(j), i.max(j));
        self.upper[slot] = value;
        Ok(())
    }

    /// Builder form of [`SymmetricCoefficients::set`].
    pub fn with_entry(
        mut self,
        i: usize,
        j: usize,
        value: Coefficient<F>,
    ) -> Result<Self, PdeError> {
        self.set(i, j, value)?;
        Ok(self)
    }

    /// Returns `a_ij`, mirroring lookups below the diagonal.
    pub fn get(&self, i: usize, j: usize) -> Result<&Coefficient<F>, PdeError> {
        self.check_indices(i, j)?;
        Ok(&self.upper[self.packed_index(i.min(j), i.max(j))])
    }

    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    fn check_indices(&self, i: usize, j: usize) -> Result<(), PdeError> {
        if i >= self.n_dims || j >= self.n_dims {
            return Err(PdeError::Dimension(format!(
                "coefficient index ({i}, {j}) out of range for {} dimensions",
                self.n_dims
            )));
        }
        Ok(())
    }

    #[inline]
    fn packed_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i <= j);
        i * (2 * self.n_dims - i + 1) / 2 + (j - i)
    }
}

/// One optional coefficient per spatial axis (first-order terms).
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCoefficients<F> {
    values: Vec<Coefficient<F>>,
}

impl<F: NdFloat> AxisCoefficients<F> {
    pub fn new(values: Vec<Coefficient<F>>) -> Self {
        Self { values }
    }

    pub fn absent(n_dims: usize) -> Self {
        Self {
            values: vec![Coefficient::Absent; n_dims],
        }
    }

    pub fn get(&self, dim: usize) -> Result<&Coefficient<F>, PdeError> {
        self.values.get(dim).ok_or_else(|| {
            PdeError::Dimension(format!(
                "no coefficient for axis {dim}: {} axes supplied",
                self.values.len()
            ))
        })
    }

    pub fn n_dims(&self) -> usize {
        self.values.len()
    }
}

/// Capability evaluating a coefficient at time `t` over a coordinate grid.
///
/// Closures `Fn(F, &CoordinateGrid<F>) -> T` implement this directly.
pub trait CoefficientFn<F, T> {
    fn evaluate(&self, t: F, coord_grid: &CoordinateGrid<F>) -> T;
}

impl<F, T, C> CoefficientFn<F, T> for C
where
    C: Fn(F, &CoordinateGrid<F>) -> T,
{
    fn evaluate(&self, t: F, coord_grid: &CoordinateGrid<F>) -> T {
        self(t, coord_grid)
    }
}

/// Sentinel for a term that is absent from the equation at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCoefficient;

impl<F: NdFloat> CoefficientFn<F, SymmetricCoefficients<F>> for NoCoefficient {
    fn evaluate(&self, _t: F, coord_grid: &CoordinateGrid<F>) -> SymmetricCoefficients<F> {
        SymmetricCoefficients::absent(coord_grid.n_dims())
    }
}

impl<F: NdFloat> CoefficientFn<F, AxisCoefficients<F>> for NoCoefficient {
    fn evaluate(&self, _t: F, coord_grid: &CoordinateGrid<F>) -> AxisCoefficients<F> {
        AxisCoefficients::absent(coord_grid.n_dims())
    }
}

impl<F: NdFloat> CoefficientFn<F, Coefficient<F>> for NoCoefficient {
    fn evaluate(&self, _t: F, _coord_grid: &CoordinateGrid<F>) -> Coefficient<F> {
        Coefficient::Absent
    }
}

pub type SecondOrderCoeffFn<F> =
    Box<dyn CoefficientFn<F, SymmetricCoefficients<F>> + Send + Sync>;
pub type FirstOrderCoeffFn<F> = Box<dyn CoefficientFn<F, AxisCoefficients<F>> + Send + Sync>;
pub type ZerothOrderCoeffFn<F> = Box<dyn CoefficientFn<F, Coefficient<F>> + Send + Sync>;

/// The five coefficient functions of the equation, each defaulting to
/// [`NoCoefficient`].
pub struct PdeCoefficients<F> {
    pub second_order: SecondOrderCoeffFn<F>,
    pub first_order: FirstOrderCoeffFn<F>,
    pub zeroth_order: ZerothOrderCoeffFn<F>,
    pub inner_second_order: SecondOrderCoeffFn<F>,
    pub inner_first_order: FirstOrderCoeffFn<F>,
}

impl<F: NdFloat> Default for PdeCoefficients<F> {
    fn default() -> Self {
        Self {
            second_order: Box::new(NoCoefficient),
            first_order: Box::new(NoCoefficient),
            zeroth_order: Box::new(NoCoefficient),
            inner_second_order: Box::new(NoCoefficient),
            inner_first_order: Box::new(NoCoefficient),
        }
    }
}

impl<F> std::fmt::Debug for PdeCoefficients<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdeCoefficients").finish_non_exhaustive()
    }
}

/// Coefficients evaluated at one time point, checked against the spatial rank.
#[derive(Debug, Clone)]
pub(crate) struct EvaluatedCoefficients<F> {
    pub second_order: SymmetricCoefficients<F>,
    pub first_order: AxisCoefficients<F>,
    pub zeroth_order: Coefficient<F>,
    pub inner_second_order: SymmetricCoefficients<F>,
    pub inner_first_order: AxisCoefficients<F>,
}

impl<F: NdFloat> PdeCoefficients<F> {
    pub(crate) fn evaluate(
        &self,
        t: F,
        coord_grid: &CoordinateGrid<F>,
    ) -> Result<EvaluatedCoefficients<F>, PdeError> {
        let n_dims = coord_grid.n_dims();
        let out = EvaluatedCoefficients {
            second_order: self.second_order.evaluate(t, coord_grid),
            first_order: self.first_order.evaluate(t, coord_grid),
            zeroth_order: self.zeroth_order.evaluate(t, coord_grid),
            inner_second_order: self.inner_second_order.evaluate(t, coord_grid),
            inner_first_order: self.inner_first_order.evaluate(t, coord_grid),
        };
        for (name, found) in [
            ("second-order", out.second_order.n_dims()),
            ("first-order", out.first_order.n_dims()),
            ("inner second-order", out.inner_second_order.n_dims()),
            ("inner first-order", out.inner_first_order.n_dims()),
        ] {
            if found != n_dims {
                return Err(PdeError::Dimension(format!(
                    "{name} coefficients cover {found} axes, grid has {n_dims}"
                )));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    fn absent_coefficient_materializes_to_none() {
        let c = Coefficient::<f64>::Absent;
        assert!(c.materialize(&[3, 3]).unwrap().is_none());
        assert!(c.is_absent());
    }

    #[test]
    fn scalar_and_row_coefficients_broadcast_to_grid() {
        let scalar = Coefficient::scalar(2.5_f64).materialize(&[2, 3]).unwrap().unwrap();
        assert_eq!(scalar.shape(), &[2, 3]);
        assert!(scalar.iter().all(|&v| v == 2.5));

        let row = Coefficient::array(array![1.0, 2.0, 3.0].into_dyn());
        let full = row.materialize(&[2, 3]).unwrap().unwrap();
        assert_eq!(full[IxDyn(&[1, 2])], 3.0);
        assert_eq!(full[IxDyn(&[0, 0])], 1.0);
    }

    #[test]
    fn non_broadcastable_coefficient_is_a_shape_error() {
        let c = Coefficient::array(array![1.0, 2.0].into_dyn());
        assert!(matches!(c.materialize(&[3, 3]), Err(PdeError::Shape(_))));
    }

    #[test]
    fn symmetric_lookup_mirrors_upper_triangle() {
        let a = SymmetricCoefficients::<f64>::absent(3)
            .with_entry(0, 2, Coefficient::scalar(0.3))
            .unwrap()
            .with_entry(2, 1, Coefficient::scalar(0.7))
            .unwrap();
        assert_eq!(a.get(2, 0).unwrap(), &Coefficient::Scalar(0.3));
        assert_eq!(a.get(0, 2).unwrap(), &Coefficient::Scalar(0.3));
        assert_eq!(a.get(1, 2).unwrap(), &Coefficient::Scalar(0.7));
        assert!(a.get(1, 1).unwrap().is_absent());
        assert!(matches!(a.get(3, 0), Err(PdeError::Dimension(_))));
    }

    #[test]
    fn packed_storage_keeps_entries_distinct() {
        let n = 4;
        let mut a = SymmetricCoefficients::<f64>::absent(n);
        for i in 0..n {
            for j in i..n {
                a.set(i, j, Coefficient::scalar((10 * i + j) as f64)).unwrap();
            }
        }
        for i in 0..n {
            for j in 0..n {
                let expected = (10 * i.min(j) + i.max(j)) as f64;
                assert_eq!(a.get(i, j).unwrap(), &Coefficient::Scalar(expected));
            }
        }
    }

    #[test]
    fn ragged_rows_must_match_dimension() {
        let ok = SymmetricCoefficients::<f64>::from_upper_rows(vec![
            vec![Coefficient::scalar(1.0), Coefficient::scalar(0.5)],
            vec![Coefficient::scalar(2.0)],
        ])
        .unwrap();
        assert_eq!(ok.get(1, 0).unwrap(), &Coefficient::Scalar(0.5));

        let bad = SymmetricCoefficients::<f64>::from_upper_rows(vec![
            vec![Coefficient::scalar(1.0)],
            vec![Coefficient::scalar(2.0)],
        ]);
        assert!(matches!(bad, Err(PdeError::Dimension(_))));
    }

    #[test]
    fn no_coefficient_sentinel_matches_grid_rank() {
        let grid = CoordinateGrid::new(vec![
            Array1::linspace(0.0, 1.0, 3),
            Array1::linspace(0.0, 1.0, 4),
        ])
        .unwrap();
        let coeffs = PdeCoefficients::<f64>::default().evaluate(0.0, &grid).unwrap();
        assert_eq!(coeffs.second_order.n_dims(), 2);
        assert!(coeffs.first_order.get(1).unwrap().is_absent());
        assert!(coeffs.zeroth_order.is_absent());
    }

    #[test]
    fn wrongly_sized_coefficients_are_rejected() {
        let grid = CoordinateGrid::uniform(&[(0.0, 1.0, 3), (0.0, 1.0, 3)]).unwrap();
        let coeffs = PdeCoefficients::<f64> {
            first_order: Box::new(|_t: f64, _g: &CoordinateGrid<f64>| {
                AxisCoefficients::new(vec![Coefficient::scalar(1.0)])
            }),
            ..Default::default()
        };
        assert!(matches!(
            coeffs.evaluate(0.0, &grid),
            Err(PdeError::Dimension(_))
        ));
    }

    #[test]
    fn closures_act_as_coefficient_functions() {
        let grid = CoordinateGrid::uniform(&[(0.0, 2.0, 3)]).unwrap();
        let f = |t: f64, g: &CoordinateGrid<f64>| {
            Coefficient::array(g.axis(0).mapv(|x| x * t).into_dyn())
        };
        let value = CoefficientFn::<f64, Coefficient<f64>>::evaluate(&f, 2.0, &grid);
        assert_eq!(value, Coefficient::Array(array![0.0, 2.0, 4.0].into_dyn()));
    }
}
