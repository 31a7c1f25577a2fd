use log::debug;
use ndarray::{ArrayD, NdFloat};

use crate::boundary::AxisBoundaries;
use crate::coefficients::{
    AxisCoefficients, Coefficient, CoefficientFn, PdeCoefficients, SymmetricCoefficients,
};
use crate::core::PdeError;
use crate::grid::{CoordinateGrid, GridLayout, trim};
use crate::pde::params::{EquationParams, construct_equation_params};
use crate::pde::reconstruct::append_boundaries;

/// Advances an interior grid from `t1` to `t2` given the discretized
/// equation. Implementations are ADI recurrences such as Douglas or
/// Craig-Sneyd.
///
/// Closures `Fn(ArrayD<F>, &MarchingContext<'_, F>) -> Result<ArrayD<F>, PdeError>`
/// implement this directly.
pub trait TimeMarchingScheme<F> {
    fn march(
        &self,
        inner_value_grid: ArrayD<F>,
        context: &MarchingContext<'_, F>,
    ) -> Result<ArrayD<F>, PdeError>;
}

impl<F, C> TimeMarchingScheme<F> for C
where
    C: Fn(ArrayD<F>, &MarchingContext<'_, F>) -> Result<ArrayD<F>, PdeError>,
{
    fn march(
        &self,
        inner_value_grid: ArrayD<F>,
        context: &MarchingContext<'_, F>,
    ) -> Result<ArrayD<F>, PdeError> {
        self(inner_value_grid, context)
    }
}

/// What a time-marching scheme can ask of the step it runs in.
pub struct MarchingContext<'a, F> {
    stepper: &'a ParabolicStepper<F>,
    coord_grid: &'a CoordinateGrid<F>,
    layout: &'a GridLayout,
    t1: F,
    t2: F,
}

impl<F: NdFloat> MarchingContext<'_, F> {
    pub fn t1(&self) -> F {
        self.t1
    }

    pub fn t2(&self) -> F {
        self.t2
    }

    pub fn n_dims(&self) -> usize {
        self.layout.n_dims()
    }

    pub fn batch_rank(&self) -> usize {
        self.layout.batch_rank()
    }

    pub fn coord_grid(&self) -> &CoordinateGrid<F> {
        self.coord_grid
    }

    /// Discretizes the equation at `t`, which the scheme may pick anywhere in
    /// or around `[t1, t2]`.
    pub fn equation_params(&self, t: F) -> Result<EquationParams<F>, PdeError> {
        construct_equation_params(
            &self.stepper.coefficients,
            &self.stepper.boundary_conditions,
            self.coord_grid,
            self.layout,
            t,
        )
    }

    /// Reattaches boundary layers to an interior grid, evaluating the
    /// boundary conditions at `t1`.
    pub fn append_boundaries(&self, inner: &ArrayD<F>) -> Result<ArrayD<F>, PdeError> {
        append_boundaries(
            &self.stepper.boundary_conditions,
            self.coord_grid,
            self.layout,
            inner,
            self.t1,
        )
    }
}

/// One-step driver for
/// `dV/dt + Sum[a_ij d2(A_ij V)/dx_i dx_j] + Sum[b_i d(B_i V)/dx_i] + c V = 0`.
///
/// # Examples
///
/// ```
/// use ferric_adi::boundary::AxisBoundaries;
/// use ferric_adi::coefficients::{Coefficient, SymmetricCoefficients};
/// use ferric_adi::grid::CoordinateGrid;
/// use ferric_adi::pde::ParabolicStepper;
/// use ndarray::{ArrayD, IxDyn};
///
/// let stepper = ParabolicStepper::new(vec![AxisBoundaries::dirichlet(0.0)])
///     .with_second_order_coeff_fn(|_t: f64, _g: &CoordinateGrid<f64>| {
///         SymmetricCoefficients::diagonal(vec![Coefficient::scalar(1.0)])
///     });
/// let coords = CoordinateGrid::uniform(&[(0.0, 1.0, 11)]).unwrap();
/// let values = ArrayD::<f64>::zeros(IxDyn(&[11]));
/// let params = stepper.equation_params(0.0, &coords, &values).unwrap();
/// assert_eq!(params.operator(0).unwrap().shape(), &[9]);
/// ```
pub struct ParabolicStepper<F> {
    boundary_conditions: Vec<AxisBoundaries<F>>,
    coefficients: PdeCoefficients<F>,
}

impl<F: NdFloat> ParabolicStepper<F> {
    /// Stepper with one boundary pair per spatial axis and no equation terms.
    pub fn new(boundary_conditions: Vec<AxisBoundaries<F>>) -> Self {
        Self {
            boundary_conditions,
            coefficients: PdeCoefficients::default(),
        }
    }

    pub fn with_second_order_coeff_fn<C>(mut self, coeff_fn: C) -> Self
    where
        C: CoefficientFn<F, SymmetricCoefficients<F>> + Send + Sync + 'static,
    {
        self.coefficients.second_order = Box::new(coeff_fn);
        self
    }

    pub fn with_first_order_coeff_fn<C>(mut self, coeff_fn: C) -> Self
    where
        C: CoefficientFn<F, AxisCoefficients<F>> + Send + Sync + 'static,
    {
        self.coefficients.first_order = Box::new(coeff_fn);
        self
    }

    pub fn with_zeroth_order_coeff_fn<C>(mut self, coeff_fn: C) -> Self
    where
        C: CoefficientFn<F, Coefficient<F>> + Send + Sync + 'static,
    {
        self.coefficients.zeroth_order = Box::new(coeff_fn);
        self
    }

    pub fn with_inner_second_order_coeff_fn<C>(mut self, coeff_fn: C) -> Self
    where
        C: CoefficientFn<F, SymmetricCoefficients<F>> + Send + Sync + 'static,
    {
        self.coefficients.inner_second_order = Box::new(coeff_fn);
        self
    }

    pub fn with_inner_first_order_coeff_fn<C>(mut self, coeff_fn: C) -> Self
    where
        C: CoefficientFn<F, AxisCoefficients<F>> + Send + Sync + 'static,
    {
        self.coefficients.inner_first_order = Box::new(coeff_fn);
        self
    }

    /// Replaces all coefficient functions at once.
    pub fn with_coefficients(mut self, coefficients: PdeCoefficients<F>) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Boundary condition pairs, one per spatial axis.
    pub fn boundary_conditions(&self) -> &[AxisBoundaries<F>] {
        &self.boundary_conditions
    }

    /// Discretized equation at `t` for grids shaped like `value_grid`.
    pub fn equation_params(
        &self,
        t: F,
        coord_grid: &CoordinateGrid<F>,
        value_grid: &ArrayD<F>,
    ) -> Result<EquationParams<F>, PdeError> {
        let layout = self.layout(coord_grid, value_grid)?;
        construct_equation_params(
            &self.coefficients,
            &self.boundary_conditions,
            coord_grid,
            &layout,
            t,
        )
    }

    /// Advances `value_grid` from `time` to `next_time`.
    ///
    /// The scheme receives the interior of the grid and returns its updated
    /// interior; boundary layers of the result are then restored from the
    /// boundary conditions at `next_time`. The coordinate grid is returned
    /// unchanged.
    pub fn step<S>(
        &self,
        time: F,
        next_time: F,
        coord_grid: CoordinateGrid<F>,
        value_grid: &ArrayD<F>,
        scheme: &S,
    ) -> Result<(CoordinateGrid<F>, ArrayD<F>), PdeError>
    where
        S: TimeMarchingScheme<F> + ?Sized,
    {
        let layout = self.layout(&coord_grid, value_grid)?;
        debug!(
            "parabolic step {time} -> {next_time}: grid {:?}, batch rank {}, {} spatial axes",
            layout.shape(),
            layout.batch_rank(),
            layout.n_dims()
        );

        let inner = trim(value_grid, layout.batch_rank())?.to_owned();
        let context = MarchingContext {
            stepper: self,
            coord_grid: &coord_grid,
            layout: &layout,
            t1: time,
            t2: next_time,
        };
        let marched = scheme.march(inner, &context)?;
        let next_grid = append_boundaries(
            &self.boundary_conditions,
            &coord_grid,
            &layout,
            &marched,
            next_time,
        )?;
        Ok((coord_grid, next_grid))
    }

    fn layout(
        &self,
        coord_grid: &CoordinateGrid<F>,
        value_grid: &ArrayD<F>,
    ) -> Result<GridLayout, PdeError> {
        let layout = GridLayout::infer(value_grid, coord_grid)?;
        if self.boundary_conditions.len() != layout.n_dims() {
            return Err(PdeError::Dimension(format!(
                "{} boundary condition pairs supplied for {} spatial axes",
                self.boundary_conditions.len(),
                layout.n_dims()
            )));
        }
        Ok(layout)
    }
}

impl<F> std::fmt::Debug for ParabolicStepper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParabolicStepper")
            .field("axes", &self.boundary_conditions.len())
            .finish_non_exhaustive()
    }
}

impl<F> std::fmt::Debug for MarchingContext<'_, F>
where
    F: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarchingContext")
            .field("t1", &self.t1)
            .field("t2", &self.t2)
            .field("layout", self.layout)
            .finish_non_exhaustive()
    }
}
