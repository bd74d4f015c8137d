//! Implements the B-spline curve.
//!
//! A B-spline curve of degree `p` is defined by
//!
//! ```text
//! S(u) = Σ_i c_i B_{i,p}(u)
//! ```
//!
//! with the
//! - parameter `u` inside the domain `[t_p, t_{m-p-1}]` of the padded knots,
//! - [knot vector][knots] `t` padded according to the [boundary condition][BoundaryCondition],
//! - [basis functions][basis] `B_{i,p}` defined by the knots, and
//! - scalar [control points][points] `c_i`.
//!
//! Parameters outside of the domain are handled by the [extrapolation policy][Extrapolation].

use std::fmt;

use thiserror::Error;

use crate::{
    curve::{
        knots::{
            extrapolation::{Extrapolation, Extrapolator},
            finder::Finder,
            Data, KnotError, Knots,
        },
        points::{fit::FitError, ControlPoints, PointsError},
    },
    types::VecD,
};

pub mod basis;
pub mod generation;
pub mod knots;
pub mod points;

/// How the curve continues beyond the first and last knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCondition {
    /// The knots are used as given, the domain is `[t_p, t_{m-p-1}]`.
    Open,
    /// The end knots are repeated `p` times, so the curve starts and ends at the first and last control point.
    Clamped,
    /// The knots and the first `p` control points wrap around, the curve is closed and `p - 1` times
    /// continuously differentiable across the period.
    Periodic,
}

impl BoundaryCondition {
    /// The number of raw control points required for `m` raw knots and degree `p`.
    pub fn expected_points(&self, m: usize, p: usize) -> usize {
        match self {
            BoundaryCondition::Open => m.saturating_sub(p + 1),
            BoundaryCondition::Clamped => m + p - 1,
            BoundaryCondition::Periodic => m - 1,
        }
    }

    pub fn formula(&self) -> &'static str {
        match self {
            BoundaryCondition::Open => "m - p - 1",
            BoundaryCondition::Clamped => "m + p - 1",
            BoundaryCondition::Periodic => "m - 1",
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Open => write!(f, "open"),
            BoundaryCondition::Clamped => write!(f, "clamped"),
            BoundaryCondition::Periodic => write!(f, "periodic"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CurveError {
    #[error("Parameter `u = {u}` lies outside the interval `[{lower_bound}, {upper_bound})`.")]
    ParameterOutOfBounds { u: f64, lower_bound: f64, upper_bound: f64 },

    #[error(
        "A curve with {boundary} boundary condition requires `n = {formula} = {expected}` control points, \
        but {found} were given."
    )]
    ControlPointCountMismatch { boundary: BoundaryCondition, formula: &'static str, expected: usize, found: usize },

    #[error(transparent)]
    Knots(#[from] KnotError),

    #[error(transparent)]
    Points(#[from] PointsError),

    #[error(transparent)]
    Fit(#[from] FitError),
}

/// A one-dimensional B-spline curve.
///
/// Evaluation only borrows the curve, so a shared `&Curve` can be evaluated from many threads.
/// [`Curve::fit`] requires exclusive access.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    knots: Knots,
    points: ControlPoints,
    extrapolator: Extrapolator,
    finder: Finder,
}

impl Curve {
    /// Returns a B-spline curve.
    ///
    /// # Arguments
    ///
    /// * `knots` - The raw knots, padded according to `boundary`
    /// * `points` - The raw control points, see [`BoundaryCondition::expected_points`] for their number
    /// * `degree` - The degree `p > 0` of the spline
    /// * `boundary` - The boundary condition
    /// * `extrapolation` - The policy for parameters outside of the domain
    ///
    /// # Examples
    /// ```
    /// use approx::assert_relative_eq;
    /// use nalgebra::dvector;
    /// use bsplinex::curve::{knots::{extrapolation::Extrapolation, Data}, BoundaryCondition, Curve};
    ///
    /// let knots = Data::explicit(dvector![0.1, 1.3, 2.2, 2.2, 4.9, 6.3, 6.3, 6.3, 13.2]).unwrap();
    /// let points = dvector![0.1, 1.3, 2.2, 4.9, 13.2];
    /// let curve = Curve::new(knots, points, 3, BoundaryCondition::Open, Extrapolation::None).unwrap();
    ///
    /// assert_eq!(curve.domain(), (2.2, 6.3));
    /// assert_relative_eq!(curve.evaluate(2.2).unwrap(), 0.4, max_relative = 1e-9);
    /// assert!(curve.evaluate(7.0).is_err());
    /// ```
    pub fn new(
        knots: Data,
        points: VecD,
        degree: usize,
        boundary: BoundaryCondition,
        extrapolation: Extrapolation,
    ) -> Result<Self, CurveError> {
        let m = knots.len();
        let knots = Knots::new(knots, degree, boundary)?;

        let expected = boundary.expected_points(m, degree);
        if points.len() != expected {
            return Err(CurveError::ControlPointCountMismatch {
                boundary,
                formula: boundary.formula(),
                expected,
                found: points.len(),
            });
        }
        let points = ControlPoints::new(points, degree, boundary);

        let extrapolator = Extrapolator::new(extrapolation, knots.domain());
        let finder = Finder::new(&knots);

        log::debug!(
            "Created {boundary} curve of degree {degree} with {m} knots, {} control points, \
            {extrapolation} extrapolation and {:?} span search",
            points.len(),
            finder.method()
        );

        Ok(Curve { knots, points, extrapolator, finder })
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    /// Returns the domain `[t_p, t_{m-p-1}]`.
    pub fn domain(&self) -> (f64, f64) {
        self.knots.domain()
    }

    pub fn knots(&self) -> &Knots {
        &self.knots
    }

    pub fn points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn boundary_condition(&self) -> BoundaryCondition {
        self.knots.boundary_condition()
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolator.method()
    }

    /// Evaluates the curve at `u` using De Boor's algorithm.
    pub fn evaluate(&self, u: f64) -> Result<f64, CurveError> {
        let (k, u) = self.find(u)?;
        Ok(basis::de_boor(&self.knots, &self.points, k, u))
    }

    /// Evaluates all basis functions at `u`, one per padded control point.
    pub fn basis(&self, u: f64) -> Result<VecD, CurveError> {
        let (k, u) = self.find(u)?;
        Ok(basis::basis(&self.knots, k, u))
    }

    /// Returns the knot span index and the parameter mapped into the domain.
    fn find(&self, u: f64) -> Result<(usize, f64), CurveError> {
        let u = if self.extrapolator.contains(u) {
            u
        } else {
            let v = self.extrapolator.extrapolate(u)?;
            log::trace!("Extrapolated `u = {u}` to `{v}`");
            v
        };

        let k = self.finder.find(&self.knots, u)?;
        log::trace!("Parameter `u = {u}` lies in knot span {k}");
        Ok((k, u))
    }

    /// Replaces the control points by the least-squares fit to the samples `(x_i, y_i)`.
    ///
    /// On error the curve is left unchanged.
    ///
    /// # Examples
    /// ```
    /// use approx::assert_relative_eq;
    /// use bsplinex::curve::generation::clamped_uniform;
    ///
    /// let mut curve = clamped_uniform(2, 0.0, 1.0, 5, None).unwrap();
    /// let x: Vec<f64> = (0..20).map(|i| i as f64 / 20.0).collect();
    /// let y: Vec<f64> = x.iter().map(|x| 3.0 * x - 1.0).collect();
    ///
    /// curve.fit(&x, &y).unwrap();
    /// assert_relative_eq!(curve.evaluate(0.5).unwrap(), 0.5, epsilon = 1e-10);
    /// ```
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<&mut Self, CurveError> {
        let c = points::fit::fit(self, x, y)?;
        self.points.set_data(c)?;
        log::debug!("Fitted {} control points to {} samples", self.points.len(), x.len());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dvector;
    use rstest::{fixture, rstest};

    use super::*;

    const X: [f64; 41] = [
        2.2, 2.3000000000000003, 2.4000000000000004, 2.5000000000000004, 2.6000000000000005, 2.7000000000000006,
        2.8000000000000007, 2.900000000000001, 3.000000000000001, 3.100000000000001, 3.200000000000001,
        3.300000000000001, 3.4000000000000012, 3.5000000000000013, 3.6000000000000014, 3.7000000000000015,
        3.8000000000000016, 3.9000000000000017, 4.000000000000002, 4.100000000000001, 4.200000000000002,
        4.3000000000000025, 4.400000000000002, 4.500000000000002, 4.600000000000002, 4.700000000000003,
        4.8000000000000025, 4.900000000000002, 5.000000000000003, 5.100000000000003, 5.200000000000003,
        5.3000000000000025, 5.400000000000003, 5.5000000000000036, 5.600000000000003, 5.700000000000003,
        5.800000000000003, 5.900000000000004, 6.0000000000000036, 6.100000000000003, 6.200000000000004,
    ];

    // scipy.interpolate.BSpline reference
    const Y: [f64; 41] = [
        0.4, 0.4987905929445725, 0.5953834608104188, 0.6901102371457323, 0.7833025554987059, 0.8752920494175335,
        0.9664103524504085, 1.0569890981455239, 1.1473599200510731, 1.2378544517152497, 1.3288043266862466,
        1.420541178512258, 1.5133966407414765, 1.6077023469220952, 1.7037899306023085, 1.8019910253303089,
        1.9026372646542904, 2.0060602821224456, 2.112591711282968, 2.2225631856840518, 2.3363063388738903,
        2.4541528044006755, 2.5764342158126015, 2.7034822066578617, 2.83562841048465, 2.9732044608411603,
        3.1165419912755823, 3.2659726353361123, 3.4243850625148546, 3.604896086079547, 3.8231795552418366,
        4.094909319213373, 4.435759227205808, 4.861403128430789, 5.387514872099959, 6.029768307424969,
        6.8038372836174785, 7.725395649889126, 8.810117255451555, 10.073675949516419, 11.53174558129538,
    ];

    fn golden_knots() -> Data {
        Data::explicit(dvector![0.1, 1.3, 2.2, 2.2, 4.9, 6.3, 6.3, 6.3, 13.2]).unwrap()
    }

    fn golden_points() -> VecD {
        dvector![0.1, 1.3, 2.2, 4.9, 13.2]
    }

    #[fixture]
    fn golden() -> Curve {
        Curve::new(golden_knots(), golden_points(), 3, BoundaryCondition::Open, Extrapolation::None).unwrap()
    }

    #[fixture]
    fn periodic() -> Curve {
        let knots = Data::uniform_count(0.0, 10.0, 11).unwrap();
        let points = dvector![0.3, -1.2, 2.5, 0.8, 1.9, -0.4, 3.1, 0.0, 1.4, -2.2];
        Curve::new(knots, points, 3, BoundaryCondition::Periodic, Extrapolation::Periodic).unwrap()
    }

    fn samples(curve: &Curve, count: usize) -> (Vec<f64>, Vec<f64>) {
        let (lower, upper) = curve.domain();
        let x: Vec<f64> = (0..count).map(|i| lower + (upper - lower) * i as f64 / count as f64).collect();
        let y = x.iter().map(|&u| curve.evaluate(u).unwrap()).collect();
        (x, y)
    }

    #[rstest]
    fn evaluate_golden(golden: Curve) {
        for (x, y) in X.iter().zip(Y.iter()) {
            assert_relative_eq!(golden.evaluate(*x).unwrap(), *y, max_relative = 1e-9);
        }
        assert_relative_eq!(golden.evaluate(3.4000000000000012).unwrap(), 1.5133966407414765, max_relative = 1e-9);
    }

    #[rstest]
    fn evaluate_uniform_knots_like_explicit_knots() {
        let uniform = Data::uniform_count(-1.0, 2.0, 13).unwrap();
        let explicit = Data::explicit(VecD::from_fn(13, |i, _| -1.0 + i as f64 * 0.25)).unwrap();
        let points = VecD::from_fn(15, |i, _| (i as f64).sqrt());

        let a = Curve::new(uniform, points.clone(), 3, BoundaryCondition::Clamped, Extrapolation::None).unwrap();
        let b = Curve::new(explicit, points, 3, BoundaryCondition::Clamped, Extrapolation::None).unwrap();
        for i in 0..=120 {
            let u = -1.0 + 3.0 * i as f64 / 121.0;
            assert_relative_eq!(a.evaluate(u).unwrap(), b.evaluate(u).unwrap(), epsilon = 1e-12);
        }
    }

    #[rstest]
    fn clamped_interpolates_end_points() {
        let knots = Data::explicit(dvector![0.1, 1.3, 2.2, 4.9, 13.2]).unwrap();
        let points = dvector![0.5, 1.3, 2.2, 4.9, 13.2, -1.0, 7.0];
        let curve = Curve::new(knots, points, 3, BoundaryCondition::Clamped, Extrapolation::Constant).unwrap();

        assert_relative_eq!(curve.evaluate(0.1).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(curve.evaluate(13.2).unwrap(), 7.0, epsilon = 1e-12);
    }

    #[rstest]
    fn partition_of_unity(golden: Curve) {
        for x in X {
            let row = golden.basis(x).unwrap();
            assert_eq!(row.len(), 5);
            assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(row.dot(golden.points().data()), golden.evaluate(x).unwrap(), epsilon = 1e-12);
        }
    }

    #[rstest]
    fn right_boundary_is_rejected_without_extrapolation(golden: Curve) {
        assert_relative_eq!(golden.evaluate(2.2).unwrap(), 0.4, max_relative = 1e-9);
        assert_eq!(
            golden.evaluate(6.3),
            Err(CurveError::ParameterOutOfBounds { u: 6.3, lower_bound: 2.2, upper_bound: 6.3 })
        );
        assert!(golden.evaluate(2.1).is_err());
        assert!(golden.basis(6.3).is_err());
    }

    #[rstest]
    fn right_boundary_is_clamped_with_constant_extrapolation() {
        let curve = Curve::new(golden_knots(), golden_points(), 3, BoundaryCondition::Open, Extrapolation::Constant)
            .unwrap();
        let right = curve.evaluate(6.3).unwrap();

        assert_relative_eq!(right, curve.evaluate(6.3 - 1e-9).unwrap(), epsilon = 1e-6);
        assert_eq!(curve.evaluate(100.0), Ok(right));
        assert_eq!(curve.evaluate(-100.0), curve.evaluate(2.2));
    }

    #[rstest]
    fn right_boundary_wraps_with_periodic_extrapolation() {
        let curve = Curve::new(golden_knots(), golden_points(), 3, BoundaryCondition::Open, Extrapolation::Periodic)
            .unwrap();

        assert_eq!(curve.evaluate(6.3), curve.evaluate(2.2));
        assert_relative_eq!(curve.evaluate(6.3 + 1.0).unwrap(), curve.evaluate(3.2).unwrap(), epsilon = 1e-9);
    }

    #[rstest]
    fn periodic_invariance(periodic: Curve) {
        let (lower, upper) = periodic.domain();
        let period = upper - lower;

        for i in 0..100 {
            let u = lower + period * i as f64 / 100.0;
            let value = periodic.evaluate(u).unwrap();
            for n in [-3.0, -1.0, 1.0, 2.0, 7.0] {
                assert_relative_eq!(periodic.evaluate(u + n * period).unwrap(), value, epsilon = 1e-9);
            }
        }
    }

    #[rstest]
    fn periodic_is_closed(periodic: Curve) {
        let (lower, upper) = periodic.domain();
        let left = periodic.evaluate(lower).unwrap();
        assert_relative_eq!(periodic.evaluate(upper - 1e-10).unwrap(), left, epsilon = 1e-8);
    }

    #[rstest]
    fn fit_open(golden: Curve) {
        let (x, y) = samples(&golden, 200);
        let mut curve =
            Curve::new(golden_knots(), VecD::zeros(5), 3, BoundaryCondition::Open, Extrapolation::None).unwrap();

        curve.fit(&x, &y).unwrap();
        assert_relative_eq!(curve.points().data(), golden.points().data(), epsilon = 1e-6);
    }

    #[test]
    fn fit_clamped() {
        let knots = Data::explicit(dvector![0.1, 1.3, 2.2, 4.9, 13.2]).unwrap();
        let points = dvector![0.1, 1.3, 2.2, 4.9, 13.2, 1.3, 2.2];
        let original =
            Curve::new(knots.clone(), points.clone(), 3, BoundaryCondition::Clamped, Extrapolation::None).unwrap();
        let (x, y) = samples(&original, 150);

        let mut curve = Curve::new(knots, VecD::zeros(7), 3, BoundaryCondition::Clamped, Extrapolation::None).unwrap();
        curve.fit(&x, &y).unwrap();
        assert_relative_eq!(curve.points().data(), &points, epsilon = 1e-8);
    }

    #[rstest]
    fn fit_periodic(periodic: Curve) {
        let (x, y) = samples(&periodic, 100);
        let knots = Data::uniform_count(0.0, 10.0, 11).unwrap();
        let mut curve =
            Curve::new(knots, VecD::zeros(10), 3, BoundaryCondition::Periodic, Extrapolation::Periodic).unwrap();

        curve.fit(&x, &y).unwrap();
        assert_relative_eq!(curve.points().data(), periodic.points().data(), epsilon = 1e-8);
        assert_relative_eq!(curve.points().vector(), periodic.points().vector(), epsilon = 1e-8);
        for u in [-3.0, 0.0, 4.4, 9.99, 12.5] {
            assert_relative_eq!(curve.evaluate(u).unwrap(), periodic.evaluate(u).unwrap(), epsilon = 1e-8);
        }
    }

    #[test]
    fn underdetermined_periodic_fit_interpolates() {
        let x = [2.3, 3.4, 4.5, 5.6, 6.7, 7.8, 8.9];
        let y = [11.2, 22.3, 13.4, 14.5, 25.6, 36.7, 17.8];
        let mut curve = generation::periodic_uniform(3, 0.1, 12.0, 12, None).unwrap();

        curve.fit(&x, &y).unwrap();
        for (x, y) in x.iter().zip(y.iter()) {
            assert_relative_eq!(curve.evaluate(*x).unwrap(), *y, max_relative = 1e-8);
        }
        let shifted = curve.evaluate(-10.5 + 2.0 * 11.9).unwrap();
        assert_relative_eq!(curve.evaluate(-10.5).unwrap(), shifted, epsilon = 1e-8);
    }

    #[rstest]
    fn failed_fit_leaves_curve_unchanged(golden: Curve) {
        let mut curve = golden.clone();
        let (x, mut y) = samples(&golden, 50);
        y[7] = f64::NAN;

        assert!(matches!(curve.fit(&x, &y), Err(CurveError::Fit(FitError::SolveFailed { .. }))));
        assert_eq!(curve, golden);

        assert_eq!(curve.fit(&x, &y[..10]), Err(CurveError::Fit(FitError::LengthMismatch { x: 50, y: 10 })));
        assert_eq!(curve, golden);
    }

    #[rstest(
        boundary,
        count,
        expected,
        formula,
        case(BoundaryCondition::Open, 4, 5, "m - p - 1"),
        case(BoundaryCondition::Clamped, 5, 11, "m + p - 1"),
        case(BoundaryCondition::Periodic, 5, 8, "m - 1")
    )]
    fn control_point_count_mismatch(boundary: BoundaryCondition, count: usize, expected: usize, formula: &'static str) {
        assert_eq!(
            Curve::new(golden_knots(), VecD::zeros(count), 3, boundary, Extrapolation::None),
            Err(CurveError::ControlPointCountMismatch { boundary, formula, expected, found: count })
        );
    }

    #[test]
    fn control_point_count_mismatch_message() {
        let error = Curve::new(golden_knots(), VecD::zeros(4), 3, BoundaryCondition::Open, Extrapolation::None)
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "A curve with open boundary condition requires `n = m - p - 1 = 5` control points, but 4 were given."
        );
    }

    #[test]
    fn knot_errors_are_forwarded() {
        assert_eq!(
            Curve::new(golden_knots(), golden_points(), 0, BoundaryCondition::Open, Extrapolation::None),
            Err(CurveError::Knots(KnotError::DegreeTooLow { p: 0, limit: 0 }))
        );
    }

    #[rstest]
    fn accessors(periodic: Curve) {
        assert_eq!(periodic.degree(), 3);
        assert_eq!(periodic.domain(), (0.0, 10.0));
        assert_eq!(periodic.boundary_condition(), BoundaryCondition::Periodic);
        assert_eq!(periodic.extrapolation(), Extrapolation::Periodic);
        assert_eq!(periodic.knots().size(), 17);
        assert_eq!(periodic.points().size(), 13);
    }

    #[rstest]
    fn concurrent_evaluation(golden: Curve) {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Curve>();

        let xs = X;
        std::thread::scope(|s| {
            for chunk in xs.chunks(10) {
                let curve = &golden;
                s.spawn(move || {
                    for &x in chunk {
                        let y = Y[X.iter().position(|&v| v == x).unwrap()];
                        assert_relative_eq!(curve.evaluate(x).unwrap(), y, max_relative = 1e-9);
                    }
                });
            }
        });
    }
}
