//! Implements the knot vector defining the [spline basis functions][basis].
//!
//! The raw knots are given as [`Data`], either in closed form (`begin + i * step`) or as an explicit,
//! non-decreasing array. Depending on the [boundary condition][BoundaryCondition], `p` padding knots are added
//! on each side:
//!
//! - `Open`: no padding, the full `n + p + 1` knots have to be provided.
//! - `Clamped`: the first and last knot are repeated `p` times,
//!   `[0, 1, 2, 2.5, 3]` with `p = 3` becomes `[0, 0, 0, 0, 1, 2, 2.5, 3, 3, 3, 3]`.
//! - `Periodic`: the knot spacings wrap around with the period `t_end - t_0`,
//!   `[0, 1, 2, 2.5, 3]` with `p = 3` becomes `[-2, -1, -0.5, 0, 1, 2, 2.5, 3, 4, 5, 5.5]`.
//!
//! All indices of [`Knots`] address the padded sequence. The interval `[t_p, t_{m-p-1}]` is called 'domain'.
//!
//! [basis]: crate::curve::basis

use thiserror::Error;

use crate::{
    curve::BoundaryCondition,
    types::{VecD, VecHelpers},
};

pub mod extrapolation;
pub mod finder;

/// The largest number of knots uniform data may describe.
pub const MAX_UNIFORM_KNOTS: usize = u32::MAX as usize;

/// The raw, unpadded knots.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// Equidistant knots `begin + i * step` for `i = 0, ..., count - 1`.
    Uniform { begin: f64, step: f64, count: usize },
    /// Arbitrarily spaced, non-decreasing knots.
    Explicit(VecD),
}

#[derive(Error, Debug, PartialEq)]
pub enum KnotError {
    #[error("Parameter `u = {u}` lies outside the interval `[{lower_bound}, {upper_bound}]`.")]
    ParameterOutOfBounds { u: f64, lower_bound: f64, upper_bound: f64 },

    #[error("Degree `p = {p}` is too low and must be greater than `{limit}`")]
    DegreeTooLow { p: usize, limit: usize },

    #[error("The interval `[{begin}, {end}]` is invalid, `begin` must be less than `end`.")]
    InvalidInterval { begin: f64, end: f64 },

    #[error("The step size `{step}` must be positive and finite and distinguishable at the magnitude of the knots.")]
    InvalidStep { step: f64 },

    #[error("At least {required} knots are required, found {found}.")]
    TooFewKnots { required: usize, found: usize },

    #[error("The number of knots `{found}` exceeds the limit of {limit}.")]
    TooManyKnots { found: f64, limit: usize },

    #[error("The knot `{index}` is not finite.")]
    NonFinite { index: usize },

    #[error("Knots must be non-decreasing, but knot `{index}` = {current} is less than its predecessor {previous}.")]
    NotSorted { index: usize, previous: f64, current: f64 },

    #[error("The domain `[{lower_bound}, {upper_bound}]` is empty.")]
    EmptyDomain { lower_bound: f64, upper_bound: f64 },

    #[error(
        "The knot `u = {u}` has a multiplicity of `m = {multiplicity}`, \
        which exceeds the maximum multiplicity `p + 1 = {limit}`."
    )]
    MultiplicityTooHigh { u: f64, multiplicity: usize, limit: usize },

    #[error("Index {index} is out of bounds for {size} knots.")]
    IndexOutOfBounds { index: usize, size: usize },
}

impl Data {
    /// Equidistant knots starting at `begin` with spacing `step`.
    ///
    /// The knots cover `[begin, end]` as far as a whole number of steps fits, so the last knot
    /// is `begin + floor((end - begin) / step) * step <= end`.
    ///
    /// # Examples
    /// ```
    /// use bsplinex::curve::knots::Data;
    ///
    /// let data = Data::uniform_step(0.0, 10.0, 2.3).unwrap();
    /// assert_eq!(data.len(), 5);
    /// assert_eq!(data.at(4), Ok(4.0 * 2.3));
    /// ```
    pub fn uniform_step(begin: f64, end: f64, step: f64) -> Result<Self, KnotError> {
        check_interval(begin, end)?;
        if !(step.is_finite() && step > 0.0) {
            return Err(KnotError::InvalidStep { step });
        }

        // an infinite or NaN count fails the comparison as well
        let found = ((end - begin) / step).floor() + 1.0;
        if !(found <= MAX_UNIFORM_KNOTS as f64) {
            return Err(KnotError::TooManyKnots { found, limit: MAX_UNIFORM_KNOTS });
        }
        let count = found as usize;
        if count < 2 {
            return Err(KnotError::TooFewKnots { required: 2, found: count });
        }
        check_step(begin, end, step)?;
        Ok(Data::Uniform { begin, step, count })
    }

    /// `count` equidistant knots with the first one at `begin` and the last one at `end`.
    pub fn uniform_count(begin: f64, end: f64, count: usize) -> Result<Self, KnotError> {
        check_interval(begin, end)?;
        if count < 2 {
            return Err(KnotError::TooFewKnots { required: 2, found: count });
        }
        if count > MAX_UNIFORM_KNOTS {
            return Err(KnotError::TooManyKnots { found: count as f64, limit: MAX_UNIFORM_KNOTS });
        }

        let step = (end - begin) / (count - 1) as f64;
        check_step(begin, end, step)?;
        Ok(Data::Uniform { begin, step, count })
    }

    /// Arbitrarily spaced knots which must be finite and non-decreasing.
    pub fn explicit(values: VecD) -> Result<Self, KnotError> {
        if values.len() < 2 {
            return Err(KnotError::TooFewKnots { required: 2, found: values.len() });
        }
        if let Some(index) = values.iter().position(|u| !u.is_finite()) {
            return Err(KnotError::NonFinite { index });
        }
        if let Some(index) = (1..values.len()).find(|&i| values[i] < values[i - 1]) {
            return Err(KnotError::NotSorted { index, previous: values[index - 1], current: values[index] });
        }
        Ok(Data::Explicit(values))
    }

    pub fn len(&self) -> usize {
        match self {
            Data::Uniform { count, .. } => *count,
            Data::Explicit(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, Data::Uniform { .. })
    }

    /// The knot spacing of uniform data.
    pub fn step(&self) -> Option<f64> {
        match self {
            Data::Uniform { step, .. } => Some(*step),
            Data::Explicit(_) => None,
        }
    }

    pub fn at(&self, index: usize) -> Result<f64, KnotError> {
        if index >= self.len() {
            return Err(KnotError::IndexOutOfBounds { index, size: self.len() });
        }
        Ok(self.get(index))
    }

    pub fn first(&self) -> f64 {
        self.get(0)
    }

    pub fn last(&self) -> f64 {
        self.get(self.len() - 1)
    }

    /// Returns the knots `first..last`.
    pub fn slice(&self, first: usize, last: usize) -> VecD {
        match self {
            Data::Uniform { .. } => VecD::from_iterator(last - first, (first..last).map(|i| self.get(i))),
            Data::Explicit(values) => values.segment(first, last - first).clone_owned(),
        }
    }

    fn get(&self, index: usize) -> f64 {
        match self {
            Data::Uniform { begin, step, .. } => begin + index as f64 * step,
            Data::Explicit(values) => values[index],
        }
    }
}

fn check_interval(begin: f64, end: f64) -> Result<(), KnotError> {
    // written negated so that NaN bounds are rejected as well
    if !(begin.is_finite() && end.is_finite() && begin < end) {
        return Err(KnotError::InvalidInterval { begin, end });
    }
    Ok(())
}

/// Rejects steps too small to keep neighbouring knots `begin + i * step` apart.
fn check_step(begin: f64, end: f64, step: f64) -> Result<(), KnotError> {
    let resolution = 4.0 * f64::EPSILON * begin.abs().max(end.abs());
    if !(step.is_finite() && step > resolution) {
        return Err(KnotError::InvalidStep { step });
    }
    Ok(())
}

/// Knots added in front of and behind the raw data.
#[derive(Debug, Clone, PartialEq)]
enum Padding {
    Open,
    Clamped { left: f64, right: f64, count: usize },
    Periodic { left: VecD, right: VecD },
}

impl Padding {
    fn new(data: &Data, p: usize, boundary: BoundaryCondition) -> Self {
        match boundary {
            BoundaryCondition::Open => Padding::Open,
            BoundaryCondition::Clamped => Padding::Clamped { left: data.first(), right: data.last(), count: p },
            BoundaryCondition::Periodic => {
                let m = data.len();
                let period = data.last() - data.first();
                let left = data.slice(m - p - 1, m - 1).add_scalar(-period);
                let right = data.slice(1, p + 1).add_scalar(period);
                Padding::Periodic { left, right }
            }
        }
    }

    fn size_left(&self) -> usize {
        match self {
            Padding::Open => 0,
            Padding::Clamped { count, .. } => *count,
            Padding::Periodic { left, .. } => left.len(),
        }
    }

    fn size_right(&self) -> usize {
        match self {
            Padding::Open => 0,
            Padding::Clamped { count, .. } => *count,
            Padding::Periodic { right, .. } => right.len(),
        }
    }

    fn left(&self, index: usize) -> f64 {
        match self {
            Padding::Open => unreachable!("open knots have no padding"),
            Padding::Clamped { left, .. } => *left,
            Padding::Periodic { left, .. } => left[index],
        }
    }

    fn right(&self, index: usize) -> f64 {
        match self {
            Padding::Open => unreachable!("open knots have no padding"),
            Padding::Clamped { right, .. } => *right,
            Padding::Periodic { right, .. } => right[index],
        }
    }
}

/// The padded knot vector of a curve of degree `p`.
#[derive(Debug, Clone, PartialEq)]
pub struct Knots {
    data: Data,
    padding: Padding,
    boundary: BoundaryCondition,
    p: usize,
}

impl Knots {
    /// Pads `data` according to `boundary` and validates the result.
    ///
    /// # Examples
    /// ```
    /// use approx::assert_relative_eq;
    /// use nalgebra::dvector;
    /// use bsplinex::curve::BoundaryCondition;
    /// use bsplinex::curve::knots::{Data, Knots};
    ///
    /// let data = Data::explicit(dvector![0.1, 1.3, 2.2, 4.9, 13.2]).unwrap();
    /// let knots = Knots::new(data, 3, BoundaryCondition::Periodic).unwrap();
    ///
    /// assert_eq!(knots.size(), 11);
    /// assert_relative_eq!(knots.at(0).unwrap(), -11.8, epsilon = 1e-12);
    /// assert_relative_eq!(knots.at(10).unwrap(), 18.0, epsilon = 1e-12);
    /// assert_eq!(knots.domain(), (0.1, 13.2));
    /// ```
    pub fn new(data: Data, degree: usize, boundary: BoundaryCondition) -> Result<Self, KnotError> {
        if degree == 0 {
            return Err(KnotError::DegreeTooLow { p: degree, limit: 0 });
        }

        let required = match boundary {
            BoundaryCondition::Open => 2 * degree + 2,
            BoundaryCondition::Clamped => 2,
            BoundaryCondition::Periodic => degree + 1,
        };
        if data.len() < required {
            return Err(KnotError::TooFewKnots { required, found: data.len() });
        }

        let padding = Padding::new(&data, degree, boundary);
        let knots = Knots { data, padding, boundary, p: degree };

        let (lower_bound, upper_bound) = knots.domain();
        if lower_bound >= upper_bound {
            return Err(KnotError::EmptyDomain { lower_bound, upper_bound });
        }
        // uniform data never repeats a knot and clamping adds exactly `p` copies of each end
        if !knots.data.is_uniform() {
            knots.check_multiplicities()?;
        }

        Ok(knots)
    }

    /// Returns the knot at `index` of the padded sequence.
    pub fn at(&self, index: usize) -> Result<f64, KnotError> {
        if index >= self.size() {
            return Err(KnotError::IndexOutOfBounds { index, size: self.size() });
        }
        Ok(self.knot(index))
    }

    /// Unchecked variant of [`Knots::at`] for indices derived from a knot span.
    pub(crate) fn knot(&self, index: usize) -> f64 {
        let size_left = self.padding.size_left();
        let m = self.data.len();

        if index < size_left {
            self.padding.left(index)
        } else if index < size_left + m {
            self.data.get(index - size_left)
        } else {
            self.padding.right(index - size_left - m)
        }
    }

    /// The number of knots including padding.
    pub fn size(&self) -> usize {
        self.padding.size_left() + self.data.len() + self.padding.size_right()
    }

    pub fn degree(&self) -> usize {
        self.p
    }

    pub fn boundary_condition(&self) -> BoundaryCondition {
        self.boundary
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Returns `(t_p, t_{m-p-1})`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knot(self.p), self.knot(self.size() - self.p - 1))
    }

    /// The padded knots as a contiguous vector.
    pub fn vector(&self) -> VecD {
        VecD::from_iterator(self.size(), (0..self.size()).map(|i| self.knot(i)))
    }

    /// The number of occurrences of `u` in the padded knots.
    pub fn multiplicity(&self, u: f64) -> usize {
        (0..self.size()).filter(|&i| self.knot(i) == u).count()
    }

    fn check_multiplicities(&self) -> Result<(), KnotError> {
        let limit = self.p + 1;
        let mut multiplicity = 1;

        for i in 1..self.size() {
            if self.knot(i) == self.knot(i - 1) {
                multiplicity += 1;
                if multiplicity > limit {
                    return Err(KnotError::MultiplicityTooHigh { u: self.knot(i), multiplicity, limit });
                }
            } else {
                multiplicity = 1;
            }
        }
        Ok(())
    }
}
