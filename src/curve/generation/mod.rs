//! Generates curves for the common combinations of knot spacing and boundary condition.
//!
//! | Function | Knots | Boundary condition | Extrapolation |
//! |:--|:--|:--|:--|
//! | [`open_uniform`] | `num_knots` equidistant in `[begin, end]` | open | none |
//! | [`open_nonuniform`] | explicit | open | none |
//! | [`clamped_uniform`] | `num_knots` equidistant in `[begin, end]` | clamped | none |
//! | [`clamped_nonuniform`] | explicit | clamped | none |
//! | [`periodic_uniform`] | `num_knots` equidistant in `[begin, end]` | periodic | periodic |
//! | [`periodic_nonuniform`] | explicit | periodic | periodic |
//!
//! Without control points, all control points are zero and the curve is meant to be [fitted][Curve::fit].

use crate::{
    curve::{
        knots::{extrapolation::Extrapolation, Data},
        BoundaryCondition, Curve, CurveError,
    },
    types::VecD,
};

/// Returns an open curve over `num_knots` equidistant knots.
///
/// # Examples
/// ```
/// use bsplinex::curve::generation::open_uniform;
///
/// // 10 knots and degree 3 leave 6 control points and the domain `[3, 6]`
/// let curve = open_uniform(3, 0.0, 9.0, 10, None).unwrap();
/// assert_eq!(curve.points().len(), 6);
/// assert_eq!(curve.domain(), (3.0, 6.0));
/// ```
pub fn open_uniform(
    degree: usize,
    begin: f64,
    end: f64,
    num_knots: usize,
    points: Option<VecD>,
) -> Result<Curve, CurveError> {
    build(Data::uniform_count(begin, end, num_knots)?, points, degree, BoundaryCondition::Open)
}

pub fn open_nonuniform(degree: usize, knots: VecD, points: Option<VecD>) -> Result<Curve, CurveError> {
    build(Data::explicit(knots)?, points, degree, BoundaryCondition::Open)
}

/// Returns a clamped curve over `num_knots` equidistant knots, starting and ending at its end control points.
pub fn clamped_uniform(
    degree: usize,
    begin: f64,
    end: f64,
    num_knots: usize,
    points: Option<VecD>,
) -> Result<Curve, CurveError> {
    build(Data::uniform_count(begin, end, num_knots)?, points, degree, BoundaryCondition::Clamped)
}

pub fn clamped_nonuniform(degree: usize, knots: VecD, points: Option<VecD>) -> Result<Curve, CurveError> {
    build(Data::explicit(knots)?, points, degree, BoundaryCondition::Clamped)
}

/// Returns a closed curve with period `end - begin` over `num_knots` equidistant knots.
pub fn periodic_uniform(
    degree: usize,
    begin: f64,
    end: f64,
    num_knots: usize,
    points: Option<VecD>,
) -> Result<Curve, CurveError> {
    build(Data::uniform_count(begin, end, num_knots)?, points, degree, BoundaryCondition::Periodic)
}

pub fn periodic_nonuniform(degree: usize, knots: VecD, points: Option<VecD>) -> Result<Curve, CurveError> {
    build(Data::explicit(knots)?, points, degree, BoundaryCondition::Periodic)
}

fn build(knots: Data, points: Option<VecD>, degree: usize, boundary: BoundaryCondition) -> Result<Curve, CurveError> {
    let points = points.unwrap_or_else(|| VecD::zeros(boundary.expected_points(knots.len(), degree)));
    let extrapolation = match boundary {
        BoundaryCondition::Open | BoundaryCondition::Clamped => Extrapolation::None,
        BoundaryCondition::Periodic => Extrapolation::Periodic,
    };
    Curve::new(knots, points, degree, boundary, extrapolation)
}
