//! **bsplinex** is a library for evaluating and fitting one-dimensional B-spline curves based on [nalgebra].
//!
//! ## Features
//! - Curves of arbitrary polynomial degree `p > 0` with scalar control points.
//! - [Knots][curve::knots] given in closed form (equidistant) or as an explicit, non-decreasing array.
//! - [Boundary conditions][curve::BoundaryCondition] `Open`, `Clamped`, and `Periodic`, which pad the knots and
//!   control points so that every curve is evaluated with the same algorithm.
//! - [Extrapolation][curve::knots::extrapolation] of parameters outside of the domain by rejecting, clamping,
//!   or wrapping them.
//! - [Evaluation][curve::Curve::evaluate] with De Boor's algorithm and a knot span search in `O(1)` for
//!   equidistant and `O(log m)` for arbitrary knots.
//! - [Basis functions][curve::Curve::basis] and [least-squares fitting][curve::Curve::fit] of the control points.
//! - [Factory functions][curve::generation] for the common curve types.
//!
//! ## Example
//!
//! ```
//! use approx::assert_relative_eq;
//! use bsplinex::curve::generation::periodic_uniform;
//!
//! let mut curve = periodic_uniform(3, 0.0, 1.0, 21, None).unwrap();
//!
//! let x: Vec<f64> = (0..200).map(|i| i as f64 / 200.0).collect();
//! let y: Vec<f64> = x.iter().map(|x| (2.0 * std::f64::consts::PI * x).sin()).collect();
//! curve.fit(&x, &y).unwrap();
//!
//! assert_relative_eq!(curve.evaluate(0.25).unwrap(), 1.0, epsilon = 1e-3);
//! assert_relative_eq!(curve.evaluate(1.25).unwrap(), curve.evaluate(0.25).unwrap(), epsilon = 1e-12);
//! ```
//!
//! ## Literature:
//! |            |                                                                                         |
//! |-----------:|:----------------------------------------------------------------------------------------|
//! | Piegl1997  | Piegl, L., Tiller, W. The NURBS Book. Springer, Berlin, Heidelberg, 2nd ed., 1997.       |
//! | deBoor1978 | de Boor, C. A Practical Guide to Splines. Applied Mathematical Sciences 27. Springer, 1978. |

pub mod curve;
pub mod types;

pub use curve::{
    knots::{extrapolation::Extrapolation, Data},
    BoundaryCondition, Curve, CurveError,
};
