//! Least-squares fit of the control points to sampled data `(x_i, y_i)`.
//!
//! Each sample contributes the row `[B_0(x_i), ..., B_{n-1}(x_i)]` to the design matrix `N`, and the
//! control points minimize `|N c - y|²`. With a periodic boundary condition the padded control points
//! `c_{n+j} = c_j` are not independent, so the last `p` columns are added to the first `p`.

use nalgebra::SVD;
use thiserror::Error;

use crate::{
    curve::{BoundaryCondition, Curve, CurveError},
    types::{MatD, VecD},
};

#[derive(Error, Debug, PartialEq)]
pub enum FitError {
    #[error("The number of parameters `x` ({x}) must equal the number of values `y` ({y}).")]
    LengthMismatch { x: usize, y: usize },

    #[error("At least one sample is required for fitting.")]
    NoSamples,

    #[error("Solving the least-squares problem failed: {reason}")]
    SolveFailed { reason: String },
}

/// Computes the raw control points of `curve` best approximating `y` at the parameters `x`.
pub fn fit(curve: &Curve, x: &[f64], y: &[f64]) -> Result<VecD, CurveError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch { x: x.len(), y: y.len() }.into());
    }
    if x.is_empty() {
        return Err(FitError::NoSamples.into());
    }

    let Nmat = design_matrix(curve, x)?;
    let unknowns = Nmat.ncols();
    if x.len() < unknowns {
        log::warn!(
            "Fitting {unknowns} control points to {} samples is under-determined, using the minimum-norm solution",
            x.len()
        );
    }

    let b = VecD::from_column_slice(y);
    let svd = SVD::new(Nmat, true, true);
    let c = svd
        .solve(&b, f64::EPSILON.sqrt())
        .map_err(|reason| FitError::SolveFailed { reason: reason.to_string() })?;

    if let Some(i) = c.iter().position(|c| !c.is_finite()) {
        return Err(FitError::SolveFailed { reason: format!("control point {i} is not finite") }.into());
    }
    Ok(c)
}

/// Stacks the basis rows of all parameters, folding the periodic padding back onto the raw control points.
fn design_matrix(curve: &Curve, x: &[f64]) -> Result<MatD, CurveError> {
    let size = curve.points().size();
    let mut Nmat = MatD::zeros(x.len(), size);
    for (g, &u) in x.iter().enumerate() {
        Nmat.row_mut(g).tr_copy_from(&curve.basis(u)?);
    }

    if curve.boundary_condition() != BoundaryCondition::Periodic {
        return Ok(Nmat);
    }

    let n = curve.points().len();
    let mut folded = Nmat.columns(0, n).clone_owned();
    for j in 0..size - n {
        let mut column = folded.column_mut(j);
        column += Nmat.column(n + j);
    }
    Ok(folded)
}
