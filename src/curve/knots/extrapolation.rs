//! Maps parameters outside of the domain `[t_p, t_{m-p-1})` back into it.

use std::fmt;

use crate::curve::CurveError;

/// The policy applied to parameters outside of the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Parameters outside of the domain are rejected.
    #[default]
    None,
    /// Parameters are clamped to the closest domain boundary.
    Constant,
    /// Parameters are wrapped into the domain, repeating the curve with the domain length as period.
    Periodic,
}

impl fmt::Display for Extrapolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extrapolation::None => write!(f, "none"),
            Extrapolation::Constant => write!(f, "constant"),
            Extrapolation::Periodic => write!(f, "periodic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extrapolator {
    method: Extrapolation,
    left: f64,
    right: f64,
    period: f64,
}

impl Extrapolator {
    pub fn new(method: Extrapolation, (left, right): (f64, f64)) -> Self {
        Extrapolator { method, left, right, period: right - left }
    }

    pub fn method(&self) -> Extrapolation {
        self.method
    }

    /// Whether `u` lies in the half-open domain `[left, right)` and needs no extrapolation.
    pub fn contains(&self, u: f64) -> bool {
        (self.left..self.right).contains(&u)
    }

    /// Returns a parameter inside the domain for `u`, which is expected to lie outside of it.
    ///
    /// # Examples
    /// ```
    /// use bsplinex::curve::knots::extrapolation::{Extrapolation, Extrapolator};
    ///
    /// let extrapolator = Extrapolator::new(Extrapolation::Constant, (0.0, 1.0));
    /// assert_eq!(extrapolator.extrapolate(-2.0), Ok(0.0));
    /// assert_eq!(extrapolator.extrapolate(1.5), Ok(1.0));
    /// ```
    pub fn extrapolate(&self, u: f64) -> Result<f64, CurveError> {
        match self.method {
            Extrapolation::None => Err(self.out_of_bounds(u)),
            _ if u.is_nan() => Err(self.out_of_bounds(u)),
            Extrapolation::Constant => Ok(if u < self.left { self.left } else { self.right }),
            Extrapolation::Periodic if u.is_infinite() => Err(self.out_of_bounds(u)),
            Extrapolation::Periodic => Ok(self.wrap(u)),
        }
    }

    fn wrap(&self, u: f64) -> f64 {
        let mut v = if u < self.left {
            u + self.period * (((self.left - u) / self.period).floor() + 1.0)
        } else if u >= self.right {
            u - self.period * (((u - self.right) / self.period).floor() + 1.0)
        } else {
            u
        };

        // rounding in the shift above can leave `v` just outside of the domain
        for _ in 0..2 {
            if v < self.left {
                v += self.period;
            } else if v >= self.right {
                v -= self.period;
            } else {
                return v;
            }
        }

        if self.contains(v) {
            v
        } else {
            log::warn!("Periodic extrapolation of `u = {u}` failed, falling back to `{}`", self.left);
            self.left
        }
    }

    fn out_of_bounds(&self, u: f64) -> CurveError {
        CurveError::ParameterOutOfBounds { u, lower_bound: self.left, upper_bound: self.right }
    }
}
