//! Locates the knot span `[t_k, t_{k+1})` containing a parameter `u`.
//!
//! Ties at repeated knots resolve to the highest index. The right domain boundary `u = t_{m-p-1}`
//! is part of the last non-degenerate span.

use crate::curve::knots::{KnotError, Knots};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Bisection over the domain knots, `O(log m)`.
    Bisection,
    /// Inversion of `t_i = t_p + (i - p) * step`, `O(1)`.
    Uniform { step: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finder {
    method: Method,
    first: usize,
    last: usize,
    lower_bound: f64,
    upper_bound: f64,
}

impl Finder {
    /// Selects the uniform fast path for equidistant knots and bisection otherwise.
    pub fn new(knots: &Knots) -> Self {
        match knots.data().step() {
            Some(step) => Self::with_method(knots, Method::Uniform { step }),
            None => Self::with_method(knots, Method::Bisection),
        }
    }

    pub fn bisection(knots: &Knots) -> Self {
        Self::with_method(knots, Method::Bisection)
    }

    fn with_method(knots: &Knots, method: Method) -> Self {
        let first = knots.degree();
        let right = knots.size() - knots.degree() - 1;

        // skip zero-length spans in front of the right boundary
        let mut last = right - 1;
        while last > first && knots.knot(last) == knots.knot(last + 1) {
            last -= 1;
        }

        Finder { method, first, last, lower_bound: knots.knot(first), upper_bound: knots.knot(right) }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the index `k` of the span `t_k <= u < t_{k+1}` with `u ∈ [t_p, t_{m-p-1}]`.
    pub fn find(&self, knots: &Knots, u: f64) -> Result<usize, KnotError> {
        if !(self.lower_bound..=self.upper_bound).contains(&u) {
            return Err(KnotError::ParameterOutOfBounds {
                u,
                lower_bound: self.lower_bound,
                upper_bound: self.upper_bound,
            });
        }

        Ok(match self.method {
            Method::Bisection => self.bisect(knots, u),
            Method::Uniform { step } => self.step(knots, u, step),
        })
    }

    fn bisect(&self, knots: &Knots, u: f64) -> usize {
        let mut low = self.first;
        let mut high = self.last;

        while low < high {
            let mid = high - (high - low) / 2;

            if knots.knot(mid) > u {
                high = mid - 1;
            } else {
                low = mid;
            }
        }
        high
    }

    fn step(&self, knots: &Knots, u: f64, step: f64) -> usize {
        let offset = ((u - self.lower_bound) / step).floor() as usize;
        let mut k = self.first.saturating_add(offset).min(self.last);

        // `(u - t_p) / step` may round across a knot, move to the neighbouring span then
        while k > self.first && knots.knot(k) > u {
            k -= 1;
        }
        while k < self.last && knots.knot(k + 1) <= u {
            k += 1;
        }
        k
    }
}
