//! Evaluates the curve `S(u) = Σ c_i B_{i,p}(u)` and the basis spline functions `B_{i,p}`.
//!
//! Both work on a single knot span `t_k <= u < t_{k+1}`, found by the [finder][crate::curve::knots::finder],
//! in which only the `p + 1` basis functions `B_{k-p,p}, ..., B_{k,p}` are non-zero.
//!
//! The curve value is computed with De Boor's algorithm
//!
//! ```text
//! d_j^0 = c_{j+k-p}
//! d_j^r = (1 - α_j^r) d_{j-1}^{r-1} + α_j^r d_j^{r-1},  α_j^r = (u - t_{j+k-p}) / (t_{j+1+k-r} - t_{j+k-p})
//! ```
//!
//! for `r = 1, ..., p` and `j = p, ..., r`, with `S(u) = d_p^p`. The basis functions follow the
//! Cox-de Boor recurrence relation in its triangular form, raising the degree from `0` to `p`.
//!
//! Every denominator spans `[t_k, t_{k+1}]`, which is never empty for a span returned by the finder.

use tinyvec::TinyVec;

use crate::{
    curve::{knots::Knots, points::ControlPoints},
    types::VecD,
};

/// Scratch space of De Boor's algorithm, kept on the stack for degrees up to 7.
type Scratch = TinyVec<[f64; 8]>;

/// Evaluates the curve at `u` inside the knot span `k`, which must satisfy `p <= k < points.size()`.
pub(crate) fn de_boor(knots: &Knots, points: &ControlPoints, k: usize, u: f64) -> f64 {
    let p = knots.degree();
    let mut d: Scratch = (0..=p).map(|j| points.point(j + k - p)).collect();

    for r in 1..=p {
        for j in (r..=p).rev() {
            let left = knots.knot(j + k - p);
            let alpha = (u - left) / (knots.knot(j + 1 + k - r) - left);
            d[j] = (1.0 - alpha) * d[j - 1] + alpha * d[j];
        }
    }
    d[p]
}

/// Evaluates all `knots.size() - p - 1` basis functions at `u` inside the knot span `k >= p`.
pub(crate) fn basis(knots: &Knots, k: usize, u: f64) -> VecD {
    let p = knots.degree();
    let t = |i: usize| knots.knot(i);

    let mut N = VecD::zeros(knots.size() - p - 1);
    N[k] = 1.0;

    for d in 1..=p {
        N[k - d] = (t(k + 1) - u) / (t(k + 1) - t(k - d + 1)) * N[k - d + 1];
        for i in (k - d + 1)..k {
            N[i] = (u - t(i)) / (t(i + d) - t(i)) * N[i] + (t(i + d + 1) - u) / (t(i + d + 1) - t(i + 1)) * N[i + 1];
        }
        N[k] *= (u - t(k)) / (t(k + d) - t(k));
    }
    N
}
