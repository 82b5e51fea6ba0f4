//! Quadrature rules for the reference triangle with corners `(0, 0)`, `(1, 0)` and `(0, 1)`.
//!
//! The rules are collapsed (Duffy) tensor products of Gauss rules: the unit square is mapped
//! onto the triangle by `(s, t) -> (s, t (1 - s))`, whose Jacobian determinant is `1 - s`.
//! They are not as economical as dedicated symmetric rules, but exist for every strength and
//! have strictly positive weights with all points in the interior.

use crate::univariate::gauss_unit_interval;
use crate::Rule2d;

/// Number of Gauss points per direction needed for a collapsed rule of the given strength.
///
/// A polynomial of total degree `k` becomes degree `k + 1` in `s` after the collapse (because of
/// the Jacobian), so we need `2n - 1 >= k + 1`.
pub fn collapsed_points_per_dim(strength: usize) -> usize {
    (strength + 3) / 2
}

/// A quadrature rule for the reference triangle that integrates all polynomials of total degree
/// up to `strength` exactly.
pub fn triangle_gauss(strength: usize) -> Rule2d {
    let n = collapsed_points_per_dim(strength);
    let (weights1d, points1d) = gauss_unit_interval(n);

    let mut weights = Vec::with_capacity(n * n);
    let mut points = Vec::with_capacity(n * n);
    for (&ws, &[s]) in weights1d.iter().zip(&points1d) {
        for (&wt, &[t]) in weights1d.iter().zip(&points1d) {
            weights.push(ws * wt * (1.0 - s));
            points.push([s, t * (1.0 - s)]);
        }
    }

    (weights, points)
}
