//! Quadrature rules for the reference interval and the reference triangle.
//!
//! Conventions:
//!
//! - The reference interval is `[-1, 1]`.
//! - The reference triangle is the unit simplex with corners `(0, 0)`, `(1, 0)` and `(0, 1)`.
//!
//! A rule is a pair `(weights, points)`. The crate has no dependencies so that the rules can be
//! used independently of `mms-convergence`.

pub mod simplex;
pub mod univariate;

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A two-dimensional point.
pub type Point2 = Point<2>;

/// A D-dimensional rule.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A two-dimensional quadrature rule.
pub type Rule2d = Rule<2>;

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights.iter().zip(points).map(|(w, p)| w * f(p)).sum()
}
