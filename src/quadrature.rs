//! Quadrature on the reference triangle, in `nalgebra` terms.
use nalgebra::Point2;

pub use mms_quadrature::simplex::triangle_gauss;

/// A quadrature rule for the reference triangle `(0, 0), (1, 0), (0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleQuadrature {
    strength: usize,
    weights: Vec<f64>,
    points: Vec<Point2<f64>>,
}

impl TriangleQuadrature {
    /// A rule integrating polynomials of total degree up to `strength` exactly.
    pub fn with_strength(strength: usize) -> Self {
        let (weights, points) = triangle_gauss(strength);
        let points = points.into_iter().map(Point2::from).collect();
        Self {
            strength,
            weights,
            points,
        }
    }

    pub fn strength(&self) -> usize {
        self.strength
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Approximates the integral of `f` over the reference triangle.
    pub fn integrate(&self, f: impl Fn(&Point2<f64>) -> f64) -> f64 {
        self.weights.iter().zip(&self.points).map(|(w, p)| w * f(p)).sum()
    }
}
