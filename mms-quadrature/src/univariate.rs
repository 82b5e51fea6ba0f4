//! Quadrature rules for the one-dimensional domain `[-1, 1]`.

use crate::Rule;
use std::f64::consts::PI;

/// Newton iterations needed in practice are below ten even for several hundred points.
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Value and derivative of the Legendre polynomial `P_n` at a point.
///
/// The derivative formula is singular at `|x| == 1`, so this is only valid on the open
/// interval `(-1, 1)`, which is where all Gauss points live.
#[derive(Debug, Clone, Copy)]
struct Legendre {
    value: f64,
    derivative: f64,
}

impl Legendre {
    fn evaluate(n: usize, x: f64) -> Self {
        // (m + 1) P_{m+1}(x) = (2m + 1) x P_m(x) - m P_{m-1}(x)
        let mut current = 1.0;
        let mut previous = 0.0;
        for m in 0..n {
            let m = m as f64;
            let next = ((2.0 * m + 1.0) * x * current - m * previous) / (m + 1.0);
            previous = current;
            current = next;
        }

        // P_n'(x) = n (x P_n(x) - P_{n-1}(x)) / (x^2 - 1)
        let n = n as f64;
        let derivative = n * (x * current - previous) / (x * x - 1.0);
        Self {
            value: current,
            derivative,
        }
    }
}

/// Gauss–Legendre quadrature for the reference interval `[-1, 1]`.
///
/// With `n` points the rule integrates polynomials of degree up to `2n - 1` exactly. Points are
/// returned in ascending order.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let mut points = vec![[0.0]; n];
    let mut weights = vec![0.0; n];

    // Roots are symmetric about the origin, so only the upper half is computed
    let num_upper = (n + 1) / 2;
    for i in 0..num_upper {
        // Chebyshev-like initial guess, descending from the largest root
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut legendre = Legendre::evaluate(n, x);
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let dx = -legendre.value / legendre.derivative;
            x += dx;
            legendre = Legendre::evaluate(n, x);
            if dx.abs() <= 1e-15 {
                break;
            }
        }

        let w = 2.0 / ((1.0 - x * x) * legendre.derivative * legendre.derivative);
        points[n - 1 - i] = [x];
        weights[n - 1 - i] = w;
        points[i] = [-x];
        weights[i] = w;
    }

    // The middle root of an odd rule is exactly zero
    if n % 2 == 1 {
        points[n / 2] = [0.0];
    }

    (weights, points)
}

/// Gauss–Legendre quadrature mapped to the unit interval `[0, 1]`.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss_unit_interval(num_points: usize) -> Rule<1> {
    let (weights, points) = gauss(num_points);
    let weights = weights.into_iter().map(|w| 0.5 * w).collect();
    let points = points.into_iter().map(|[x]| [0.5 * (x + 1.0)]).collect();
    (weights, points)
}
