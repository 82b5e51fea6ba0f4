//! Symbolic scalar expressions over spatial coordinates.
//!
//! Manufactured solutions are most conveniently written down symbolically: the source term of a
//! Poisson problem is then obtained by differentiating the exact solution, rather than by
//! hand-deriving it. [`Expr`] is a deliberately small expression tree for this purpose.
//!
//! ```
//! use mms_convergence::expr::Expr;
//! use std::f64::consts::PI;
//!
//! let u = (2.0 * PI * Expr::x()).cos() * (2.0 * PI * Expr::y()).cos();
//! let f = -u.laplacian(2);
//! assert!((f.evaluate(&[0.0, 0.0]) - 8.0 * PI * PI).abs() < 1e-10);
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A scalar expression in the spatial coordinates `x_0, x_1, ...`.
///
/// Arithmetic operators build new expressions and fold constants eagerly, so derivative trees stay
/// reasonably small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Constant(f64),
    /// The spatial coordinate with the given index (`0` is `x`, `1` is `y`, ...).
    Coordinate(usize),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Powi(Box<Expr>, i32),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Exp(Box<Expr>),
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn coordinate(index: usize) -> Self {
        Self::Coordinate(index)
    }

    pub fn x() -> Self {
        Self::Coordinate(0)
    }

    pub fn y() -> Self {
        Self::Coordinate(1)
    }

    pub fn z() -> Self {
        Self::Coordinate(2)
    }

    pub fn sin(self) -> Self {
        match self {
            Self::Constant(c) => Self::Constant(c.sin()),
            expr => Self::Sin(Box::new(expr)),
        }
    }

    pub fn cos(self) -> Self {
        match self {
            Self::Constant(c) => Self::Constant(c.cos()),
            expr => Self::Cos(Box::new(expr)),
        }
    }

    pub fn exp(self) -> Self {
        match self {
            Self::Constant(c) => Self::Constant(c.exp()),
            expr => Self::Exp(Box::new(expr)),
        }
    }

    pub fn powi(self, exponent: i32) -> Self {
        match (self, exponent) {
            (_, 0) => Self::Constant(1.0),
            (expr, 1) => expr,
            (Self::Constant(c), n) => Self::Constant(c.powi(n)),
            (expr, n) => Self::Powi(Box::new(expr), n),
        }
    }

    fn is_constant(&self, value: f64) -> bool {
        matches!(self, Self::Constant(c) if *c == value)
    }

    /// Evaluates the expression at the point `x`.
    ///
    /// # Panics
    ///
    /// Panics if the expression references a coordinate index `>= x.len()`. Use
    /// [`max_coordinate`](Self::max_coordinate) to validate an expression against a dimension
    /// beforehand.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        match self {
            Self::Constant(c) => *c,
            Self::Coordinate(i) => x[*i],
            Self::Add(a, b) => a.evaluate(x) + b.evaluate(x),
            Self::Sub(a, b) => a.evaluate(x) - b.evaluate(x),
            Self::Mul(a, b) => a.evaluate(x) * b.evaluate(x),
            Self::Div(a, b) => a.evaluate(x) / b.evaluate(x),
            Self::Neg(a) => -a.evaluate(x),
            Self::Powi(a, n) => a.evaluate(x).powi(*n),
            Self::Sin(a) => a.evaluate(x).sin(),
            Self::Cos(a) => a.evaluate(x).cos(),
            Self::Exp(a) => a.evaluate(x).exp(),
        }
    }

    /// The largest coordinate index referenced by the expression, if any.
    pub fn max_coordinate(&self) -> Option<usize> {
        match self {
            Self::Constant(_) => None,
            Self::Coordinate(i) => Some(*i),
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
                a.max_coordinate().max(b.max_coordinate())
            }
            Self::Neg(a) | Self::Powi(a, _) | Self::Sin(a) | Self::Cos(a) | Self::Exp(a) => a.max_coordinate(),
        }
    }

    /// Symbolic partial derivative with respect to the coordinate with the given index.
    pub fn derivative(&self, coordinate: usize) -> Expr {
        let d = |e: &Expr| e.derivative(coordinate);
        match self {
            Self::Constant(_) => Self::Constant(0.0),
            Self::Coordinate(i) if *i == coordinate => Self::Constant(1.0),
            Self::Coordinate(_) => Self::Constant(0.0),
            Self::Add(a, b) => d(a) + d(b),
            Self::Sub(a, b) => d(a) - d(b),
            Self::Mul(a, b) => d(a) * b.as_ref().clone() + a.as_ref().clone() * d(b),
            Self::Div(a, b) => {
                (d(a) * b.as_ref().clone() - a.as_ref().clone() * d(b)) / b.as_ref().clone().powi(2)
            }
            Self::Neg(a) => -d(a),
            Self::Powi(a, n) => f64::from(*n) * a.as_ref().clone().powi(n - 1) * d(a),
            Self::Sin(a) => a.as_ref().clone().cos() * d(a),
            Self::Cos(a) => -(a.as_ref().clone().sin()) * d(a),
            Self::Exp(a) => self.clone() * d(a),
        }
    }

    /// The gradient `(d/dx_0, ..., d/dx_{dim-1})`.
    pub fn gradient(&self, dim: usize) -> Vec<Expr> {
        (0..dim).map(|i| self.derivative(i)).collect()
    }

    /// The Laplacian `sum_i d^2/dx_i^2` in `dim` dimensions.
    pub fn laplacian(&self, dim: usize) -> Expr {
        (0..dim)
            .map(|i| self.derivative(i).derivative(i))
            .fold(Expr::Constant(0.0), |acc, term| acc + term)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a + b),
            (a, b) if a.is_constant(0.0) => b,
            (a, b) if b.is_constant(0.0) => a,
            (a, b) => Expr::Add(Box::new(a), Box::new(b)),
        }
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a - b),
            (a, b) if b.is_constant(0.0) => a,
            (a, b) if a.is_constant(0.0) => -b,
            (a, b) => Expr::Sub(Box::new(a), Box::new(b)),
        }
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a * b),
            (a, b) if a.is_constant(0.0) || b.is_constant(0.0) => Expr::Constant(0.0),
            (a, b) if a.is_constant(1.0) => b,
            (a, b) if b.is_constant(1.0) => a,
            (a, b) => Expr::Mul(Box::new(a), Box::new(b)),
        }
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Constant(a), Expr::Constant(b)) => Expr::Constant(a / b),
            (a, b) if b.is_constant(1.0) => a,
            (a, b) => Expr::Div(Box::new(a), Box::new(b)),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Constant(c) => Expr::Constant(-c),
            Expr::Neg(a) => *a,
            expr => Expr::Neg(Box::new(expr)),
        }
    }
}

macro_rules! impl_scalar_ops {
    ($($trait:ident, $method:ident);*) => {
        $(
            impl $trait<f64> for Expr {
                type Output = Expr;

                fn $method(self, rhs: f64) -> Expr {
                    $trait::$method(self, Expr::Constant(rhs))
                }
            }

            impl $trait<Expr> for f64 {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    $trait::$method(Expr::Constant(self), rhs)
                }
            }
        )*
    };
}

impl_scalar_ops!(Add, add; Sub, sub; Mul, mul; Div, div);

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{}", c),
            Expr::Coordinate(0) => write!(f, "x"),
            Expr::Coordinate(1) => write!(f, "y"),
            Expr::Coordinate(2) => write!(f, "z"),
            Expr::Coordinate(i) => write!(f, "x{}", i),
            Expr::Add(a, b) => write!(f, "({} + {})", a, b),
            Expr::Sub(a, b) => write!(f, "({} - {})", a, b),
            Expr::Mul(a, b) => write!(f, "{} * {}", a, b),
            Expr::Div(a, b) => write!(f, "{} / ({})", a, b),
            Expr::Neg(a) => write!(f, "-({})", a),
            Expr::Powi(a, n) => write!(f, "({})^{}", a, n),
            Expr::Sin(a) => write!(f, "sin({})", a),
            Expr::Cos(a) => write!(f, "cos({})", a),
            Expr::Exp(a) => write!(f, "exp({})", a),
        }
    }
}
