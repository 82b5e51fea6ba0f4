//! Representations of exact (manufactured) solutions.
use crate::error::ConvergenceError;
use crate::expr::Expr;
use crate::space::FunctionSpace;
use nalgebra::DVector;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A shareable scalar function of a spatial point.
pub type ScalarFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// An exact solution as handed out by a solver oracle.
///
/// A symbolic expression carries enough structure to be differentiated and validated against the
/// dimension of the space it is compared against. A plain function is opaque and is sampled
/// directly at the nodes of a space.
#[derive(Clone)]
pub enum ExactSolution {
    Symbolic(Expr),
    Function(ScalarFn),
}

impl ExactSolution {
    pub fn symbolic(expr: Expr) -> Self {
        Self::Symbolic(expr)
    }

    pub fn from_fn(f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Checks that the solution can be evaluated on a domain of the given dimension.
    pub fn validate_for_dim(&self, dim: usize) -> Result<(), ConvergenceError> {
        match self {
            Self::Symbolic(expr) => match expr.max_coordinate() {
                Some(i) if i >= dim => Err(ConvergenceError::UnsupportedExactRepresentation {
                    reason: format!(
                        "symbolic expression references coordinate x{} on a {}-dimensional domain",
                        i, dim
                    ),
                }),
                _ => Ok(()),
            },
            Self::Function(_) => Ok(()),
        }
    }

    /// Nodal interpolation of the exact solution into the given space.
    pub fn interpolate<S: FunctionSpace>(&self, space: &S) -> Result<DVector<f64>, ConvergenceError> {
        self.validate_for_dim(space.geometry_dim())?;
        let coefficients = match self {
            Self::Symbolic(expr) => space.interpolate(&|x: &[f64]| expr.evaluate(x)),
            Self::Function(f) => space.interpolate(f.as_ref()),
        };
        Ok(coefficients)
    }
}

impl Debug for ExactSolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic(expr) => f.debug_tuple("Symbolic").field(expr).finish(),
            Self::Function(_) => f.debug_tuple("Function").field(&"<fn>").finish(),
        }
    }
}
