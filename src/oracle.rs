//! The solver oracle: the external collaborator producing discrete and exact solutions.
use crate::exact::ExactSolution;
use crate::space::{DiscreteField, FunctionSpace};
use serde::{Deserialize, Serialize};

/// Linear solver used by an oracle for its discrete system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearSolver {
    /// Sparse Cholesky factorization, for symmetric positive definite systems.
    #[default]
    SparseCholesky,
    /// Dense LU factorization. Only sensible for small systems.
    DenseLu,
}

/// Configuration handed to every oracle invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub linear_solver: LinearSolver,
    /// Polynomial strength of the quadrature used for source terms. If `None`, the oracle picks
    /// one based on the polynomial degree.
    pub quadrature_strength: Option<usize>,
}

/// The result of one oracle invocation.
#[derive(Debug, Clone)]
pub struct SolutionPair<S> {
    pub approx: DiscreteField<S>,
    pub exact: ExactSolution,
}

/// Produces a discrete solution of a fixed manufactured problem on a uniform mesh with `N`
/// subdivisions per axis, together with the exact solution of that problem.
pub trait SolverOracle {
    type Space: FunctionSpace;

    fn solve(&self, resolution: usize, degree: usize, config: &SolverConfig)
        -> eyre::Result<SolutionPair<Self::Space>>;
}

impl<'a, O> SolverOracle for &'a O
where
    O: ?Sized + SolverOracle,
{
    type Space = O::Space;

    fn solve(
        &self,
        resolution: usize,
        degree: usize,
        config: &SolverConfig,
    ) -> eyre::Result<SolutionPair<Self::Space>> {
        <O as SolverOracle>::solve(self, resolution, degree, config)
    }
}
