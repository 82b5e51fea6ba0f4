//! A manufactured Poisson problem on the unit square, used as the reference solver oracle.
//!
//! The problem is
//!
//! ```text
//!   -Δu = f   in (0, 1)^2,
//!     u = g   on the boundary,
//! ```
//!
//! where `u` is a prescribed exact solution, `f = -Δu` and `g` is the restriction of `u` to the
//! boundary. The problem is discretized with continuous Lagrange triangles of arbitrary degree on
//! a uniform triangulation, see [`LagrangeSpace`].
use crate::exact::{ExactSolution, ScalarFn};
use crate::expr::Expr;
use crate::lagrange::LagrangeSpace;
use crate::mesh::UnitSquareMesh;
use crate::oracle::{LinearSolver, SolutionPair, SolverConfig, SolverOracle};
use crate::quadrature::TriangleQuadrature;
use crate::space::{DiscreteField, FunctionSpace};
use eyre::{bail, eyre};
use itertools::izip;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Solver oracle for a manufactured Poisson problem on the unit square.
#[derive(Clone)]
pub struct PoissonMmsOracle {
    exact: ExactSolution,
    source: ScalarFn,
}

impl PoissonMmsOracle {
    /// Manufactures the problem from a symbolic exact solution. The source term `f = -Δu` is
    /// derived symbolically.
    ///
    /// The oracle returns the exact solution in its symbolic form.
    pub fn new(u: Expr) -> Self {
        let f = -u.laplacian(2);
        debug!("Manufactured Poisson source term f = {}", f);
        Self {
            exact: ExactSolution::Symbolic(u),
            source: Arc::new(move |x: &[f64]| f.evaluate(x)),
        }
    }

    /// Manufactures the problem from plain functions for the exact solution `u` and the source
    /// term `f`. It is up to the caller to ensure that `f = -Δu`.
    ///
    /// The oracle returns the exact solution as a plain function.
    pub fn from_functions(
        u: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
        f: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            exact: ExactSolution::from_fn(u),
            source: Arc::new(f),
        }
    }

    pub fn exact_solution(&self) -> &ExactSolution {
        &self.exact
    }
}

impl Debug for PoissonMmsOracle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoissonMmsOracle")
            .field("exact", &self.exact)
            .finish_non_exhaustive()
    }
}

impl SolverOracle for PoissonMmsOracle {
    type Space = LagrangeSpace;

    fn solve(
        &self,
        resolution: usize,
        degree: usize,
        config: &SolverConfig,
    ) -> eyre::Result<SolutionPair<LagrangeSpace>> {
        if resolution == 0 {
            bail!("the number of subdivisions must be positive");
        }
        let space = LagrangeSpace::new(UnitSquareMesh::new(resolution), degree)?;
        let boundary_values = self.exact.interpolate(&space)?;
        let strength = config.quadrature_strength.unwrap_or(2 * degree + 3);
        let quadrature = TriangleQuadrature::with_strength(strength);

        let (matrix, rhs) = assemble_linear_system(&space, &quadrature, self.source.as_ref(), &boundary_values)?;
        info!(
            "Solving P{} Poisson system at N = {} ({} DOFs, {} nonzeros) with {:?}",
            degree,
            resolution,
            space.num_dofs(),
            matrix.nnz(),
            config.linear_solver
        );
        let u_h = solve_linear_system(&matrix, &rhs, config.linear_solver)?;

        Ok(SolutionPair {
            approx: DiscreteField::from_coefficients(space, u_h)?,
            exact: self.exact.clone(),
        })
    }
}

/// Assembles the Poisson system with Dirichlet conditions given by the boundary entries of
/// `boundary_values`.
///
/// Dirichlet rows and columns are eliminated symmetrically: a boundary DOF gets a unit diagonal
/// entry and its value on the right-hand side, and its coupling to interior DOFs is moved to the
/// right-hand side. The resulting matrix is symmetric positive definite.
pub fn assemble_linear_system(
    space: &LagrangeSpace,
    quadrature: &TriangleQuadrature,
    source: &(dyn Fn(&[f64]) -> f64 + Sync),
    boundary_values: &DVector<f64>,
) -> eyre::Result<(CscMatrix<f64>, DVector<f64>)> {
    let n = space.num_dofs();
    if boundary_values.len() != n {
        bail!(
            "expected {} boundary values, got {}",
            n,
            boundary_values.len()
        );
    }

    let element = space.element();
    let mesh = space.mesh();
    let num_nodes = element.num_nodes();
    let det_j = mesh.jacobian_determinant_abs();

    // With J = ±h I, every element stiffness matrix equals the reference stiffness matrix,
    // whose integrand is a polynomial of degree 2(k - 1)
    let stiffness_quadrature = TriangleQuadrature::with_strength(2 * (element.degree() - 1));
    let mut stiffness = DMatrix::zeros(num_nodes, num_nodes);
    for (w, xi) in izip!(stiffness_quadrature.weights(), stiffness_quadrature.points()) {
        let gradients = element.evaluate_gradients(xi);
        stiffness += gradients.tr_mul(&gradients) * *w;
    }

    let mut basis_values = DMatrix::zeros(quadrature.len(), num_nodes);
    for (q, xi) in quadrature.points().iter().enumerate() {
        basis_values
            .row_mut(q)
            .tr_copy_from(&element.evaluate_basis(xi));
    }

    let mut coo = CooMatrix::new(n, n);
    let mut rhs = DVector::zeros(n);
    let mut dofs = Vec::with_capacity(num_nodes);
    let mut load = DVector::zeros(num_nodes);
    for e in 0..mesh.num_elements() {
        space.populate_element_dofs(e, &mut dofs);

        load.fill(0.0);
        for (q, (w, xi)) in izip!(quadrature.weights(), quadrature.points()).enumerate() {
            let x = mesh.map_reference_coords(e, xi);
            let f = source(x.coords.as_slice());
            for (local, phi) in izip!(load.iter_mut(), basis_values.row(q).iter()) {
                *local += w * f * phi * det_j;
            }
        }

        for (i, &dof_i) in dofs.iter().enumerate() {
            if space.is_boundary_dof(dof_i) {
                continue;
            }
            rhs[dof_i] += load[i];
            for (j, &dof_j) in dofs.iter().enumerate() {
                let a_ij = stiffness[(i, j)];
                if space.is_boundary_dof(dof_j) {
                    rhs[dof_i] -= a_ij * boundary_values[dof_j];
                } else {
                    coo.push(dof_i, dof_j, a_ij);
                }
            }
        }
    }

    for dof in (0..n).filter(|&dof| space.is_boundary_dof(dof)) {
        coo.push(dof, dof, 1.0);
        rhs[dof] = boundary_values[dof];
    }

    // Duplicate entries are summed by the conversion
    Ok((CscMatrix::from(&coo), rhs))
}

pub fn solve_linear_system(
    matrix: &CscMatrix<f64>,
    rhs: &DVector<f64>,
    solver: LinearSolver,
) -> eyre::Result<DVector<f64>> {
    let n = rhs.len();
    let b = DMatrix::from_column_slice(n, 1, rhs.as_slice());
    let u = match solver {
        LinearSolver::SparseCholesky => {
            let cholesky =
                CscCholesky::factor(matrix).map_err(|err| eyre!("Failed to solve linear system. Error: {}", err))?;
            cholesky.solve(&b)
        }
        LinearSolver::DenseLu => DMatrix::from(matrix)
            .lu()
            .solve(&b)
            .ok_or_else(|| eyre!("Failed to solve linear system: matrix is singular"))?,
    };

    let u = DVector::from_column_slice(u.as_slice());
    if u.iter().any(|value| !value.is_finite()) {
        bail!("linear solver produced non-finite values");
    }
    Ok(u)
}
