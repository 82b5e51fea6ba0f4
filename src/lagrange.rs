//! Continuous Lagrange elements of arbitrary degree on uniform unit-square triangulations.
use crate::mesh::{TriangleOrientation, UnitSquareMesh};
use crate::quadrature::TriangleQuadrature;
use crate::space::{DiscreteField, FunctionSpace};
use eyre::{bail, eyre};
use itertools::izip;
use log::debug;
use nalgebra::{DMatrix, DVector, Matrix2xX, Point2};
use rayon::prelude::*;
use std::ops::Range;
use std::sync::Arc;

/// Largest supported polynomial degree.
///
/// The basis is computed by inverting a Vandermonde matrix on equispaced nodes, which becomes
/// too ill-conditioned beyond this.
pub const MAX_LAGRANGE_DEGREE: usize = 10;

/// The lattice `(a, b)`, `a + b <= degree`, ordered with `a` running fastest.
fn triangle_lattice(degree: usize) -> Vec<(usize, usize)> {
    (0..=degree)
        .flat_map(|b| (0..=degree - b).map(move |a| (a, b)))
        .collect()
}

fn monomial(exponents: (usize, usize), xi: &Point2<f64>) -> f64 {
    let (i, j) = exponents;
    xi.x.powi(i as i32) * xi.y.powi(j as i32)
}

/// The Lagrange finite element of a given degree on the reference triangle
/// `(0, 0), (1, 0), (0, 1)`, with equispaced nodes `(a / k, b / k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangeTriangle {
    degree: usize,
    lattice: Vec<(usize, usize)>,
    /// Entry `(m, n)` is the coefficient of monomial `m` in basis function `n`.
    coefficients: DMatrix<f64>,
}

impl LagrangeTriangle {
    pub fn new(degree: usize) -> eyre::Result<Self> {
        if degree == 0 || degree > MAX_LAGRANGE_DEGREE {
            bail!(
                "Lagrange triangles of degree {} are not supported (must be between 1 and {})",
                degree,
                MAX_LAGRANGE_DEGREE
            );
        }

        // Monomials x^i y^j, i + j <= k, enumerated the same way as the nodes
        let lattice = triangle_lattice(degree);
        let n = lattice.len();
        let k = degree as f64;
        let vandermonde = DMatrix::from_fn(n, n, |node, m| {
            let (a, b) = lattice[node];
            monomial(lattice[m], &Point2::new(a as f64 / k, b as f64 / k))
        });
        let coefficients = vandermonde
            .try_inverse()
            .ok_or_else(|| eyre!("Vandermonde matrix of degree {} is singular", degree))?;

        Ok(Self {
            degree,
            lattice,
            coefficients,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn num_nodes(&self) -> usize {
        self.lattice.len()
    }

    /// Lattice indices `(a, b)` of the nodes, in local node order.
    pub fn lattice(&self) -> &[(usize, usize)] {
        &self.lattice
    }

    pub fn reference_nodes(&self) -> Vec<Point2<f64>> {
        let k = self.degree as f64;
        self.lattice
            .iter()
            .map(|&(a, b)| Point2::new(a as f64 / k, b as f64 / k))
            .collect()
    }

    /// Values of all basis functions at the reference point `xi`.
    pub fn evaluate_basis(&self, xi: &Point2<f64>) -> DVector<f64> {
        let monomials = DVector::from_iterator(self.num_nodes(), self.lattice.iter().map(|&e| monomial(e, xi)));
        self.coefficients.tr_mul(&monomials)
    }

    /// Reference gradients of all basis functions at `xi`, one column per basis function.
    pub fn evaluate_gradients(&self, xi: &Point2<f64>) -> Matrix2xX<f64> {
        let n = self.num_nodes();
        let mut monomial_gradients = Matrix2xX::zeros(n);
        for (m, &(i, j)) in self.lattice.iter().enumerate() {
            if i > 0 {
                monomial_gradients[(0, m)] = i as f64 * monomial((i - 1, j), xi);
            }
            if j > 0 {
                monomial_gradients[(1, m)] = j as f64 * monomial((i, j - 1), xi);
            }
        }
        monomial_gradients * &self.coefficients
    }
}

/// Basis function values tabulated at the points of a quadrature rule.
#[derive(Debug, Clone, PartialEq)]
struct BasisTable {
    quadrature: TriangleQuadrature,
    /// Entry `(q, n)` is basis function `n` at quadrature point `q`.
    values: DMatrix<f64>,
}

impl BasisTable {
    fn tabulate(element: &LagrangeTriangle, quadrature: TriangleQuadrature) -> Self {
        let mut values = DMatrix::zeros(quadrature.len(), element.num_nodes());
        for (q, xi) in quadrature.points().iter().enumerate() {
            values.row_mut(q).tr_copy_from(&element.evaluate_basis(xi));
        }
        Self { quadrature, values }
    }
}

/// The space of continuous, piecewise polynomial functions of a given degree on a
/// [`UnitSquareMesh`].
///
/// Because the mesh is uniform, the nodes of the space form the grid `(i / (kN), j / (kN))`,
/// `0 <= i, j <= kN`, and node `(i, j)` has the global index `j (kN + 1) + i`. Partitions are
/// contiguous blocks of cell rows; a partition owns the node rows starting in its cell rows, and
/// the last partition additionally owns the top node row.
#[derive(Debug, Clone)]
pub struct LagrangeSpace {
    mesh: UnitSquareMesh,
    element: Arc<LagrangeTriangle>,
    norm_table: Arc<BasisTable>,
    num_partitions: usize,
}

impl LagrangeSpace {
    /// Creates the space, using one partition per cell row.
    pub fn new(mesh: UnitSquareMesh, degree: usize) -> eyre::Result<Self> {
        let element = LagrangeTriangle::new(degree)?;
        // The integrand of the squared norm is a polynomial of degree 2k
        let norm_table = BasisTable::tabulate(&element, TriangleQuadrature::with_strength(2 * degree));
        Ok(Self {
            mesh,
            element: Arc::new(element),
            norm_table: Arc::new(norm_table),
            num_partitions: mesh.cells_per_dim(),
        })
    }

    /// Sets the number of partitions, clamped to `1 ..= N`.
    pub fn with_partitions(mut self, num_partitions: usize) -> Self {
        self.num_partitions = num_partitions.clamp(1, self.mesh.cells_per_dim());
        self
    }

    pub fn mesh(&self) -> &UnitSquareMesh {
        &self.mesh
    }

    pub fn element(&self) -> &LagrangeTriangle {
        &self.element
    }

    /// Number of nodes along each axis, `kN + 1`.
    pub fn nodes_per_dim(&self) -> usize {
        self.element.degree() * self.mesh.cells_per_dim() + 1
    }

    pub fn node_coordinates(&self, dof: usize) -> Point2<f64> {
        let m = self.nodes_per_dim();
        let intervals = (m - 1) as f64;
        Point2::new((dof % m) as f64 / intervals, (dof / m) as f64 / intervals)
    }

    /// Whether the node lies on the boundary of the unit square.
    pub fn is_boundary_dof(&self, dof: usize) -> bool {
        let m = self.nodes_per_dim();
        let (i, j) = (dof % m, dof / m);
        i == 0 || j == 0 || i == m - 1 || j == m - 1
    }

    /// Global indices of the nodes of an element, in local node order.
    pub fn populate_element_dofs(&self, element: usize, dofs: &mut Vec<usize>) {
        let k = self.element.degree();
        let m = self.nodes_per_dim();
        let (ix, iy, orientation) = self.mesh.element_cell(element);
        dofs.clear();
        dofs.extend(self.element.lattice().iter().map(|&(a, b)| {
            let (i, j) = match orientation {
                TriangleOrientation::Lower => (k * ix + a, k * iy + b),
                TriangleOrientation::Upper => (k * ix + k - a, k * iy + k - b),
            };
            j * m + i
        }));
    }

    fn partition_rows(&self, partition: usize) -> Range<usize> {
        let n = self.mesh.cells_per_dim();
        let p = self.num_partitions;
        (partition * n / p)..((partition + 1) * n / p)
    }

    /// The elements of the given partition.
    pub fn partition_elements(&self, partition: usize) -> Range<usize> {
        self.mesh.elements_in_rows(self.partition_rows(partition))
    }
}

impl FunctionSpace for LagrangeSpace {
    fn geometry_dim(&self) -> usize {
        2
    }

    fn degree(&self) -> usize {
        self.element.degree()
    }

    fn num_dofs(&self) -> usize {
        self.nodes_per_dim() * self.nodes_per_dim()
    }

    fn with_degree(&self, degree: usize) -> eyre::Result<Self> {
        Ok(LagrangeSpace::new(self.mesh, degree)?.with_partitions(self.num_partitions))
    }

    fn interpolate(&self, f: &(dyn Fn(&[f64]) -> f64 + Sync)) -> DVector<f64> {
        let values: Vec<f64> = (0..self.num_dofs())
            .into_par_iter()
            .map(|dof| f(self.node_coordinates(dof).coords.as_slice()))
            .collect();
        DVector::from_vec(values)
    }

    fn interpolate_field(&self, field: &DiscreteField<Self>) -> eyre::Result<DVector<f64>> {
        let source = field.space();
        if source.mesh != self.mesh {
            bail!(
                "cannot interpolate a field on a mesh with {} cells per dimension into a space on a mesh with {}",
                source.mesh.cells_per_dim(),
                self.mesh.cells_per_dim()
            );
        }
        debug!(
            "Interpolating P{} field into P{} space ({} DOFs)",
            source.degree(),
            self.degree(),
            self.num_dofs()
        );

        // Source basis functions evaluated at the reference nodes of the target element.
        // Every element uses the same reference coordinates, so this is computed once.
        let target_nodes = self.element.reference_nodes();
        let mut transfer = DMatrix::zeros(target_nodes.len(), source.element.num_nodes());
        for (t, xi) in target_nodes.iter().enumerate() {
            transfer
                .row_mut(t)
                .tr_copy_from(&source.element.evaluate_basis(xi));
        }

        let source_coefficients = field.coefficients();
        let mut result = DVector::zeros(self.num_dofs());
        let mut assigned = vec![false; self.num_dofs()];
        let mut source_dofs = Vec::new();
        let mut target_dofs = Vec::new();
        let mut local_source = DVector::zeros(source.element.num_nodes());
        for element in 0..self.mesh.num_elements() {
            source.populate_element_dofs(element, &mut source_dofs);
            self.populate_element_dofs(element, &mut target_dofs);
            for (local, &dof) in izip!(local_source.iter_mut(), &source_dofs) {
                *local = source_coefficients[dof];
            }
            for (t, &dof) in target_dofs.iter().enumerate() {
                // Shared nodes take their value from the first element visiting them
                if !assigned[dof] {
                    result[dof] = transfer.row(t).dot(&local_source.transpose());
                    assigned[dof] = true;
                }
            }
        }

        Ok(result)
    }

    fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    fn partition_l2_norm_squared(&self, partition: usize, coefficients: &DVector<f64>) -> f64 {
        let table = &self.norm_table;
        let weights = table.quadrature.weights();
        let det_j = self.mesh.jacobian_determinant_abs();

        let mut dofs = Vec::new();
        let mut local = DVector::zeros(self.element.num_nodes());
        let mut result = 0.0;
        for element in self.partition_elements(partition) {
            self.populate_element_dofs(element, &mut dofs);
            for (value, &dof) in izip!(local.iter_mut(), &dofs) {
                *value = coefficients[dof];
            }
            let values_at_points = &table.values * &local;
            for (w, u) in izip!(weights, values_at_points.iter()) {
                result += w * u * u * det_j;
            }
        }
        result
    }

    fn partition_dofs(&self, partition: usize) -> Range<usize> {
        let k = self.element.degree();
        let m = self.nodes_per_dim();
        let rows = self.partition_rows(partition);
        let start = k * rows.start * m;
        let end = if partition + 1 == self.num_partitions {
            m * m
        } else {
            k * rows.end * m
        };
        start..end
    }
}
