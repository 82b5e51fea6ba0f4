use crate::lagrange_space;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use mms_convergence::lagrange::{LagrangeSpace, LagrangeTriangle, MAX_LAGRANGE_DEGREE};
use mms_convergence::mesh::UnitSquareMesh;
use mms_convergence::space::{DiscreteField, FunctionSpace};
use nalgebra::{DMatrix, DVector, Point2};
use proptest::prelude::*;

#[test]
fn unsupported_degrees_are_rejected() {
    assert!(LagrangeTriangle::new(0).is_err());
    assert!(LagrangeTriangle::new(MAX_LAGRANGE_DEGREE + 1).is_err());
    assert!(LagrangeSpace::new(UnitSquareMesh::new(2), 0).is_err());
}

#[test]
fn basis_is_nodal() {
    for degree in 1..=6 {
        let element = LagrangeTriangle::new(degree).unwrap();
        let n = element.num_nodes();
        assert_eq!(n, (degree + 1) * (degree + 2) / 2);
        let mut values = DMatrix::zeros(n, n);
        for (i, xi) in element.reference_nodes().iter().enumerate() {
            values.row_mut(i).tr_copy_from(&element.evaluate_basis(xi));
        }
        assert_matrix_eq!(values, DMatrix::identity(n, n), comp = abs, tol = 1e-10);
    }
}

#[test]
fn linear_basis_gradients() {
    let element = LagrangeTriangle::new(1).unwrap();
    let gradients = element.evaluate_gradients(&Point2::new(0.2, 0.3));
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(2, 3, &[
        -1.0, 1.0, 0.0,
        -1.0, 0.0, 1.0,
    ]);
    assert_matrix_eq!(gradients, expected, comp = abs, tol = 1e-12);
}

proptest! {
    #[test]
    fn basis_is_partition_of_unity(degree in 1..=6usize, a in 0.0..1.0f64, t in 0.0..1.0f64) {
        let element = LagrangeTriangle::new(degree).unwrap();
        let xi = Point2::new(a, t * (1.0 - a));
        let sum: f64 = element.evaluate_basis(&xi).sum();
        let gradient_sum = element.evaluate_gradients(&xi).column_sum();
        prop_assert!((sum - 1.0).abs() < 1e-8);
        prop_assert!(gradient_sum.norm() < 1e-6);
    }
}

#[test]
fn dof_counts_and_boundary() {
    for (n, degree) in [(1, 1), (3, 2), (4, 3)] {
        let space = lagrange_space(n, degree);
        let m = degree * n + 1;
        assert_eq!(space.nodes_per_dim(), m);
        assert_eq!(space.num_dofs(), m * m);
        let num_boundary = (0..space.num_dofs())
            .filter(|&dof| space.is_boundary_dof(dof))
            .count();
        assert_eq!(num_boundary, 4 * (m - 1));
    }
}

#[test]
fn element_dofs_are_located_at_mapped_nodes() {
    let space = lagrange_space(3, 3);
    let reference_nodes = space.element().reference_nodes();
    let mut dofs = Vec::new();
    for e in 0..space.mesh().num_elements() {
        space.populate_element_dofs(e, &mut dofs);
        for (&dof, xi) in dofs.iter().zip(&reference_nodes) {
            let x = space.mesh().map_reference_coords(e, xi);
            let node = space.node_coordinates(dof);
            assert_matrix_eq!(x.coords, node.coords, comp = abs, tol = 1e-14);
        }
    }
}

#[test]
fn every_dof_belongs_to_some_element() {
    let space = lagrange_space(2, 4);
    let mut visited = vec![false; space.num_dofs()];
    let mut dofs = Vec::new();
    for e in 0..space.mesh().num_elements() {
        space.populate_element_dofs(e, &mut dofs);
        for &dof in &dofs {
            visited[dof] = true;
        }
    }
    assert!(visited.into_iter().all(|v| v));
}

#[test]
fn partitions_cover_dofs_and_elements() {
    for num_partitions in [1, 2, 3, 5] {
        let space = lagrange_space(5, 2).with_partitions(num_partitions);
        assert_eq!(space.num_partitions(), num_partitions);
        let mut next_dof = 0;
        let mut next_element = 0;
        for p in 0..space.num_partitions() {
            let dofs = space.partition_dofs(p);
            let elements = space.partition_elements(p);
            assert_eq!(dofs.start, next_dof);
            assert_eq!(elements.start, next_element);
            assert!(!dofs.is_empty());
            next_dof = dofs.end;
            next_element = elements.end;
        }
        assert_eq!(next_dof, space.num_dofs());
        assert_eq!(next_element, space.mesh().num_elements());
    }
}

#[test]
fn partition_count_is_clamped() {
    assert_eq!(lagrange_space(4, 1).num_partitions(), 4);
    assert_eq!(lagrange_space(4, 1).with_partitions(0).num_partitions(), 1);
    assert_eq!(lagrange_space(4, 1).with_partitions(9).num_partitions(), 4);
}

#[test]
fn interpolation_reproduces_polynomials() {
    let f = |x: &[f64]| 1.0 + x[0] - 2.0 * x[0] * x[1] + 0.5 * x[1].powi(3);
    let field = DiscreteField::interpolate(lagrange_space(3, 3), f);

    // Evaluate the interpolant through a higher-degree interpolation and compare at all nodes
    let fine = lagrange_space(3, 5);
    let transferred = fine.interpolate_field(&field).unwrap();
    let expected = fine.interpolate(&f);
    assert_matrix_eq!(transferred, expected, comp = abs, tol = 1e-11);
}

#[test]
fn interpolating_into_same_degree_is_identity() {
    let field = DiscreteField::interpolate(lagrange_space(4, 2), |x: &[f64]| (3.0 * x[0]).sin() * x[1]);
    let coefficients = field.space().interpolate_field(&field).unwrap();
    assert_matrix_eq!(coefficients, field.coefficients().clone(), comp = abs, tol = 1e-13);
}

#[test]
fn interpolating_field_from_other_mesh_fails() {
    let field = DiscreteField::interpolate(lagrange_space(2, 1), |x: &[f64]| x[0]);
    assert!(lagrange_space(4, 1).interpolate_field(&field).is_err());
}

#[test]
fn from_coefficients_checks_length() {
    let space = lagrange_space(2, 1);
    assert!(DiscreteField::from_coefficients(space.clone(), DVector::zeros(9)).is_ok());
    assert!(DiscreteField::from_coefficients(space, DVector::zeros(8)).is_err());
}

#[test]
fn partition_norms_sum_to_integral() {
    // The integral of x^2 over the unit square is 1/3
    let space = lagrange_space(4, 2);
    let coefficients = space.interpolate(&|x: &[f64]| x[0]);
    let total: f64 = (0..space.num_partitions())
        .map(|p| space.partition_l2_norm_squared(p, &coefficients))
        .sum();
    assert_scalar_eq!(total, 1.0 / 3.0, comp = abs, tol = 1e-13);
}
