use matrixcompare::assert_scalar_eq;
use mms_convergence::mesh::{TriangleOrientation, UnitSquareMesh};
use nalgebra::Point2;

#[test]
fn element_numbering() {
    let mesh = UnitSquareMesh::new(3);
    assert_eq!(mesh.num_elements(), 18);
    assert_eq!(mesh.element_cell(0), (0, 0, TriangleOrientation::Lower));
    assert_eq!(mesh.element_cell(1), (0, 0, TriangleOrientation::Upper));
    assert_eq!(mesh.element_cell(7), (0, 1, TriangleOrientation::Upper));
    assert_eq!(mesh.element_cell(10), (2, 1, TriangleOrientation::Lower));
    assert_eq!(mesh.elements_in_rows(1..3), 6..18);
}

#[test]
fn element_vertices() {
    let mesh = UnitSquareMesh::new(2);
    // Cell (1, 0)
    let lower = mesh.element_vertices(2);
    let upper = mesh.element_vertices(3);
    assert_eq!(lower, [Point2::new(0.5, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 0.5)]);
    assert_eq!(upper, [Point2::new(1.0, 0.5), Point2::new(0.5, 0.5), Point2::new(1.0, 0.0)]);
}

#[test]
fn triangles_cover_the_unit_square() {
    for n in [1, 2, 5] {
        let mesh = UnitSquareMesh::new(n);
        let total_area: f64 = (0..mesh.num_elements())
            .map(|e| {
                let [a, b, c] = mesh.element_vertices(e);
                0.5 * (b - a).perp(&(c - a)).abs()
            })
            .sum();
        assert_scalar_eq!(total_area, 1.0, comp = abs, tol = 1e-14);
        assert_scalar_eq!(
            0.5 * mesh.jacobian_determinant_abs() * mesh.num_elements() as f64,
            1.0,
            comp = abs,
            tol = 1e-14
        );
    }
}

#[test]
fn reference_jacobian_factor_matches_map() {
    let mesh = UnitSquareMesh::new(4);
    for e in 0..mesh.num_elements() {
        let origin = mesh.map_reference_coords(e, &Point2::origin());
        let unit_x = mesh.map_reference_coords(e, &Point2::new(1.0, 0.0));
        assert_scalar_eq!(unit_x.x - origin.x, mesh.reference_jacobian_factor(e), comp = abs, tol = 1e-15);
        assert_eq!(unit_x.y, origin.y);
    }
}

#[test]
#[should_panic]
fn empty_mesh_panics() {
    UnitSquareMesh::new(0);
}
