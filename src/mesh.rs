//! Uniform triangulations of the unit square.
use nalgebra::{Point2, Vector2};
use std::ops::Range;

/// Orientation of a triangle inside its square cell.
///
/// Every cell `[x0, x0 + h] x [y0, y0 + h]` is split along the diagonal from `(x0, y0 + h)` to
/// `(x0 + h, y0)`. The lower triangle has its right angle at `(x0, y0)`, the upper triangle at
/// `(x0 + h, y0 + h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOrientation {
    Lower,
    Upper,
}

/// The uniform triangulation of `[0, 1]^2` with `N x N` square cells, each split into two
/// triangles.
///
/// Triangles are numbered cell by cell, row by row from the bottom, with the lower triangle of a
/// cell before the upper one. Triangle `2 (iy N + ix) + o` thus belongs to cell `(ix, iy)`.
///
/// All triangles are affine images of the reference triangle `(0, 0), (1, 0), (0, 1)`:
///
/// - lower: `x = (x0, y0) + h xi`,
/// - upper: `x = (x0 + h, y0 + h) - h xi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSquareMesh {
    cells_per_dim: usize,
}

impl UnitSquareMesh {
    /// Creates the mesh with the given number of cells per dimension.
    ///
    /// # Panics
    ///
    /// Panics if `cells_per_dim` is zero.
    pub fn new(cells_per_dim: usize) -> Self {
        assert!(cells_per_dim > 0, "mesh must have at least one cell per dimension");
        Self { cells_per_dim }
    }

    pub fn cells_per_dim(&self) -> usize {
        self.cells_per_dim
    }

    /// The cell size `h = 1 / N`.
    pub fn cell_size(&self) -> f64 {
        1.0 / self.cells_per_dim as f64
    }

    pub fn num_elements(&self) -> usize {
        2 * self.cells_per_dim * self.cells_per_dim
    }

    /// Cell coordinates `(ix, iy)` and orientation of the given triangle.
    pub fn element_cell(&self, element: usize) -> (usize, usize, TriangleOrientation) {
        let cell = element / 2;
        let orientation = if element % 2 == 0 {
            TriangleOrientation::Lower
        } else {
            TriangleOrientation::Upper
        };
        (cell % self.cells_per_dim, cell / self.cells_per_dim, orientation)
    }

    /// Elements of the given range of cell rows.
    pub fn elements_in_rows(&self, rows: Range<usize>) -> Range<usize> {
        let per_row = 2 * self.cells_per_dim;
        per_row * rows.start..per_row * rows.end
    }

    /// Maps reference coordinates to physical coordinates on the given element.
    pub fn map_reference_coords(&self, element: usize, xi: &Point2<f64>) -> Point2<f64> {
        let h = self.cell_size();
        let (ix, iy, orientation) = self.element_cell(element);
        let corner = Point2::new(ix as f64 * h, iy as f64 * h);
        match orientation {
            TriangleOrientation::Lower => corner + xi.coords * h,
            TriangleOrientation::Upper => corner + Vector2::new(h, h) - xi.coords * h,
        }
    }

    /// The (constant) scaling `J = dx/dxi = s h I` of the reference map, returned as the signed
    /// factor `s h`.
    pub fn reference_jacobian_factor(&self, element: usize) -> f64 {
        match self.element_cell(element).2 {
            TriangleOrientation::Lower => self.cell_size(),
            TriangleOrientation::Upper => -self.cell_size(),
        }
    }

    /// `|det J|`, which is the same for all elements.
    pub fn jacobian_determinant_abs(&self) -> f64 {
        self.cell_size() * self.cell_size()
    }

    /// The vertices of the given triangle, in the order of the reference corners.
    pub fn element_vertices(&self, element: usize) -> [Point2<f64>; 3] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]
        .map(|xi| self.map_reference_coords(element, &xi))
    }
}
