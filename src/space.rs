//! Finite element spaces as seen by the norm evaluator.
use crate::comm::{Communicator, SelfCommunicator};
use eyre::eyre;
use nalgebra::DVector;
use std::ops::Range;

/// A scalar finite element space with nodal (interpolatory) degrees of freedom.
///
/// The elements and degrees of freedom of a space are split into `num_partitions()` disjoint
/// partitions. Partitions are the unit of parallel work: norm contributions are computed per
/// partition and combined afterwards. A space distributed over several processes additionally
/// reports the [`Communicator`] that combines contributions across processes.
pub trait FunctionSpace: Clone + Send + Sync + Sized {
    /// Dimension of the physical domain.
    fn geometry_dim(&self) -> usize;

    /// Polynomial degree of the space.
    fn degree(&self) -> usize;

    fn num_dofs(&self) -> usize;

    /// A space on the same mesh with a different polynomial degree.
    fn with_degree(&self, degree: usize) -> eyre::Result<Self>;

    /// Nodal interpolation of a pointwise-evaluable function.
    fn interpolate(&self, f: &(dyn Fn(&[f64]) -> f64 + Sync)) -> DVector<f64>;

    /// Interpolates a discrete field defined on the same mesh (possibly with a different degree)
    /// into this space.
    ///
    /// If the degree of `field` does not exceed the degree of this space, the result represents
    /// the same function.
    fn interpolate_field(&self, field: &DiscreteField<Self>) -> eyre::Result<DVector<f64>>;

    fn num_partitions(&self) -> usize;

    /// The squared $L^2$ norm of the field with the given coefficients, restricted to the elements
    /// of the given partition.
    fn partition_l2_norm_squared(&self, partition: usize, coefficients: &DVector<f64>) -> f64;

    /// The degrees of freedom owned by the given partition.
    ///
    /// The ranges of all partitions are disjoint and together cover `0 .. num_dofs()`.
    fn partition_dofs(&self, partition: usize) -> Range<usize>;

    fn communicator(&self) -> &dyn Communicator {
        &SelfCommunicator
    }
}

/// A function in a finite element space, given by its coefficient vector.
#[derive(Debug, Clone)]
pub struct DiscreteField<S> {
    space: S,
    coefficients: DVector<f64>,
}

impl<S: FunctionSpace> DiscreteField<S> {
    /// Creates a field from its coefficients.
    ///
    /// Returns an error if the number of coefficients does not match the number of degrees of
    /// freedom of the space.
    pub fn from_coefficients(space: S, coefficients: DVector<f64>) -> eyre::Result<Self> {
        if coefficients.len() != space.num_dofs() {
            return Err(eyre!(
                "field has {} coefficients, but the space has {} degrees of freedom",
                coefficients.len(),
                space.num_dofs()
            ));
        }
        Ok(Self { space, coefficients })
    }

    /// The nodal interpolant of `f` in the given space.
    pub fn interpolate(space: S, f: impl Fn(&[f64]) -> f64 + Sync) -> Self {
        let coefficients = space.interpolate(&f);
        Self { space, coefficients }
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    pub fn coefficients(&self) -> &DVector<f64> {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.space.degree()
    }
}
