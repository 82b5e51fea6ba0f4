//! Discretization error norms.
//!
//! Both norms compare a discrete approximation $u_h$ of degree $p$ with an exact solution $u$.
//!
//! - [`compute_l2_error`] interpolates *both* $u_h$ and $u$ into a common space of degree
//!   $p + r$ and integrates the squared difference of the interpolants. Differencing in the
//!   higher-order space instead of at quadrature points keeps the computed error accurate when it
//!   is close to machine precision.
//! - [`compute_inf_error`] interpolates $u$ into the space of $u_h$ and takes the largest absolute
//!   difference of the coefficient vectors. This is a nodal error, not the true supremum norm.
//!
//! Partition contributions are computed in parallel, collected in partition order and combined
//! sequentially, then reduced across processes through the space's
//! [`Communicator`](crate::comm::Communicator).
use crate::comm::ReduceOp;
use crate::error::ConvergenceError;
use crate::exact::ExactSolution;
use crate::space::{DiscreteField, FunctionSpace};
use log::debug;
use nalgebra::DVector;
use rayon::prelude::*;
use std::ops::Range;

/// Degree raise used for the common space of [`compute_l2_error`] unless configured otherwise.
pub const DEFAULT_DEGREE_RAISE: usize = 3;

/// Computes $\norm{u_h - u}_{L^2}$ in the space of degree `approx.degree() + degree_raise`.
///
/// The result is non-negative, and zero exactly when the two interpolants have identical
/// coefficients.
#[allow(non_snake_case)]
pub fn compute_l2_error<S: FunctionSpace>(
    approx: &DiscreteField<S>,
    exact: &ExactSolution,
    degree_raise: usize,
) -> Result<f64, ConvergenceError> {
    // Fail before doing any work if the exact solution cannot be sampled at all
    exact.validate_for_dim(approx.space().geometry_dim())?;

    let degree = approx.degree() + degree_raise;
    let space = approx
        .space()
        .with_degree(degree)
        .map_err(ConvergenceError::FunctionSpace)?;
    let u = exact.interpolate(&space)?;
    let u_h = space
        .interpolate_field(approx)
        .map_err(ConvergenceError::FunctionSpace)?;
    let error = u_h - u;

    let local_L2_squared = reduce_partitions(&space, ReduceOp::Sum, |partition| {
        space.partition_l2_norm_squared(partition, &error)
    });
    let L2_squared = space
        .communicator()
        .all_reduce(local_L2_squared, ReduceOp::Sum);
    debug!("Squared L2 error {:e} in P{} space", L2_squared, degree);

    Ok(L2_squared.sqrt())
}

/// Computes $\max_i |(u_h)_i - (I_h u)_i|$, where $I_h$ interpolates into the space of `approx`.
pub fn compute_inf_error<S: FunctionSpace>(
    approx: &DiscreteField<S>,
    exact: &ExactSolution,
) -> Result<f64, ConvergenceError> {
    let space = approx.space();
    let u = exact.interpolate(space)?;
    let u_h = approx.coefficients();
    let local_max = reduce_partitions(space, ReduceOp::Max, |partition| {
        max_abs_difference(u_h, &u, space.partition_dofs(partition))
    });
    let max = space.communicator().all_reduce(local_max, ReduceOp::Max);
    // A space without any degrees of freedom has no error
    if max == f64::NEG_INFINITY {
        Ok(0.0)
    } else {
        Ok(max)
    }
}

fn max_abs_difference(a: &DVector<f64>, b: &DVector<f64>, dofs: Range<usize>) -> f64 {
    ReduceOp::Max.fold(dofs.map(|i| (a[i] - b[i]).abs()))
}

/// Evaluates `contribution` for every partition of the space in parallel and folds the results
/// in partition order.
fn reduce_partitions<S, F>(space: &S, op: ReduceOp, contribution: F) -> f64
where
    S: FunctionSpace,
    F: Fn(usize) -> f64 + Sync + Send,
{
    let contributions: Vec<f64> = (0..space.num_partitions())
        .into_par_iter()
        .map(contribution)
        .collect();
    op.fold(contributions)
}
