//! Error type shared by norm evaluation, experiment runs and rate estimation.
use thiserror::Error;

/// Errors produced while measuring discretization errors or estimating convergence rates.
///
/// All variants are fatal for the computation that produced them. Callers are expected to abort
/// the affected resolution/degree run and report the failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvergenceError {
    /// The exact solution cannot be evaluated on the function space it is compared against.
    #[error("unsupported exact-solution representation: {reason}")]
    UnsupportedExactRepresentation { reason: String },

    /// A sample has a non-positive (or non-finite) error or mesh size, so log-ratios are undefined.
    #[error("degenerate sample at index {index}: h = {h:e}, error = {error:e}")]
    DegenerateSample { index: usize, h: f64, error: f64 },

    /// The mesh sizes of the samples are not strictly decreasing.
    #[error("unordered sample sequence: h at index {index} does not decrease")]
    UnorderedSampleSequence { index: usize },

    /// The solver oracle failed. The oracle's own error is kept unchanged as the source.
    #[error("solver oracle failed for resolution N = {resolution} and degree {degree}")]
    SolverOracleFailure {
        resolution: usize,
        degree: usize,
        #[source]
        source: eyre::Report,
    },

    /// A resolution of zero subdivisions has no mesh size.
    #[error("invalid resolution N = {resolution}, the number of subdivisions must be positive")]
    InvalidResolution { resolution: usize },

    /// Too few refinement levels to trust an asymptotic rate estimate.
    #[error("{available} refinement levels available, but at least {required} are required")]
    InsufficientRefinementLevels { available: usize, required: usize },

    /// A function space could not be constructed or could not interpolate a field.
    #[error("function space error: {0}")]
    FunctionSpace(#[source] eyre::Report),
}
