//! Collective reductions of scalar norm contributions.
//!
//! A discrete field may be distributed over several cooperating processes, each owning a part of
//! the mesh. Norms are then computed from per-process contributions that have to be combined by
//! a collective all-reduce before any process can use the result. [`Communicator`] abstracts over
//! the transport; [`SelfCommunicator`] is the trivial single-process group.

/// Reduction operation of an all-reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Max,
}

impl ReduceOp {
    /// The neutral element of the operation.
    pub fn identity(&self) -> f64 {
        match self {
            Self::Sum => 0.0,
            Self::Max => f64::NEG_INFINITY,
        }
    }

    /// Combines two values. `Max` propagates NaN instead of discarding it like `f64::max`.
    pub fn combine(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Sum => a + b,
            Self::Max if a.is_nan() || b.is_nan() => f64::NAN,
            Self::Max => a.max(b),
        }
    }

    /// Folds `values` in order, so that the result is reproducible bit for bit.
    pub fn fold(&self, values: impl IntoIterator<Item = f64>) -> f64 {
        values
            .into_iter()
            .fold(self.identity(), |acc, value| self.combine(acc, value))
    }
}

/// A group of processes taking part in collective reductions.
pub trait Communicator: Send + Sync {
    /// Index of this process in the group.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Combines `local` over all processes of the group. Every process receives the same result.
    fn all_reduce(&self, local: f64, op: ReduceOp) -> f64;
}

/// The group consisting only of the calling process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelfCommunicator;

impl Communicator for SelfCommunicator {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce(&self, local: f64, _op: ReduceOp) -> f64 {
        local
    }
}
