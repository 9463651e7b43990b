//! PartitionError: Unified error type for mesh-bisect public APIs
//!
//! Every fallible entry point of the crate reports failures through this type.
//! A disconnected subgraph is not an error: the spectral bisector handles it with
//! a component-boundary split and records that path in the split diagnostics
//! (see [`SplitPath::ComponentBoundary`](crate::partitioning::SplitPath)).

use crate::partitioning::Strategy;
use thiserror::Error;

/// Unified error type for partitioning operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartitionError {
    /// Malformed input: bad part count, missing or mismatched coordinates,
    /// invalid edge weights, out-of-range vertices or labels.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A vertex subset is smaller than the number of labels it must carry.
    #[error("cannot split {subset_size} vertices into {labels} parts")]
    InsufficientVertices { subset_size: usize, labels: usize },
    /// A bisector returned an empty half for a subset of at least two vertices.
    #[error("{strategy} bisection of {subset_size} vertices produced an empty half")]
    DegenerateSplit { subset_size: usize, strategy: Strategy },
    /// A degenerate split persisted after the perturbed retry.
    #[error("{strategy} bisection failed on a subset of {subset_size} vertices")]
    PartitioningFailed { subset_size: usize, strategy: Strategy },
    /// The iterative eigensolver exhausted its restart budget.
    #[error("eigensolver did not converge after {iterations} iterations (residual {residual:e})")]
    EigenConvergenceFailure { iterations: usize, residual: f64 },
    /// Failure reported by the external multiway partitioner.
    #[error("multiway partitioner error: {0}")]
    External(String),
}

impl PartitionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PartitionError::InvalidArgument(msg.into())
    }
}
