use thiserror::Error;

/// Errors returned by clustering operations in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Paired point/assignment sequences have different lengths.
    #[error("length mismatch: {points} points, {assignments} assignments")]
    LengthMismatch {
        /// Number of points.
        points: usize,
        /// Number of assignments.
        assignments: usize,
    },

    /// A statistic was requested over a cluster with no members.
    #[error("cluster {cluster} has no members")]
    EmptyCluster {
        /// Cluster label.
        cluster: usize,
    },

    /// The assignment vector did not stabilize within the iteration cap.
    #[error("assignments did not stabilize within {max_iter} iterations")]
    NonConvergence {
        /// Configured iteration cap.
        max_iter: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
