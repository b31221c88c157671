//! Error type shared by the consensus engine and the high-level API.

/// Failures that end a consensus run without a usable model.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    /// Fewer correspondences than the problem's minimal sample size.
    #[error("problem requires at least {required} correspondences, got {available}")]
    InsufficientData {
        /// Minimal sample size of the problem.
        required: usize,
        /// Number of correspondences available.
        available: usize,
    },

    /// Too many consecutive samples failed to produce a hypothesis.
    #[error("{attempts} consecutive samples were degenerate")]
    DegenerateData {
        /// Number of consecutive degenerate draws that triggered the failure.
        attempts: usize,
    },

    /// The iteration budget was spent without accepting any hypothesis.
    #[error("no hypothesis reached a non-empty consensus set after {iterations} iterations")]
    NoConsensus {
        /// Iterations performed before giving up.
        iterations: usize,
    },

    /// Settings rejected before sampling started.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Group partition is not a disjoint cover of the correspondence indices.
    #[error("invalid group partition: {0}")]
    InvalidPartition(String),

    /// Two correspondence arrays that must be paired differ in length.
    #[error("mismatched correspondence lengths: {left} != {right}")]
    MismatchedLengths {
        /// Length of the first array.
        left: usize,
        /// Length of the second array.
        right: usize,
    },
}
