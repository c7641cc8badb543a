use super::DistribType;
use crate::xml::Violation;

/// Errors raised by model mutations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Distribution slot beyond the mixture size
    #[error("distrib index {index} out of range (distrib count {count})")]
    DistribIndex {
        /// Requested slot
        index: usize,
        /// Number of slots
        count: usize,
    },

    /// Vector or matrix coordinate beyond the vector size
    #[error("vector index {index} out of range (vector size {vect_size})")]
    VectorIndex {
        /// Requested coordinate
        index: usize,
        /// Vector size of the distribution
        vect_size: usize,
    },

    /// A full covariance entry was addressed without its column
    #[error("index j missing for a full covariance entry")]
    MissingColumn,

    /// Link to a pool entry that does not exist yet
    #[error("distrib {index} is not in the pool (pool size {count})")]
    UnknownPoolDistrib {
        /// Requested pool index
        index: usize,
        /// Current pool size
        count: usize,
    },

    /// Reference to a mixture that does not exist
    #[error("mixture {index} does not exist (mixture count {count})")]
    UnknownMixture {
        /// Requested mixture index
        index: usize,
        /// Current mixture count
        count: usize,
    },

    /// GD where GF was expected, or the reverse
    #[error("family mismatch: expected {expected}, found {found}")]
    FamilyMismatch {
        /// Family required by the operation
        expected: DistribType,
        /// Family actually present
        found: DistribType,
    },

    /// Distribution of the wrong dimension
    #[error("vector size mismatch: expected {expected}, found {found}")]
    VectSizeMismatch {
        /// Required dimension
        expected: usize,
        /// Actual dimension
        found: usize,
    },

    /// Shape whose parameters exceed the allocation limit
    #[error("{count} {kind} distributions of vector size {vect_size} exceed the model size limit")]
    TooLarge {
        /// Family of the distributions
        kind: DistribType,
        /// Requested dimension
        vect_size: usize,
        /// Requested number of distributions
        count: usize,
    },

    /// Mixture id already used in the server
    #[error("mixture id '{0}' is already used")]
    DuplicateId(String),
}

impl From<ModelError> for Violation {
    fn from(e: ModelError) -> Self {
        Violation(e.to_string())
    }
}
