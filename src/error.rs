//! Error types for the subdiv-eval crate.

use thiserror::Error;

/// Main error type for subdiv-eval operations.
///
/// Most variants are raised during table or descriptor construction; the
/// evaluation entry points only add output bounds errors. A sample that
/// cannot be located is not an error — it reports a plain `false` (see
/// [`evaluate_sample()`](crate::osd::evaluate_sample)).
#[derive(Debug, Error)]
pub enum Error {
    /// A patch array references a patch type value outside the known set.
    /// This means the upstream table construction is broken.
    #[error("Invalid patch type value: {0}")]
    InvalidPatchType(u32),

    /// Invalid patch table configuration.
    #[error("Invalid patch table: {0}")]
    InvalidPatchTable(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds (max: {max})")]
    IndexOutOfBounds { index: usize, max: usize },

    /// Invalid buffer descriptor layout.
    #[error("Invalid buffer descriptor: length {length} exceeds stride {stride}")]
    InvalidBufferDescriptor { length: usize, stride: usize },

    /// Invalid buffer size.
    #[error("Invalid buffer size: expected at least {expected}, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
