//! Error types for tunnel carving

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("{operation} is not supported for {shape} shapes")]
    Unsupported {
        operation: &'static str,
        shape: &'static str,
    },

    #[error("collision bit {0} out of range (expected 0..=31)")]
    BitOutOfRange(u32),
}
