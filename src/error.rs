//! Typed failure kinds of the descriptor parsing contract.
//!
//! Extractors substitute defaults for anything missing or odd in a
//! descriptor, so only two things can actually fail: obtaining the content
//! at all, and deserializing a structured document.

use thiserror::Error;

/// Errors the parsing pipeline can surface to callers.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor content could not be obtained from its source.
    #[error("failed to read descriptor content")]
    Read(#[from] std::io::Error),

    /// A structured descriptor could not be deserialized.
    #[error("invalid structured document")]
    InvalidDocument(#[from] serde_json::Error),
}
