//! Error types for message decoding.

use thiserror::Error;

/// Errors raised while decoding wire payloads or command records.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Invalid line value on the wire: {0}")]
    InvalidLine(u8),

    #[error("Unknown command tag: {0:?}")]
    UnknownCommandTag(String),

    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
