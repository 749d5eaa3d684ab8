//! Failures of a single decode pipeline run.
//!
//! Every variant is recoverable: the poll loop drops the tick and keeps the last
//! good snapshot on screen.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a complete gzip stream, or do not inflate to UTF-8.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("payload inflates past the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("malformed json: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Parsed fine, but matches neither the compact nor the expanded layout.
    #[error("invalid snapshot shape: {0}")]
    InvalidSnapshotShape(String),

    /// The blocking decode task died before returning.
    #[error("decode worker failed: {0}")]
    Worker(String),
}

pub type DecodeResult<T> = Result<T, DecodeError>;
