//! Report handling errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Per-message failure. None of these change engine state.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("rendering surface unavailable")]
    SurfaceUnavailable,
}

impl ReportError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        ReportError::Validation(msg.into())
    }
}
