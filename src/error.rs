//! Error types for kivun operations.

use thiserror::Error;

/// Errors that can occur while parsing patterns or loading settings.
///
/// Classification itself never fails: an unparseable pattern is treated as a
/// non-match at the point of use, and text with nothing to classify is left
/// unannotated.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid element pattern: {0}")]
    InvalidPattern(String),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
