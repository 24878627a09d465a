//! Errors raised at the journal load boundary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read journal file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Journal is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date key '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("{date}: unknown category '{value}'")]
    UnknownCategory { date: String, value: String },

    #[error("{date}: unknown confidence type '{value}'")]
    UnknownConfidenceType { date: String, value: String },

    #[error("{date}: power level {value} is outside 1-10")]
    PowerLevelOutOfRange { date: String, value: i64 },

    #[error("{date}: malformed entry: {reason}")]
    MalformedEntry { date: String, reason: String },

    #[error("{date}: malformed day record: {reason}")]
    MalformedDay { date: String, reason: String },
}
