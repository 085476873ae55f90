//! Error types for SpanMark.

use thiserror::Error;

/// Everything that can go wrong outside of matching itself.
///
/// "No match" and unknown lookup keys are never errors; they come back as
/// empty collections.
#[derive(Debug, Error)]
pub enum SpanMarkError {
    #[error("entity text must not be empty (label {label:?})")]
    EmptyEntityText { label: String },

    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(i64),

    #[error("span [{start}, {end}) is out of range for a text of {len} characters")]
    SpanOutOfRange { start: usize, end: usize, len: usize },

    #[error("failed to build pattern automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SpanMarkError>;
