// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the library can surface to a caller.
///
/// Corrupt persisted state is deliberately absent: `MemoryStore::load`
/// recovers from it locally and never reports it.
#[derive(Debug, Error)]
pub enum FloppyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot must be a JSON object")]
    NotAnObject,

    #[error("snapshot field `{field}` has the wrong shape")]
    InvalidShape { field: &'static str },

    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    #[error("unknown generation strategy `{0}` (expected `windows` or `subsequences`)")]
    UnknownStrategy(String),

    #[error("could not persist memory to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FloppyError>;
