use std::path::PathBuf;

use thiserror::Error;

use crate::state::StateError;

/// Transport-level failure while executing one statement against the store.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to run `{command}`: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("`{command}` failed with code {code:?}: {}", stderr.trim())]
    CommandFailed { command: String, code: Option<i32>, stderr: String },

    #[error("database `{}` does not exist", path.display())]
    MissingDatabase { path: PathBuf },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl QueryError {
    /// The store answered but the statement does not fit its schema (missing
    /// table or column), as opposed to the store being unreachable.
    pub fn is_schema_mismatch(&self) -> bool {
        let message = match self {
            Self::CommandFailed { stderr, .. } => stderr.clone(),
            Self::Sqlite(error) => error.to_string(),
            Self::SpawnFailed { .. } | Self::MissingDatabase { .. } => return false,
        };
        message.contains("no such table") || message.contains("no such column")
    }
}

/// Failures the repository surfaces to its caller. Per-line parse rejections
/// never appear here.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("workspace database `{}` is unavailable", path.display())]
    StoreUnavailable { path: PathBuf, source: QueryError },

    #[error("workspace query against `{}` failed", path.display())]
    StoreQueryFailed { path: PathBuf, source: QueryError },

    #[error("workspace database schema version {version} is not supported")]
    UnsupportedSchema { version: i64 },

    #[error(transparent)]
    State(#[from] StateError),
}

impl RepositoryError {
    /// Stable machine-readable code for CLI output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::StoreQueryFailed { .. } => "STORE_QUERY_FAILED",
            Self::UnsupportedSchema { .. } => "UNSUPPORTED_SCHEMA",
            Self::State(_) => "STATE_ERROR",
        }
    }
}
