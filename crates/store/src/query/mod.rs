// Store query collaborators. Each one runs a single SQL statement against the
// editor's database and answers in sqlite3 list-mode text: one row per line,
// columns separated by `|`, NULL as an empty field.

pub mod embedded;
pub mod sqlite_cli;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

pub use embedded::EmbeddedSqlite;
pub use sqlite_cli::SqliteCli;

pub const COLUMN_SEPARATOR: char = '|';

pub trait StoreQuery {
    fn execute(&self, db_path: &Path, sql: &str) -> Result<String, QueryError>;
}

impl<T: StoreQuery + ?Sized> StoreQuery for Box<T> {
    fn execute(&self, db_path: &Path, sql: &str) -> Result<String, QueryError> {
        (**self).execute(db_path, sql)
    }
}

impl<T: StoreQuery + ?Sized> StoreQuery for &T {
    fn execute(&self, db_path: &Path, sql: &str) -> Result<String, QueryError> {
        (**self).execute(db_path, sql)
    }
}

/// Which collaborator talks to the database.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Linked SQLite via rusqlite.
    #[default]
    Embedded,
    /// The external `sqlite3` command-line shell.
    Sqlite3,
}

impl Backend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Sqlite3 => "sqlite3",
        }
    }
}

fn missing_database(db_path: &Path) -> Option<QueryError> {
    (!db_path.is_file()).then(|| QueryError::MissingDatabase { path: db_path.to_path_buf() })
}
