// zedrecent-store: everything that touches the editor's database or the
// local filesystem.

pub mod config;
pub mod error;
pub mod executor;
pub mod paths;
pub mod query;
pub mod repository;
pub mod security;
pub mod state;

pub use error::{QueryError, RepositoryError};
pub use repository::WorkspaceRepository;
