// Workspace Repository: the only place store text becomes records.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zedrecent_common::record::parse_records;
use zedrecent_common::schema::{
    delete_workspace_statement, query_shape_for, resolve_schema_version, ProbeOutcome,
    DEFAULT_DB_VERSION, DELETE_ALL_WORKSPACES, SCHEMA_VERSION_QUERY,
};
use zedrecent_common::types::{RawWorkspaceRecord, SchemaVersionInfo};

use crate::error::RepositoryError;
use crate::query::StoreQuery;
use crate::state::StateStore;

pub struct WorkspaceRepository<Q, S> {
    query: Q,
    db_path: PathBuf,
    state: S,
}

impl<Q: StoreQuery, S: StateStore> WorkspaceRepository<Q, S> {
    pub fn new(query: Q, db_path: impl Into<PathBuf>, state: S) -> Self {
        Self { query, db_path: db_path.into(), state }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Resolve the schema version to query with. A supported live answer is
    /// cached for later runs; an unsupported result is a value, not an error.
    pub fn workspace_db_info(&self) -> Result<SchemaVersionInfo, RepositoryError> {
        let cached = self.state.load_schema_version()?;
        let info = resolve_schema_version(|| self.probe(), cached, DEFAULT_DB_VERSION)?;

        if info.supported {
            if cached != Some(info.version) {
                self.state.save_schema_version(info.version)?;
            }
        } else {
            warn!(
                version = info.version,
                cached = ?cached,
                "workspace schema version could not be confirmed; using fallback"
            );
        }
        debug!(version = info.version, supported = info.supported, "resolved workspace schema");
        Ok(info)
    }

    /// All parseable workspace rows, in store order. Unparseable rows are
    /// logged and skipped.
    ///
    /// A listing query that does not fit the database's tables (the version
    /// was a guess) is `UnsupportedSchema`, not a query failure.
    pub fn workspaces(&self, version: i64) -> Result<Vec<RawWorkspaceRecord>, RepositoryError> {
        let shape = query_shape_for(version).ok_or(RepositoryError::UnsupportedSchema { version })?;
        let output = match self.query.execute(&self.db_path, shape.sql) {
            Ok(output) => output,
            Err(error) if error.is_schema_mismatch() => {
                warn!(version, %error, "workspace query does not match the database layout");
                return Err(RepositoryError::UnsupportedSchema { version });
            }
            Err(source) => {
                return Err(RepositoryError::StoreQueryFailed { path: self.db_path.clone(), source })
            }
        };

        let batch = parse_records(&output);
        for rejected in &batch.rejected {
            warn!(
                line = rejected.line_number,
                reason = %rejected.reason,
                row = %rejected.line,
                "skipping unreadable workspace row"
            );
        }
        info!(
            version,
            accepted = batch.records.len(),
            rejected = batch.rejected.len(),
            "loaded workspace rows"
        );
        Ok(batch.records)
    }

    pub fn delete_workspace(&self, id: i64) -> Result<(), RepositoryError> {
        self.run(&delete_workspace_statement(id))?;
        info!(id, db = %self.db_path.display(), "deleted workspace row");
        Ok(())
    }

    pub fn delete_all_workspaces(&self) -> Result<(), RepositoryError> {
        self.run(DELETE_ALL_WORKSPACES)?;
        info!(db = %self.db_path.display(), "deleted all workspace rows");
        Ok(())
    }

    fn probe(&self) -> Result<ProbeOutcome, RepositoryError> {
        match self.query.execute(&self.db_path, SCHEMA_VERSION_QUERY) {
            Ok(output) => Ok(ProbeOutcome::from_probe_output(&output)),
            Err(error) if error.is_schema_mismatch() => {
                debug!(%error, "version probe found no migrations table");
                Ok(ProbeOutcome::Unsupported)
            }
            Err(source) => {
                Err(RepositoryError::StoreUnavailable { path: self.db_path.clone(), source })
            }
        }
    }

    fn run(&self, sql: &str) -> Result<String, RepositoryError> {
        self.query
            .execute(&self.db_path, sql)
            .map_err(|source| RepositoryError::StoreQueryFailed { path: self.db_path.clone(), source })
    }
}
