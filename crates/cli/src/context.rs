// Per-invocation setup shared by every command: config, discovery, the
// repository, persisted state and target resolution.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};
use zedrecent_common::identity::target_uri;
use zedrecent_common::reconcile::{reconcile, WorkspaceMap};
use zedrecent_common::types::{RawWorkspaceRecord, SchemaVersionInfo};
use zedrecent_store::config::{default_config_path, Config};
use zedrecent_store::paths::{
    default_database_candidates, default_executable_candidates, CandidatePaths, ExplicitPath,
    PathResolver,
};
use zedrecent_store::query::{Backend, EmbeddedSqlite, SqliteCli, StoreQuery};
use zedrecent_store::state::{default_state_path, JsonStateStore, StateStore};
use zedrecent_store::{RepositoryError, WorkspaceRepository};

use crate::exit_code::{NotFound, UsageError};
use crate::output::OutputFormat;

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub state: Option<PathBuf>,
    pub json: bool,
}

pub type Repository = WorkspaceRepository<Box<dyn StoreQuery>, JsonStateStore>;

#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub state_path: PathBuf,
    db_override: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl Context {
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let config_path = global.config.clone().or_else(default_config_path);
        let config = match &config_path {
            Some(path) => Config::load_or_default(path)
                .with_context(|| format!("failed to load config `{}`", path.display()))?,
            None => Config::default(),
        };
        let state_path = global
            .state
            .clone()
            .or_else(default_state_path)
            .context("could not determine a data directory for zedrecent state; pass --state")?;

        Ok(Self {
            config,
            config_path,
            format: OutputFormat::detect(global.json),
            state_path,
            db_override: global.db.clone(),
            home: dirs::home_dir(),
        })
    }

    pub fn state(&self) -> JsonStateStore {
        JsonStateStore::new(&self.state_path)
    }

    fn explicit_database(&self) -> Option<&PathBuf> {
        self.db_override.as_ref().or(self.config.db_path.as_ref())
    }

    /// Where the database is looked for, in priority order.
    pub fn database_candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = self.explicit_database() {
            return vec![path.clone()];
        }
        self.home
            .as_deref()
            .map(|home| default_database_candidates(home, self.config.channel))
            .unwrap_or_default()
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        match self.explicit_database() {
            Some(path) => ExplicitPath(path.clone()).resolve(),
            None => CandidatePaths::new(self.database_candidates()).resolve(),
        }
    }

    pub fn require_database(&self) -> Result<PathBuf> {
        if let Some(path) = self.database_path() {
            return Ok(path);
        }
        let searched = self
            .database_candidates()
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(NotFound::new("Zed workspace database", searched)
            .with_hint("pass --db or set db_path in the config")
            .into())
    }

    pub fn executable_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config.zed_path {
            return ExplicitPath(path.clone()).resolve();
        }
        let candidates = self
            .home
            .as_deref()
            .map(default_executable_candidates)
            .unwrap_or_default();
        CandidatePaths::new(candidates).with_path_fallback("zed").resolve()
    }

    pub fn store_query(&self) -> Box<dyn StoreQuery> {
        match self.config.backend {
            Backend::Embedded => Box::new(EmbeddedSqlite::new(self.config.query_timeout())),
            Backend::Sqlite3 => {
                Box::new(SqliteCli::new(&self.config.sqlite_bin, self.config.query_timeout_ms))
            }
        }
    }

    pub fn repository(&self) -> Result<Repository> {
        let db_path = self.require_database()?;
        tracing::debug!(
            db = %db_path.display(),
            backend = self.config.backend.as_str(),
            "opening workspace database"
        );
        Ok(WorkspaceRepository::new(self.store_query(), db_path, self.state()))
    }
}

/// Everything the store currently knows, reconciled.
#[derive(Debug)]
pub struct Catalog {
    pub schema: SchemaVersionInfo,
    pub records: Vec<RawWorkspaceRecord>,
    pub workspaces: WorkspaceMap,
    /// `false` when no query shape exists for the schema; the lists are then
    /// empty and only pins can be shown.
    pub readable: bool,
}

pub fn load_catalog<Q: StoreQuery, S: StateStore>(
    repo: &WorkspaceRepository<Q, S>,
) -> Result<Catalog, RepositoryError> {
    let schema = repo.workspace_db_info()?;
    let (records, readable) = match repo.workspaces(schema.version) {
        Ok(records) => (records, true),
        Err(RepositoryError::UnsupportedSchema { version }) => {
            tracing::warn!(version, "no workspace query for this schema version");
            (Vec::new(), false)
        }
        Err(error) => return Err(error),
    };
    let workspaces = reconcile(&records);
    Ok(Catalog { schema, records, workspaces, readable })
}

/// Turn a user-typed target (identity URI or local path) into an identity URI.
pub fn resolve_target(target: &str) -> Result<String> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    resolve_target_from(target, &cwd)
}

pub fn resolve_target_from(target: &str, cwd: &Path) -> Result<String> {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return Err(UsageError("workspace target must not be empty".into()).into());
    }
    if trimmed.contains("://") {
        return target_uri(trimmed)
            .ok_or_else(|| UsageError(format!("`{trimmed}` is not a workspace uri")).into());
    }

    let path = Path::new(trimmed);
    let absolute = if path.is_absolute() { path.to_path_buf() } else { cwd.join(path) };
    let normalized = normalize_lexically(&absolute);
    let text = normalized
        .to_str()
        .ok_or_else(|| UsageError(format!("`{}` is not valid UTF-8", normalized.display())))?;
    target_uri(text).ok_or_else(|| UsageError(format!("`{trimmed}` is not a usable path")).into())
}

// `.` and `..` are folded without touching the filesystem; the folder may be
// gone already.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn context_with(config: Config, db: Option<PathBuf>, state: PathBuf) -> Context {
        Context {
            config,
            config_path: None,
            format: OutputFormat::Json,
            state_path: state,
            db_override: db,
            home: Some(PathBuf::from("/home/dev")),
        }
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let uri = resolve_target_from("api/../web/./", Path::new("/home/dev")).unwrap();
        assert_eq!(uri, "file:///home/dev/web");
    }

    #[test]
    fn absolute_paths_and_uris_pass_through() {
        let cwd = Path::new("/elsewhere");
        assert_eq!(resolve_target_from("/srv/app", cwd).unwrap(), "file:///srv/app");
        assert_eq!(
            resolve_target_from("ssh://build.box/srv/site", cwd).unwrap(),
            "ssh://build.box/srv/site"
        );
    }

    #[test]
    fn blank_target_is_a_usage_error() {
        let err = resolve_target_from("  ", Path::new("/")).unwrap_err();
        assert!(err.downcast_ref::<UsageError>().is_some());
    }

    #[test]
    fn flag_overrides_config_database() {
        let dir = tempdir().unwrap();
        let flagged = dir.path().join("flag.sqlite");
        std::fs::write(&flagged, b"").unwrap();

        let config = Config { db_path: Some(dir.path().join("config.sqlite")), ..Config::default() };
        let ctx = context_with(config, Some(flagged.clone()), dir.path().join("state.json"));
        assert_eq!(ctx.database_candidates(), vec![flagged.clone()]);
        assert_eq!(ctx.database_path(), Some(flagged));
    }

    #[test]
    fn missing_explicit_database_is_not_found() {
        let dir = tempdir().unwrap();
        let ctx = context_with(
            Config::default(),
            Some(dir.path().join("absent.sqlite")),
            dir.path().join("state.json"),
        );
        let err = ctx.require_database().unwrap_err();
        let not_found = err.downcast_ref::<NotFound>().expect("typed not-found error");
        assert!(not_found.name.contains("absent.sqlite"));
    }

    #[test]
    fn discovery_uses_channel_order() {
        let config = Config { channel: zedrecent_store::paths::Channel::Preview, ..Config::default() };
        let ctx = context_with(config, None, PathBuf::from("/tmp/state.json"));
        assert!(ctx.database_candidates()[0].ends_with("0-preview/db.sqlite"));
    }
}
