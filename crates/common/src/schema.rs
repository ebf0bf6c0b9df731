// Workspace database schema versions and the queries each one supports.
//
// The editor records its workspace-table migrations in
// `migrations(domain, step, migration)`; the highest `WorkspaceDb` step is the
// schema version. Query shapes are table-driven so adding a schema means
// adding one row to `QUERY_SHAPES`.

use crate::types::SchemaVersionInfo;

/// Oldest schema whose workspace table can be read at all.
pub const MIN_SUPPORTED_DB_VERSION: i64 = 24;
/// Oldest schema that records remote (SSH) workspaces.
pub const MIN_REMOTE_DB_VERSION: i64 = 26;
/// Version assumed when nothing better is known.
pub const DEFAULT_DB_VERSION: i64 = 28;

pub const SCHEMA_VERSION_QUERY: &str =
    "SELECT MAX(step) FROM migrations WHERE domain = 'WorkspaceDb';";

pub const DELETE_ALL_WORKSPACES: &str = "DELETE FROM workspaces;";

/// One column layout for the workspace listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryShape {
    pub min_version: i64,
    /// Whether rows carry `host|user|port` after the local columns.
    pub includes_remote: bool,
    pub sql: &'static str,
}

/// Newest first. Every shape emits `type|id|paths|timestamp`, remote-capable
/// shapes append `host|user|port`. Embedded newlines in path lists are folded
/// to commas so one row stays on one line.
pub const QUERY_SHAPES: &[QueryShape] = &[
    QueryShape {
        min_version: 28,
        includes_remote: true,
        sql: "SELECT \
                CASE WHEN workspaces.remote_connection_id IS NULL THEN 'local' ELSE 'remote' END, \
                workspaces.workspace_id, \
                REPLACE(workspaces.paths, char(10), ','), \
                workspaces.timestamp, \
                remote_connections.host, \
                remote_connections.user, \
                remote_connections.port \
              FROM workspaces \
              LEFT JOIN remote_connections \
                ON workspaces.remote_connection_id = remote_connections.id \
              ORDER BY workspaces.timestamp DESC;",
    },
    QueryShape {
        min_version: MIN_REMOTE_DB_VERSION,
        includes_remote: true,
        sql: "SELECT \
                CASE WHEN workspaces.ssh_project_id IS NULL THEN 'local' ELSE 'remote' END, \
                workspaces.workspace_id, \
                REPLACE(COALESCE(workspaces.local_paths, ssh_projects.paths), char(10), ','), \
                workspaces.timestamp, \
                ssh_projects.host, \
                ssh_projects.user, \
                ssh_projects.port \
              FROM workspaces \
              LEFT JOIN ssh_projects ON workspaces.ssh_project_id = ssh_projects.id \
              ORDER BY workspaces.timestamp DESC;",
    },
    QueryShape {
        min_version: MIN_SUPPORTED_DB_VERSION,
        includes_remote: false,
        sql: "SELECT 'local', workspace_id, REPLACE(local_paths, char(10), ','), timestamp \
              FROM workspaces \
              WHERE local_paths IS NOT NULL \
              ORDER BY timestamp DESC;",
    },
];

/// The listing query for `version`, or `None` when the schema predates every
/// known shape.
pub fn query_shape_for(version: i64) -> Option<&'static QueryShape> {
    QUERY_SHAPES.iter().find(|shape| version >= shape.min_version)
}

pub fn is_supported_version(version: i64) -> bool {
    query_shape_for(version).is_some()
}

pub fn delete_workspace_statement(id: i64) -> String {
    format!("DELETE FROM workspaces WHERE workspace_id = {id};")
}

/// What a live version probe reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Version(i64),
    /// The store answered but without a usable version (no migrations table
    /// row, non-numeric output).
    Unsupported,
}

impl ProbeOutcome {
    /// Interpret the text output of [`SCHEMA_VERSION_QUERY`].
    pub fn from_probe_output(output: &str) -> Self {
        output
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| line.parse::<i64>().ok())
            .map_or(Self::Unsupported, Self::Version)
    }
}

/// Decide which schema version to query with.
///
/// A probe reporting a supported version wins. Otherwise the cached version is
/// used, then `fallback`; both are flagged unsupported. Transport errors from
/// the probe propagate untouched.
pub fn resolve_schema_version<E>(
    probe: impl FnOnce() -> Result<ProbeOutcome, E>,
    cached: Option<i64>,
    fallback: i64,
) -> Result<SchemaVersionInfo, E> {
    if let ProbeOutcome::Version(version) = probe()? {
        if is_supported_version(version) {
            return Ok(SchemaVersionInfo { version, supported: true });
        }
    }

    let version = cached.unwrap_or(fallback);
    Ok(SchemaVersionInfo { version, supported: false })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_fails(outcome: ProbeOutcome) -> impl FnOnce() -> Result<ProbeOutcome, ()> {
        move || Ok(outcome)
    }

    #[test]
    fn failing_probe_uses_cached_version_unsupported() {
        let info =
            resolve_schema_version(never_fails(ProbeOutcome::Unsupported), Some(26), 28).unwrap();
        assert_eq!(info, SchemaVersionInfo { version: 26, supported: false });
    }

    #[test]
    fn succeeding_probe_wins_regardless_of_cache() {
        let info =
            resolve_schema_version(never_fails(ProbeOutcome::Version(28)), Some(26), 28).unwrap();
        assert_eq!(info, SchemaVersionInfo { version: 28, supported: true });

        let info = resolve_schema_version(never_fails(ProbeOutcome::Version(28)), None, 1).unwrap();
        assert_eq!(info, SchemaVersionInfo { version: 28, supported: true });
    }

    #[test]
    fn too_old_probe_falls_through_to_cache_then_fallback() {
        let info =
            resolve_schema_version(never_fails(ProbeOutcome::Version(3)), Some(27), 28).unwrap();
        assert_eq!(info, SchemaVersionInfo { version: 27, supported: false });

        let info = resolve_schema_version(never_fails(ProbeOutcome::Version(3)), None, 28).unwrap();
        assert_eq!(info, SchemaVersionInfo { version: 28, supported: false });
    }

    #[test]
    fn no_cache_uses_fallback() {
        let info =
            resolve_schema_version(never_fails(ProbeOutcome::Unsupported), None, 28).unwrap();
        assert_eq!(info, SchemaVersionInfo { version: 28, supported: false });
    }

    #[test]
    fn probe_errors_propagate() {
        let result = resolve_schema_version(|| Err::<ProbeOutcome, _>("db locked"), Some(26), 28);
        assert_eq!(result, Err("db locked"));
    }

    #[test]
    fn newer_versions_use_the_newest_shape() {
        let shape = query_shape_for(41).unwrap();
        assert_eq!(shape.min_version, 28);
        assert!(shape.includes_remote);
        assert!(shape.sql.contains("remote_connections"));
    }

    #[test]
    fn remote_columns_start_at_min_remote_version() {
        let older = query_shape_for(MIN_REMOTE_DB_VERSION - 1).unwrap();
        assert!(!older.includes_remote);
        assert!(!older.sql.contains("host"));

        let remote = query_shape_for(MIN_REMOTE_DB_VERSION).unwrap();
        assert!(remote.includes_remote);
        assert!(remote.sql.contains("ssh_projects"));
    }

    #[test]
    fn versions_below_minimum_have_no_shape() {
        assert!(query_shape_for(MIN_SUPPORTED_DB_VERSION - 1).is_none());
        assert!(!is_supported_version(0));
        assert!(is_supported_version(DEFAULT_DB_VERSION));
    }

    #[test]
    fn shapes_are_ordered_newest_first() {
        let versions: Vec<i64> = QUERY_SHAPES.iter().map(|shape| shape.min_version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(versions, sorted);
    }

    #[test]
    fn probe_output_parsing() {
        assert_eq!(ProbeOutcome::from_probe_output("28\n"), ProbeOutcome::Version(28));
        assert_eq!(ProbeOutcome::from_probe_output("\n 27 \n"), ProbeOutcome::Version(27));
        assert_eq!(ProbeOutcome::from_probe_output(""), ProbeOutcome::Unsupported);
        assert_eq!(ProbeOutcome::from_probe_output("Error: no such table"), ProbeOutcome::Unsupported);
    }

    #[test]
    fn delete_statement_targets_one_row() {
        assert_eq!(delete_workspace_statement(42), "DELETE FROM workspaces WHERE workspace_id = 42;");
    }
}
