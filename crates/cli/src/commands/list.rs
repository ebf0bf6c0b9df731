// `zedrecent list`: pinned workspaces in their explicit order, then the
// rest by recency.

use std::path::Path;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use url::Url;
use zedrecent_common::identity::{display_name, local_path_from_uri};
use zedrecent_common::pins::PinnedSet;
use zedrecent_common::reconcile::{recent_first, WorkspaceMap};
use zedrecent_common::types::{CanonicalWorkspace, SchemaVersionInfo, WorkspaceKind};
use zedrecent_store::state::StateStore;

use super::format_timestamp;
use crate::context::{load_catalog, Context};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Include local workspaces whose folder no longer exists.
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub schema: SchemaVersionInfo,
    pub readable: bool,
    pub pinned: Vec<PinnedRow>,
    pub recent: Vec<RecentRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinnedRow {
    pub uri: String,
    pub order: usize,
    pub kind: WorkspaceKind,
    pub title: String,
    pub subtitle: String,
    /// `None` when the editor no longer remembers this workspace.
    pub last_opened: Option<i64>,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentRow {
    pub uri: String,
    pub kind: WorkspaceKind,
    pub title: String,
    pub subtitle: String,
    pub last_opened: i64,
    pub source_id: i64,
}

impl From<&CanonicalWorkspace> for RecentRow {
    fn from(workspace: &CanonicalWorkspace) -> Self {
        Self {
            uri: workspace.uri.clone(),
            kind: workspace.kind,
            title: workspace.title.clone(),
            subtitle: workspace.subtitle.clone(),
            last_opened: workspace.last_opened,
            source_id: workspace.source_id,
        }
    }
}

pub fn run(args: ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let repo = ctx.repository()?;
    let catalog = load_catalog(&repo).context("failed to read recent workspaces")?;
    if !catalog.schema.supported {
        output::print_warning(
            ctx.format,
            "UNSUPPORTED_SCHEMA",
            &format!(
                "could not confirm the workspace database schema; reading it as version {}",
                catalog.schema.version
            ),
        );
    }
    if !catalog.readable {
        output::print_warning(
            ctx.format,
            "UNSUPPORTED_SCHEMA",
            "recent workspaces cannot be read from this database; showing pinned workspaces only",
        );
    }

    let pins = ctx.state().load_pins().context("failed to load pinned workspaces")?;
    let hide_missing = ctx.config.hide_missing && !args.all;
    let (pinned, recent) = build_rows(&catalog.workspaces, &pins, hide_missing, |path| path.exists());

    let result =
        ListResult { schema: catalog.schema, readable: catalog.readable, pinned, recent };
    output::print_output(ctx.format, &result, format_human)?;
    Ok(())
}

/// Pinned rows by ascending order, then every unpinned workspace most recent
/// first. With `hide_missing`, local entries whose folder fails `exists` are
/// left out of both lists.
pub fn build_rows(
    workspaces: &WorkspaceMap,
    pins: &PinnedSet,
    hide_missing: bool,
    exists: impl Fn(&Path) -> bool,
) -> (Vec<PinnedRow>, Vec<RecentRow>) {
    let visible = |kind: WorkspaceKind, local_path: Option<&str>| {
        !hide_missing
            || kind == WorkspaceKind::Remote
            || local_path.is_some_and(|path| exists(Path::new(path)))
    };

    let pinned = pins
        .ordered()
        .into_iter()
        .filter(|entry| visible(entry.kind, local_path_from_uri(&entry.uri)))
        .map(|entry| {
            let known = workspaces.get(&entry.uri);
            PinnedRow {
                uri: entry.uri.clone(),
                order: entry.order,
                kind: entry.kind,
                title: known.map_or_else(|| title_from_uri(&entry.uri), |w| w.title.clone()),
                subtitle: known.map_or_else(|| entry.uri.clone(), |w| w.subtitle.clone()),
                last_opened: known.map(|w| w.last_opened),
                can_move_up: pins.can_move_up(&entry.uri),
                can_move_down: pins.can_move_down(&entry.uri),
            }
        })
        .collect();

    let recent = recent_first(workspaces)
        .into_iter()
        .filter(|workspace| !pins.contains(&workspace.uri))
        .filter(|workspace| visible(workspace.kind, workspace.local_path()))
        .map(RecentRow::from)
        .collect();

    (pinned, recent)
}

fn title_from_uri(uri: &str) -> String {
    if let Some(path) = local_path_from_uri(uri) {
        return display_name(path);
    }
    Url::parse(uri)
        .ok()
        .map(|url| display_name(url.path()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| uri.to_string())
}

fn format_human(result: &ListResult) -> String {
    let mut lines = Vec::new();

    if !result.pinned.is_empty() {
        lines.push("Pinned".to_string());
        let width = result.pinned.iter().map(|row| row.title.chars().count()).max().unwrap_or(0);
        for row in &result.pinned {
            let opened = row.last_opened.map(format_timestamp).unwrap_or_else(|| "-".into());
            lines.push(format!(
                "  {:>2}. {:<width$}  {}  {}",
                row.order + 1,
                row.title,
                opened,
                row.subtitle,
            ));
        }
    }

    if !result.recent.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Recent".to_string());
        let width = result.recent.iter().map(|row| row.title.chars().count()).max().unwrap_or(0);
        for row in &result.recent {
            lines.push(format!(
                "  {:<width$}  {}  {}",
                row.title,
                format_timestamp(row.last_opened),
                row.subtitle,
            ));
        }
    }

    if lines.is_empty() {
        lines.push("No recent workspaces.".to_string());
    }
    lines.join("\n")
}
