// `zedrecent info`: where things were found and which schema is in use.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use zedrecent_common::types::SchemaVersionInfo;
use zedrecent_store::paths::Channel;
use zedrecent_store::query::Backend;
use zedrecent_store::state::StateStore;
use zedrecent_store::WorkspaceRepository;

use crate::context::Context;
use crate::output;

#[derive(Debug, Args)]
pub struct InfoArgs {}

#[derive(Debug, Clone, Serialize)]
pub struct InfoResult {
    pub executable: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub database_candidates: Vec<PathBuf>,
    pub schema: Option<SchemaVersionInfo>,
    pub channel: Channel,
    pub backend: Backend,
    pub config_path: Option<PathBuf>,
    pub state_path: PathBuf,
    pub pinned: usize,
}

pub fn run(_args: InfoArgs, ctx: &Context) -> anyhow::Result<()> {
    let database = ctx.database_path();
    let schema = match &database {
        Some(path) => {
            let repo = WorkspaceRepository::new(ctx.store_query(), path, ctx.state());
            Some(repo.workspace_db_info().context("failed to resolve workspace schema")?)
        }
        None => None,
    };
    let pinned = ctx.state().load_pins().context("failed to load pinned workspaces")?.len();

    let result = InfoResult {
        executable: ctx.executable_path(),
        database,
        database_candidates: ctx.database_candidates(),
        schema,
        channel: ctx.config.channel,
        backend: ctx.config.backend,
        config_path: ctx.config_path.clone(),
        state_path: ctx.state_path.clone(),
        pinned,
    };
    output::print_output(ctx.format, &result, format_human)?;
    Ok(())
}

fn format_human(result: &InfoResult) -> String {
    let found = |path: &Option<PathBuf>| {
        path.as_ref().map_or_else(|| "not found".to_string(), |path| path.display().to_string())
    };

    let mut lines = vec![
        format!("Zed executable: {}", found(&result.executable)),
        format!("Database:       {}", found(&result.database)),
    ];
    if result.database.is_none() {
        for candidate in &result.database_candidates {
            lines.push(format!("  searched {}", candidate.display()));
        }
    }
    lines.push(match result.schema {
        Some(SchemaVersionInfo { version, supported: true }) => format!("Schema:         {version}"),
        Some(SchemaVersionInfo { version, supported: false }) => {
            format!("Schema:         {version} (unconfirmed)")
        }
        None => "Schema:         -".to_string(),
    });
    lines.push(format!("Channel:        {}", result.channel));
    lines.push(format!("Backend:        {}", result.backend.as_str()));
    lines.push(format!("Config:         {}", found(&result.config_path)));
    lines.push(format!("State:          {}", result.state_path.display()));
    lines.push(format!("Pinned:         {}", result.pinned));
    lines.join("\n")
}
