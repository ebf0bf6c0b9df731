// `zedrecent remove <target>`: forget a workspace in the editor's history
// and drop its pin. `remove --all --yes` clears the whole history.

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use zedrecent_common::types::{CanonicalWorkspace, RawWorkspaceRecord};
use zedrecent_store::state::StateStore;

use crate::context::{load_catalog, resolve_target, Context};
use crate::exit_code::NotFound;
use crate::output;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Workspace uri or local folder path.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    target: Option<String>,
    /// Remove every workspace from the editor's history.
    #[arg(long, requires = "yes")]
    all: bool,
    /// Confirm `--all`.
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveResult {
    pub uri: Option<String>,
    /// Store rows deleted. Empty for `--all`, which deletes without listing.
    pub deleted_ids: Vec<i64>,
    pub unpinned: usize,
}

pub fn run(args: RemoveArgs, ctx: &Context) -> anyhow::Result<()> {
    let repo = ctx.repository()?;
    let state = ctx.state();
    let mut pins = state.load_pins().context("failed to load pinned workspaces")?;

    let result = match args.target {
        Some(target) if !args.all => {
            let uri = resolve_target(&target)?;
            let catalog = load_catalog(&repo).context("failed to read recent workspaces")?;
            let ids = rows_for_uri(&catalog.records, &uri);
            if ids.is_empty() && !pins.contains(&uri) {
                return Err(NotFound::new("workspace", uri).into());
            }
            // Older rows with the same identity would resurface once the
            // newest is gone, so every matching row goes.
            for id in &ids {
                repo.delete_workspace(*id)
                    .with_context(|| format!("failed to remove workspace row {id}"))?;
            }
            let unpinned = usize::from(pins.unpin(&uri));
            RemoveResult { uri: Some(uri), deleted_ids: ids, unpinned }
        }
        _ => {
            repo.delete_all_workspaces().context("failed to clear recent workspaces")?;
            let unpinned = pins.len();
            pins.unpin_all();
            RemoveResult { uri: None, deleted_ids: Vec::new(), unpinned }
        }
    };
    if result.unpinned > 0 {
        state.save_pins(&pins).context("failed to save pinned workspaces")?;
    }

    output::print_output(ctx.format, &result, format_human)?;
    Ok(())
}

/// Ids of every store row whose identity is `uri`.
pub fn rows_for_uri(records: &[RawWorkspaceRecord], uri: &str) -> Vec<i64> {
    records
        .iter()
        .filter(|record| {
            CanonicalWorkspace::from_record(record).is_some_and(|workspace| workspace.uri == uri)
        })
        .map(RawWorkspaceRecord::id)
        .collect()
}

fn format_human(result: &RemoveResult) -> String {
    let pin_note = if result.unpinned > 0 { " and unpinned it" } else { "" };
    match &result.uri {
        Some(uri) if result.deleted_ids.is_empty() => format!("Unpinned {uri}"),
        Some(uri) => format!("Removed {uri} from recent workspaces{pin_note}"),
        None => format!("Removed all recent workspaces ({} unpinned)", result.unpinned),
    }
}
