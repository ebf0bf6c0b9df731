// `zedrecent pin <target>`: append a recent workspace to the pinned list.

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use zedrecent_common::pins::PinnedSet;
use zedrecent_common::reconcile::WorkspaceMap;
use zedrecent_store::state::StateStore;

use crate::context::{load_catalog, resolve_target, Context};
use crate::exit_code::NotFound;
use crate::output;

#[derive(Debug, Args)]
pub struct PinArgs {
    /// Workspace uri or local folder path.
    target: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinResult {
    pub uri: String,
    pub order: usize,
    /// `false` when the workspace was already pinned.
    pub changed: bool,
}

pub fn run(args: PinArgs, ctx: &Context) -> anyhow::Result<()> {
    let uri = resolve_target(&args.target)?;
    let state = ctx.state();
    let mut pins = state.load_pins().context("failed to load pinned workspaces")?;

    let result = if let Some(entry) = pins.get(&uri) {
        PinResult { uri, order: entry.order, changed: false }
    } else {
        let repo = ctx.repository()?;
        let catalog = load_catalog(&repo).context("failed to read recent workspaces")?;
        let result = pin_known(&mut pins, &catalog.workspaces, &uri)?;
        state.save_pins(&pins).context("failed to save pinned workspaces")?;
        result
    };

    output::print_output(ctx.format, &result, format_human)?;
    Ok(())
}

/// Pin `uri` if the editor knows it; its kind comes from the store.
pub fn pin_known(
    pins: &mut PinnedSet,
    workspaces: &WorkspaceMap,
    uri: &str,
) -> Result<PinResult, NotFound> {
    let workspace = workspaces.get(uri).ok_or_else(|| {
        NotFound::new("workspace", uri).with_hint("run `zedrecent list` to see recent workspaces")
    })?;
    let changed = pins.pin(uri, workspace.kind);
    let order = pins.get(uri).map_or(0, |entry| entry.order);
    Ok(PinResult { uri: uri.to_string(), order, changed })
}

fn format_human(result: &PinResult) -> String {
    if result.changed {
        format!("Pinned {} at position {}", result.uri, result.order + 1)
    } else {
        format!("{} is already pinned at position {}", result.uri, result.order + 1)
    }
}
