// `zedrecent unpin <target>` / `zedrecent unpin --all`.

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use zedrecent_common::pins::PinnedSet;
use zedrecent_store::state::StateStore;

use crate::context::{resolve_target, Context};
use crate::output;

#[derive(Debug, Args)]
pub struct UnpinArgs {
    /// Workspace uri or local folder path.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    target: Option<String>,
    /// Unpin every workspace.
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnpinResult {
    pub uri: Option<String>,
    pub removed: usize,
    pub remaining: usize,
}

pub fn run(args: UnpinArgs, ctx: &Context) -> anyhow::Result<()> {
    let state = ctx.state();
    let mut pins = state.load_pins().context("failed to load pinned workspaces")?;

    let result = match args.target {
        Some(target) if !args.all => {
            let uri = resolve_target(&target)?;
            unpin_one(&mut pins, &uri)
        }
        _ => unpin_all(&mut pins),
    };
    if result.removed > 0 {
        state.save_pins(&pins).context("failed to save pinned workspaces")?;
    }

    output::print_output(ctx.format, &result, format_human)?;
    Ok(())
}

/// Unpinning a workspace that is not pinned changes nothing (`removed == 0`).
pub fn unpin_one(pins: &mut PinnedSet, uri: &str) -> UnpinResult {
    let removed = usize::from(pins.unpin(uri));
    UnpinResult { uri: Some(uri.to_string()), removed, remaining: pins.len() }
}

pub fn unpin_all(pins: &mut PinnedSet) -> UnpinResult {
    let removed = pins.len();
    pins.unpin_all();
    UnpinResult { uri: None, removed, remaining: 0 }
}

fn format_human(result: &UnpinResult) -> String {
    match &result.uri {
        Some(uri) if result.removed == 0 => format!("{uri} was not pinned"),
        Some(uri) => format!("Unpinned {uri} ({} pinned left)", result.remaining),
        None if result.removed == 0 => "Nothing was pinned".to_string(),
        None => format!("Unpinned {} workspaces", result.removed),
    }
}
