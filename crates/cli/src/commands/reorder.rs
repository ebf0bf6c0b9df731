// `zedrecent move-up <target>` / `zedrecent move-down <target>`: swap a pin
// with its neighbour. Moving past either end is a no-op, not an error.

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use zedrecent_common::pins::PinnedSet;
use zedrecent_store::state::StateStore;

use crate::context::{resolve_target, Context};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Workspace uri or local folder path.
    target: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveResult {
    pub uri: String,
    pub direction: Direction,
    /// `None` when the workspace is not pinned.
    pub order: Option<usize>,
    /// `false` when the pin was already at the top (or bottom), or when there
    /// was no pin to move.
    pub moved: bool,
}

pub fn run(args: MoveArgs, direction: Direction, ctx: &Context) -> anyhow::Result<()> {
    let uri = resolve_target(&args.target)?;
    let state = ctx.state();
    let mut pins = state.load_pins().context("failed to load pinned workspaces")?;

    let result = move_pin(&mut pins, &uri, direction);
    if result.moved {
        state.save_pins(&pins).context("failed to save pinned workspaces")?;
    }

    output::print_output(ctx.format, &result, format_human)?;
    Ok(())
}

pub fn move_pin(pins: &mut PinnedSet, uri: &str, direction: Direction) -> MoveResult {
    let moved = match direction {
        Direction::Up => pins.move_up(uri),
        Direction::Down => pins.move_down(uri),
    };
    let order = pins.get(uri).map(|entry| entry.order);
    MoveResult { uri: uri.to_string(), direction, order, moved }
}

fn format_human(result: &MoveResult) -> String {
    match (result.order, result.moved, result.direction) {
        (None, _, _) => format!("{} is not pinned", result.uri),
        (Some(order), true, _) => format!("Moved {} to position {}", result.uri, order + 1),
        (Some(_), false, Direction::Up) => format!("{} is already at the top", result.uri),
        (Some(_), false, Direction::Down) => format!("{} is already at the bottom", result.uri),
    }
}
