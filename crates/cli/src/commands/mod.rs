// CLI subcommand dispatch.

use chrono::{DateTime, Local};
use clap::Subcommand;

use crate::context::Context;

pub mod info;
pub mod list;
pub mod pin;
pub mod remove;
pub mod reorder;
pub mod unpin;

#[derive(Subcommand)]
pub enum Command {
    /// List pinned and recent workspaces
    List(list::ListArgs),
    /// Show discovered paths and the database schema version
    Info(info::InfoArgs),
    /// Pin a recent workspace
    Pin(pin::PinArgs),
    /// Unpin a workspace (or all of them)
    Unpin(unpin::UnpinArgs),
    /// Move a pinned workspace one position up
    MoveUp(reorder::MoveArgs),
    /// Move a pinned workspace one position down
    MoveDown(reorder::MoveArgs),
    /// Remove a workspace from Zed's history
    Remove(remove::RemoveArgs),
}

pub fn run(cmd: Command, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        Command::List(args) => list::run(args, ctx),
        Command::Info(args) => info::run(args, ctx),
        Command::Pin(args) => pin::run(args, ctx),
        Command::Unpin(args) => unpin::run(args, ctx),
        Command::MoveUp(args) => reorder::run(args, reorder::Direction::Up, ctx),
        Command::MoveDown(args) => reorder::run(args, reorder::Direction::Down, ctx),
        Command::Remove(args) => remove::run(args, ctx),
    }
}

/// Local wall-clock time for an epoch-seconds timestamp.
pub(crate) fn format_timestamp(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_seconds.to_string())
}
