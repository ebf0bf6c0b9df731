// zedrecent CLI entry point.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod exit_code;
mod output;

use context::{Context, GlobalArgs};
use exit_code::ExitCode;
use output::OutputFormat;

const LOG_ENV: &str = "ZEDRECENT_LOG";

#[derive(Parser)]
#[command(name = "zedrecent", version, about = "Recent Zed workspaces with pinning")]
struct Cli {
    /// Config file [default: <config dir>/zedrecent/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Zed workspace database, skipping discovery
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// State file holding pins [default: <data dir>/zedrecent/state.json]
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,
    /// Force JSON output.
    #[arg(long, global = true)]
    json: bool,
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let global = GlobalArgs { config: cli.config, db: cli.db, state: cli.state, json: cli.json };
    let result = Context::load(&global).and_then(|ctx| commands::run(cli.command, &ctx));
    match result {
        Ok(()) => ExitCode::Success.into(),
        Err(error) => {
            output::print_anyhow_error(OutputFormat::detect(global.json), &error);
            ExitCode::from_error(&error).into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
