use crate::cmd::{run_command_with_args, Cli};
use clap::Parser;
use std::process::exit;
use tracing::trace;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cmd;
mod config;
mod inspect;
mod render;
mod utils;

/// Env var holding the log filter, like `tm_bbcode_parser=debug`.
const LOG_ENV: &str = "TM_BBCODE_LOG";

/// Default log level by `-v` count.
///
/// One shows processor failures, two show dropped tags and missing
/// processors, three show every scanned token.
fn verbose_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::WARN,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(verbose_level(cli.verbose).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("failed to set global cli tracing subscriber");

    trace!(command = ?cli.command, "starting cli");

    if let Err(e) = run_command_with_args(cli).await {
        eprintln!("failed to run command: {e:?}");
        exit(1)
    }
}
