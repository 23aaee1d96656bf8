mod ai;
mod app;
mod cache;
mod commands;
mod config;
mod error;
mod model;
mod render;
mod store;
mod sync;
mod views;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "juriscall")]
#[command(about = "Call intake, clients, processes and finances for a law office")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/juriscall/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Use a local SQLite database at this path instead of the configured store
  #[arg(long)]
  sqlite: Option<PathBuf>,

  /// Log to stderr instead of the log file
  #[arg(long)]
  log_stderr: bool,

  /// Extra attempts if the initial load fails
  #[arg(long, default_value_t = 0)]
  retries: u32,

  #[command(subcommand)]
  command: commands::Command,
}

/// Install the tracing subscriber. The returned guard flushes the log file
/// when dropped, so it must live until exit.
fn init_logging(to_stderr: bool) -> Option<WorkerGuard> {
  let filter =
    EnvFilter::try_from_env("JURISCALL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

  let appender = if to_stderr {
    None
  } else {
    dirs::data_dir()
      .map(|dir| dir.join("juriscall").join("logs"))
      .and_then(|dir| {
        RollingFileAppender::builder()
          .rotation(Rotation::DAILY)
          .filename_prefix("juriscall")
          .filename_suffix("log")
          .build(dir)
          .ok()
      })
  };

  match appender {
    Some(appender) => {
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
      Some(guard)
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
      None
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_logging(args.log_stderr);

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  let app = app::App::new(config, args.sqlite.as_deref(), args.retries)?;
  let output = app.run(args.command).await?;
  println!("{}", output);

  Ok(())
}
