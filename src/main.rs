// Syrinx - terminal remote for a background music playback service
// panpipe's sibling: panpipe plays audio itself, syrinx drives a player
// through a narrow control interface

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use syrinx::{App, Config, LocalPlayer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "syrinx", version, about = "Terminal remote control for a music playback service")]
struct Args {
    /// Alternative config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "syrinx=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The TUI owns stdout, so logs go to a file
    let _guard = init_logging(&args.log_level)?;

    // Load config - falls back to defaults if missing
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Drive the built-in player until a daemon connection is configured
    let player = LocalPlayer::demo();

    let mut app = App::new(config, Box::new(player))?;
    app.run()
}

fn init_logging(filter: &str) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("syrinx");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, "syrinx.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
