//! `hearth` — Terminal dashboard for a home-automation message bus.
//!
//! Built on [ratatui](https://ratatui.rs). Subscribes to the retained
//! topic tree under the home prefix, materializes a control widget per
//! topic as updates arrive, and sends interactions back over the bus —
//! the display changes only when the bus echoes them.
//!
//! Logs are written to a file (default `/tmp/hearth.log`) to avoid
//! corrupting the terminal UI. A background bridge task pumps bus
//! traffic into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod bridge;
mod event;
mod screen;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hearth_config::Config;

use crate::app::App;
use crate::bridge::BusMode;

/// Terminal dashboard for a home-automation message bus.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about)]
struct Cli {
    /// Bus WebSocket URL (e.g., ws://127.0.0.1:9001)
    #[arg(short = 'u', long, env = "HEARTH_BUS_URL")]
    url: Option<String>,

    /// Home topic prefix to subscribe under
    #[arg(short = 'p', long, env = "HEARTH_HOME_PREFIX")]
    prefix: Option<String>,

    /// Run against a scripted demo home instead of a live bus
    #[arg(long)]
    demo: bool,

    /// Log file path (defaults to /tmp/hearth.log)
    #[arg(long, default_value = "/tmp/hearth.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli, config: &Config) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => config.log.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hearth_tui={log_level},hearth_core={log_level},hearth_bus={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("hearth.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // File config first, CLI flags on top
    let mut config = hearth_config::load_config_or_default();
    if let Some(url) = &cli.url {
        config.bus.url = url.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.home.prefix = prefix.clone();
    }

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli, &config);

    info!(
        url = %config.bus.url,
        prefix = %config.home.prefix,
        demo = cli.demo,
        "starting hearth"
    );

    let prefix = config.home.prefix.clone();
    let mode = if cli.demo {
        BusMode::Demo { prefix: prefix.clone() }
    } else {
        BusMode::Live(config.bus_config()?)
    };

    let mut app = App::new(&prefix, mode)?;
    app.run().await?;

    Ok(())
}
