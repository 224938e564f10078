//! CLI entry point for the fwbar file watcher.
//!
//! This binary wires the watcher pool to the label pipeline and hosts a
//! line-oriented stdout surface, so label updates can be observed (or piped
//! into a status bar) without any GUI toolkit.
//!
//! # Usage
//!
//! ```bash
//! fwbar [OPTIONS] <COMMAND>
//!
//! # Watch the configured directories and print label updates
//! fwbar run --config fwbar.json
//!
//! # Validate a configuration and show the resolved watch targets
//! fwbar check --config fwbar.json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fw_core::WatcherConfig;
use fw_label::{LabelPart, LabelPipeline, LabelSurface};
use fw_watcher::{PathSpec, WatcherPool, EVENT_CHANNEL_CAPACITY};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long to wait for watcher threads to wind down on shutdown.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Watches directories and renders filesystem activity as status-bar labels.
#[derive(Parser)]
#[command(name = "fwbar", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON configuration file.
    #[arg(short, long, global = true, env = "FWBAR_CONFIG", default_value = "fwbar.json")]
    config: Utf8PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Watch the configured directories and print label updates.
    Run,

    /// Validate the configuration and show the resolved watch targets.
    Check,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default. The
/// noisy `notify` backend is filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},notify=warn,mio=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Loads the configuration and resolves every entry into a watch target.
///
/// Entries that fail to resolve are logged and skipped; `run` carries on
/// with the rest, `check` reports them via the returned count.
fn load_and_resolve(path: &Utf8PathBuf) -> color_eyre::Result<(WatcherConfig, Vec<PathSpec>, usize)> {
    let config = WatcherConfig::load(path)
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration {path}: {e}"))?;

    let mut specs = Vec::with_capacity(config.entries.len());
    let mut failed = 0_usize;
    for (index, entry) in config.entries.iter().enumerate() {
        match PathSpec::resolve(entry, index) {
            Ok(spec) => specs.push(spec),
            Err(e) => {
                error!(index, directory = %entry.directory, error = %e, "skipping entry");
                failed += 1;
            }
        }
    }

    Ok((config, specs, failed))
}

// =============================================================================
// STDOUT SURFACE
// =============================================================================

/// A reference [`LabelSurface`] that writes label updates line by line.
///
/// Each shown part becomes one `[index] text (class)` line; clearing the
/// element prints `(cleared)`. Hidden part slots produce no output.
#[derive(Debug, Default)]
struct StdoutSurface;

impl LabelSurface for StdoutSurface {
    fn set_part(&mut self, index: usize, part: &LabelPart) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "[{index}] {} ({})", part.text, part.class);
    }

    fn hide_part(&mut self, _index: usize) {}

    fn set_visible(&mut self, visible: bool) {
        if !visible {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "(cleared)");
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Watches the configured directories until ctrl-c or SIGTERM.
async fn run_watch(config: WatcherConfig, specs: Vec<PathSpec>) -> color_eyre::Result<()> {
    if specs.is_empty() {
        return Err(color_eyre::eyre::eyre!("no usable watch entries"));
    }

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let pool = WatcherPool::start(specs, event_tx)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("failed to start watchers: {e}"))?;
    info!(watchers = pool.len(), "fwbar running");

    let shutdown = CancellationToken::new();
    let pipeline = LabelPipeline::new(&config, StdoutSurface);
    let pipeline_task = tokio::spawn(pipeline.run(event_rx, shutdown.clone()));

    wait_for_signal().await?;
    info!("shutting down");

    shutdown.cancel();
    let _ = pipeline_task.await;
    pool.stop_all(STOP_TIMEOUT).await;

    Ok(())
}

/// Blocks until ctrl-c, or SIGTERM on Unix.
async fn wait_for_signal() -> color_eyre::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

/// Validates the configuration and prints the resolved watch targets.
fn run_check(specs: &[PathSpec], failed: usize) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    for spec in specs {
        let _ = writeln!(handle, "{}", spec.directory);
        let _ = writeln!(
            handle,
            "  recursive: {}, read_content: {}, max_content_bytes: {}",
            spec.recursive, spec.read_content, spec.max_content_bytes
        );
        let _ = writeln!(handle, "  patterns: {:?}", spec.patterns);
        if !spec.ignore_patterns.is_empty() {
            let _ = writeln!(handle, "  ignore:   {:?}", spec.ignore_patterns);
        }
        if !spec.directory.is_dir() {
            let _ = writeln!(handle, "  warning: directory does not exist");
        }
    }

    let _ = writeln!(handle, "{} target(s) ok, {} failed", specs.len(), failed);

    if failed > 0 {
        return Err(color_eyre::eyre::eyre!("{failed} entries failed to resolve"));
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Install color-eyre first, before any potential panics
    color_eyre::install()?;

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);

    let (config, specs, failed) = load_and_resolve(&cli.config)?;

    match cli.command {
        Commands::Run => run_watch(config, specs).await,
        Commands::Check => run_check(&specs, failed),
    }
}
