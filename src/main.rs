use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use sitebeat::source::{HttpSource, SnapshotSource};
use sitebeat::{config, report};

/// Behavioral analytics reporter for marketing sites.
#[derive(Parser)]
#[command(name = "sitebeat", about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Logging verbosity level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print version information and exit.
    Version,
}

/// Build-time version info.
mod version {
    /// Release version string (set at build time).
    pub const RELEASE: &str = env!("CARGO_PKG_VERSION");

    /// Git commit hash (set at build time via env, or "unknown").
    pub fn git_commit() -> &'static str {
        option_env!("GIT_COMMIT").unwrap_or("unknown")
    }

    /// Full version string with platform info.
    pub fn full() -> String {
        format!(
            "{} (commit: {}, {}/{})",
            RELEASE,
            git_commit(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle version subcommand before anything else.
    if let Some(Command::Version) = &cli.command {
        println!("sitebeat {}", version::full());
        return Ok(());
    }

    // Initialize tracing.
    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log level: {}", cli.log_level))?;

    fmt().with_env_filter(filter).with_target(true).init();

    // Config is required for a report run.
    let config_path = cli
        .config
        .context("--config is required (use --help for usage)")?;

    let cfg = config::Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    tracing::info!(version = version::RELEASE, "starting sitebeat");

    // Build and run the tokio runtime.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    rt.block_on(async { run(cfg).await })
}

async fn run(cfg: config::Config) -> Result<()> {
    let source = HttpSource::new(&cfg.source).context("creating snapshot source")?;

    tracing::info!(
        endpoint = %cfg.source.endpoint,
        range = cfg.source.date_range.as_str(),
        "fetching analytics snapshot",
    );

    let snapshot = source
        .fetch_snapshot(cfg.source.date_range, cfg.source.bypass_cache)
        .await
        .context("fetching analytics snapshot")?;

    let views = report::derive_views(&snapshot);

    let rendered =
        serde_json::to_string_pretty(&views).context("serializing derived views")?;
    println!("{rendered}");

    tracing::info!(
        funnel_steps = views.funnel.len(),
        devices = views.devices.len(),
        rooms = views.rooms.len(),
        "report complete",
    );

    Ok(())
}
