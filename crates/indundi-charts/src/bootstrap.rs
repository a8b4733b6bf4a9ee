use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the application directory under the home directory.
const APP_DIR: &str = ".indundi-charts";
/// Log file used by the dashboard when `--log-file` is not given.
const DEFAULT_LOG_FILE: &str = "indundi-charts.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure `~/.indundi-charts/` and `~/.indundi-charts/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&home_dir())
}

/// Create the application directories under `home`.
pub fn ensure_directories_in(home: &Path) -> anyhow::Result<()> {
    let app_dir = home.join(APP_DIR);
    fs::create_dir_all(app_dir.join("logs"))
        .with_context(|| format!("failed to create {}", app_dir.display()))?;
    Ok(())
}

/// `~/.indundi-charts/logs/indundi-charts.log`.
pub fn default_log_file() -> PathBuf {
    home_dir().join(APP_DIR).join("logs").join(DEFAULT_LOG_FILE)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an [`EnvFilter`] directive.
///
/// Unknown names fall back to `"info"`.
pub fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to `log_file` (appended, without colours) when given,
/// otherwise to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("logging already initialised")?;

    Ok(())
}

// ── Snapshot description ───────────────────────────────────────────────────────

/// Header text naming the loaded snapshot files.
pub fn snapshot_source(channels: &Path, videos: &Path) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    format!("{} + {}", name(channels), name(videos))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
