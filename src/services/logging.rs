use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILE: &str = "stepper-tui.log";

/// Routes `tracing` output to a file; the terminal belongs to the UI.
/// Filter comes from `STEPPER_TUI_LOG` (default `info`).
pub fn init_tracing() -> Result<()> {
    let path = std::env::var("STEPPER_TUI_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file: {path:?}"))?;
    let filter =
        EnvFilter::try_from_env("STEPPER_TUI_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;
    Ok(())
}
