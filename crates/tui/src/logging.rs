use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install the global subscriber, appending to the log file in the data directory.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or stderr.
/// `RUST_LOG` refines the default directive taken from `--log`.
pub fn init_tracing(config: &AppConfig, filter: Option<&str>) -> Result<()> {
    let directive: Directive = filter
        .unwrap_or("info")
        .parse()
        .context("invalid --log directive")?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("failed to open log file {}", config.log_path().display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
