pub use tasklet_core::config::*;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::core::{FileStore, TaskStorage};

pub fn from_cli(cli: &Cli) -> Result<AppConfig> {
    AppConfig::discover(cli.data_dir.clone()).context("failed to resolve data directory")
}

/// Task storage backed by JSON files in the configured data directory.
pub fn open_storage(config: &AppConfig) -> Result<TaskStorage> {
    let store = FileStore::open(config.data_dir()).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.data_dir().display()
        )
    })?;
    Ok(TaskStorage::new(store))
}
