pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use tasklet_core as core;
pub use tasklet_core::model;

pub use tasklet_core::AppConfig;
