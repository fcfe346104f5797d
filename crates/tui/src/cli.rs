use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::Filter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklet",
    version,
    about = "A small keyboard-driven task list that lives in your terminal.",
    after_help = "Examples:\n  tasklet                  Launch the TUI (same as `tasklet tui`)\n  tasklet add Buy milk\n  tasklet list --filter active\n  tasklet delete 01HZY3M6"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter for the log file (e.g. "info", "tasklet_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Add a task
    Add(AddArgs),
    /// Print tasks, newest first
    List(ListArgs),
    /// Delete one or more tasks by id
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task text; multiple words are joined with spaces
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,
}

impl AddArgs {
    pub fn joined(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Which tasks to show
    #[arg(long, value_enum, default_value_t = Filter::All)]
    pub filter: Filter,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// One or more task ids to delete (`tasklet list` prints them)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}
