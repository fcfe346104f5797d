use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::cli::{AddArgs, CliCommand, DeleteArgs, ListArgs};
use crate::config::{open_storage, AppConfig};
use crate::core::view::neutralize_text;
use crate::core::{render, TaskStore};

/// Run a one-shot command against the persisted store and print its outcome.
pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Add(args) => handle_add(config, &args, &mut writer),
        CliCommand::List(args) => handle_list(config, &args, &mut writer),
        CliCommand::Delete(args) => handle_delete(config, &args, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

/// A corrupt entry is an error here: one-shot writes must not clobber it.
fn open_store(config: &AppConfig) -> Result<TaskStore> {
    let mut store = TaskStore::new(open_storage(config)?);
    store.load().context("failed to load saved tasks")?;
    Ok(store)
}

fn handle_add<W: Write>(config: &AppConfig, args: &AddArgs, mut writer: W) -> Result<()> {
    let mut store = open_store(config)?;
    let task = store.add(&args.joined())?;
    info!(task_id = %task.id, "task added from command line");
    writeln!(writer, "Added {} {}", task.id, neutralize_text(&task.text))?;
    Ok(())
}

fn handle_list<W: Write>(config: &AppConfig, args: &ListArgs, mut writer: W) -> Result<()> {
    let store = open_store(config)?;
    let view = render(store.tasks(), args.filter);
    let stats = view.stats;
    writeln!(
        writer,
        "Total: {}  Active: {}  Completed: {}",
        stats.total,
        stats.active(),
        stats.completed
    )?;

    if let Some(empty) = view.empty_state() {
        writeln!(writer, "{} {} {}", empty.icon, empty.title, empty.message)?;
        return Ok(());
    }
    for row in view.rows() {
        let check = if row.completed { "[x]" } else { "[ ]" };
        writeln!(writer, "{check} {} {}", row.id, row.text)?;
    }
    Ok(())
}

fn handle_delete<W: Write>(config: &AppConfig, args: &DeleteArgs, mut writer: W) -> Result<()> {
    let mut store = open_store(config)?;
    let mut summary = DeleteSummary::default();
    for id in &args.ids {
        match store.remove(id)? {
            Some(_) => summary.deleted += 1,
            None => summary.missing.push(id.clone()),
        }
    }
    summary.write_to(&mut writer)?;
    Ok(())
}

#[derive(Debug, Default)]
struct DeleteSummary {
    deleted: usize,
    missing: Vec<String>,
}

impl DeleteSummary {
    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::deleted(self.deleted))?;
        if !self.missing.is_empty() {
            writeln!(writer, "Not found: {}", self.missing.join(", "))?;
        }
        Ok(())
    }
}

enum SummaryLine {
    Deleted(usize),
    NoneDeleted,
}

impl SummaryLine {
    fn deleted(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Deleted(count)
        } else {
            SummaryLine::NoneDeleted
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Deleted(count) => {
                write!(
                    f,
                    "Deleted {} task{}",
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneDeleted => write!(f, "No tasks deleted"),
        }
    }
}
