use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = tasklet::cli::Cli::parse();
    let config = tasklet::config::from_cli(&cli)?;
    tasklet::logging::init_tracing(&config, cli.log_filter.as_deref())?;

    match cli.command.clone() {
        Some(tasklet::cli::CliCommand::Tui) | None => {
            tasklet::tui::run(config)?;
        }
        Some(command) => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            tasklet::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
