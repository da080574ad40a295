use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = tasklet::cli::Cli::parse();

    match cli.command.clone() {
        Some(tasklet::cli::CliCommand::Tui) | None => {
            let config = tasklet::config::from_cli(&cli)?;
            tasklet::config::init_tracing(&config, cli.log_filter.as_deref())?;
            tasklet::tui::run(cli.session.into())?;
        }
        Some(command) => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            tasklet::commands::execute(command, &mut handle)?;
        }
    }

    Ok(())
}
