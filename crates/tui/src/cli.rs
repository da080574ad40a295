use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::FilterMode;
use crate::tui::SessionOptions;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklet",
    version,
    about = "A small keyboard-first to-do list for the terminal.",
    after_help = "Examples:\n  tasklet                                  Launch the TUI (same as `tasklet tui`)\n  tasklet --task 'water plants' --filter active\n  tasklet check 'buy oat milk' '9 lives'"
)]
pub struct Cli {
    /// Override the log directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Tracing filter for the log file (e.g. "info", "debug"); RUST_LOG takes precedence
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Validate task text without starting the UI
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Filter applied when the UI opens
    #[arg(long, value_enum, default_value_t = FilterMode::All)]
    pub filter: FilterMode,

    /// Seed a task before the UI opens (repeatable; invalid text is skipped)
    #[arg(long = "task", value_name = "TEXT")]
    pub tasks: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// One or more candidate task texts
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,
}

impl From<SessionArgs> for SessionOptions {
    fn from(args: SessionArgs) -> Self {
        SessionOptions {
            filter: args.filter,
            tasks: args.tasks,
        }
    }
}
