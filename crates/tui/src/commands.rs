use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Result};

use crate::cli::{CheckArgs, CliCommand};
use crate::core::validate;

pub fn execute<W: Write>(command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Check(args) => handle_check(&args, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch interactive surfaces directly")),
    }
}

fn handle_check<W: Write>(args: &CheckArgs, mut writer: W) -> Result<()> {
    let mut rejected = 0usize;
    for text in &args.text {
        let line = CheckLine::from_text(text);
        if matches!(line, CheckLine::Rejected(_)) {
            rejected += 1;
        }
        writeln!(writer, "{line}")?;
    }

    if rejected > 0 {
        return Err(anyhow!(
            "{} of {} task{} failed validation",
            rejected,
            args.text.len(),
            if args.text.len() == 1 { "" } else { "s" }
        ));
    }
    Ok(())
}

enum CheckLine<'a> {
    Accepted(&'a str),
    Rejected(validate::ValidationError),
}

impl<'a> CheckLine<'a> {
    fn from_text(text: &'a str) -> Self {
        match validate::validate(text) {
            Ok(trimmed) => CheckLine::Accepted(trimmed),
            Err(err) => CheckLine::Rejected(err),
        }
    }
}

impl fmt::Display for CheckLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckLine::Accepted(text) => write!(f, "ok: {text}"),
            CheckLine::Rejected(err) => write!(f, "error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_check(text: &[&str]) -> (Result<()>, String) {
        let args = CheckArgs {
            text: text.iter().map(|t| t.to_string()).collect(),
        };
        let mut output = Vec::new();
        let result = execute(CliCommand::Check(args), &mut output);
        (result, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn check_reports_each_input() {
        let (result, output) = run_check(&["  buy oat milk ", "abc", "9abcd", ""]);

        assert_eq!(
            output,
            "ok: buy oat milk\n\
             error: Task must be at least 5 characters long\n\
             error: Task cannot start with a number\n\
             error: Task cannot be empty\n"
        );
        let err = result.expect_err("invalid inputs fail the command");
        assert_eq!(err.to_string(), "3 of 4 tasks failed validation");
    }

    #[test]
    fn check_succeeds_when_everything_is_valid() {
        let (result, output) = run_check(&["hello world"]);

        assert!(result.is_ok());
        assert_eq!(output, "ok: hello world\n");
    }

    #[test]
    fn tui_is_not_a_batch_command() {
        let mut output = Vec::new();
        assert!(execute(CliCommand::Tui, &mut output).is_err());
    }
}
