//! Line-oriented interactive mode.
//!
//! Each line is `<income> <year>`. `log <level>` changes the log filter,
//! `refresh [year]` drops cached brackets, `help` prints usage, and `quit`,
//! `exit` or end of input stops. Brackets otherwise stay cached for the
//! whole session.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::app::{AppError, TaxApp};
use crate::form::TaxForm;
use crate::logging;
use crate::views::{render_form_errors, render_result};

const USAGE: &str =
    "Enter '<income> <year>' (e.g. '75000 2022'), 'refresh [year]', 'log <level>', or 'quit'.";

enum Command<'a> {
    Calculate(TaxForm),
    SetLogLevel(&'a str),
    Refresh(Option<i32>),
    Help,
    Quit,
    Skip,
}

fn parse_command(line: &str) -> Command<'_> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (None, _, _) => Command::Skip,
        (Some("quit" | "exit"), None, _) => Command::Quit,
        (Some("help"), None, _) => Command::Help,
        (Some("log"), Some(level), None) => Command::SetLogLevel(level),
        (Some("refresh"), None, _) => Command::Refresh(None),
        (Some("refresh"), Some(year), None) => match year.parse() {
            Ok(year) => Command::Refresh(Some(year)),
            Err(_) => Command::Help,
        },
        (Some(income), Some(year), None) => Command::Calculate(TaxForm::new(income, year)),
        _ => Command::Help,
    }
}

/// Runs commands from `input` until it ends or the user quits.
///
/// Returns the number of successful calculations.
pub async fn run<R, W>(
    app: &mut TaxApp,
    input: R,
    output: &mut W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut completed = 0;

    writeln!(output, "{USAGE}")?;
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Skip => continue,
            Command::Quit => break,
            Command::Help => writeln!(output, "{USAGE}")?,
            Command::SetLogLevel(level) => match logging::set_log_level(level) {
                Ok(()) => {
                    info!(level, "log level changed");
                    writeln!(output, "Log level set to {level}")?;
                }
                Err(error) => writeln!(output, "{error}")?,
            },
            Command::Refresh(tax_year) => {
                app.refresh(tax_year);
                match tax_year {
                    Some(year) => writeln!(output, "Brackets for {year} will be fetched again")?,
                    None => writeln!(output, "All cached brackets cleared")?,
                }
            }
            Command::Calculate(form) => {
                match app.submit(&form).await {
                    Ok(result) => {
                        completed += 1;
                        writeln!(output, "{}", render_result(&result))?;
                    }
                    Err(AppError::Form(errors)) => {
                        writeln!(output, "{}", render_form_errors(&errors))?;
                    }
                    Err(_) => {
                        if let Some(message) = &app.state().error {
                            writeln!(output, "{message}")?;
                        }
                    }
                }
                output.flush()?;
            }
        }
    }

    debug!(completed, cached = ?app.cached_years(), "session ended");
    Ok(completed)
}
