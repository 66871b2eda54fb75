use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: LineCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// Search events by keyword
    Search {
        keyword: Vec<String>,
        #[arg(long, default_value = "")]
        distance: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Toggle IP-based location detection
    Auto {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Sort results by name, genre or venue
    Sort { column: String },
    /// Open an event by row number or event id
    Open { target: String },
    /// Show details for the open event's venue
    Venue,
    CloseEvent,
    CloseVenue,
    /// Reset the form, results and panels
    Clear,
    Show,
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

/// `Ok(None)` for a blank line. Quoting follows shell rules, so
/// `--location "Los Angeles, CA"` stays one argument.
pub fn parse_line(line: &str) -> Result<Option<LineCommand>> {
    let tokens = shell_words::split(line).context("could not split input line")?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let parsed = Line::try_parse_from(tokens)?;
    Ok(Some(parsed.command))
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
