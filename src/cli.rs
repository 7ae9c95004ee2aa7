//! Command-line argument parsing for the `livemark` tool
//!
//! Supports:
//! - Reading a markdown document from a file or stdin
//! - Replaying a recorded edit session
//! - Choosing which view of the result is printed

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Live markdown styling engine
#[derive(Parser, Debug)]
#[command(
    name = "livemark",
    version,
    about = "Style a markdown document and replay edits against it"
)]
pub struct CliArgs {
    /// Markdown document to load ("-" or omitted reads stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Theme id (overrides the configured theme)
    #[arg(long, value_name = "ID")]
    pub theme: Option<String>,

    /// JSON array of `{ "range": { "start", "end" }, "text" }` edits to replay
    #[arg(long, value_name = "FILE.json")]
    pub edits: Option<PathBuf>,

    /// Style as if the whole document were selected
    #[arg(long)]
    pub selected: bool,

    /// Verify the line index against the text after every edit
    #[arg(long)]
    pub check: bool,

    /// What to print
    #[arg(long, value_enum, default_value_t = OutputFormat::Runs)]
    pub format: OutputFormat,
}

/// Printed view of the final document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tokens from a full scan
    Tokens,
    /// Line ranges from the line index
    Lines,
    /// Attribute runs on the styled text
    Runs,
}

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    pub theme: Option<String>,
    pub edits: Option<PathBuf>,
    pub selected: bool,
    pub check: bool,
    pub format: OutputFormat,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        let input = match self.file {
            Some(path) if path.as_os_str() != "-" => {
                if path.is_dir() {
                    return Err(format!("{} is a directory", path.display()));
                }
                InputSource::File(path)
            }
            _ => InputSource::Stdin,
        };

        if input == InputSource::Stdin
            && self.edits.as_ref().is_some_and(|p| p.as_os_str() == "-")
        {
            return Err("Cannot read both the document and the edits from stdin".to_string());
        }

        Ok(RunConfig {
            input,
            theme: self.theme,
            edits: self.edits,
            selected: self.selected,
            check: self.check,
            format: self.format,
        })
    }
}
