//! Output formatting for command reports
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::CliArgs;
use crate::orchestrator::{CheckReport, ConfigReport, ConvertReport, InspectReport};
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Problems and errors only
    Quiet,
    #[default]
    Normal,
    /// Also fix titles, the latest release and settings file locations
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Color text output
    pub color: bool,
}

impl OutputConfig {
    /// Output configuration of the global flags; `--quiet` wins over `--verbose`
    pub fn from_args(args: &CliArgs) -> Self {
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self {
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            verbosity,
            color: !args.no_color,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the wrapper check result
    fn format_check(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write the inspection result
    fn format_inspect(&self, report: &InspectReport, writer: &mut dyn Write)
        -> std::io::Result<()>;

    /// Format and write the conversion result
    fn format_convert(&self, report: &ConvertReport, writer: &mut dyn Write)
        -> std::io::Result<()>;

    /// Format and write a settings command result
    fn format_config(&self, report: &ConfigReport, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> OutputConfig {
        let mut argv = vec!["gradle-assist"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        OutputConfig::from_args(&CliArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert!(config.color);
    }

    #[test]
    fn test_json() {
        let config = config(&["--json"]);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(config(&["--verbose", "-q"]).verbosity, Verbosity::Quiet);
        assert_eq!(config(&["--verbose"]).verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_no_color() {
        assert!(!config(&["--no-color"]).color);
    }
}
