//! CLI argument parsing module for gradle-assist

use crate::domain::GradleVersion;
use crate::format::DeclarationFormat;
use crate::settings::SettingsKey;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Gradle build script assistant
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gradle-assist",
    version,
    about = "Gradle build script assistant: wrapper checks, inspections and paste conversion"
)]
pub struct CliArgs {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Installation settings file (overridden by $GRADLE_ASSIST_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compare the project's Gradle wrapper with the latest release
    Check(CheckArgs),
    /// Inspect a Kotlin DSL build script
    Inspect(InspectArgs),
    /// Convert dependency and plugin declarations to the Kotlin DSL
    Convert(ConvertArgs),
    /// Read or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub project: PathBuf,

    /// Use this latest version instead of querying the release feed
    #[arg(long, value_name = "VERSION")]
    pub latest: Option<GradleVersion>,

    /// Release feed to query
    #[arg(long, value_name = "URL")]
    pub feed_url: Option<String>,

    /// Check even when outdated versions are ignored
    #[arg(long)]
    pub force: bool,

    /// Rewrite the wrapper to the latest version when outdated
    #[arg(long)]
    pub upgrade: bool,

    /// Run the wrapper after upgrading
    #[arg(long, requires = "upgrade")]
    pub sync: bool,

    /// Show what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Build script to inspect
    pub script: PathBuf,

    /// Preferred dependency format (default: from settings)
    #[arg(long)]
    pub format: Option<DeclarationFormat>,

    /// Apply the available fixes
    #[arg(long)]
    pub fix: bool,

    /// With --fix, show the result without writing
    #[arg(short = 'n', long, requires = "fix")]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// File with the text to convert, `-` or nothing for standard input
    pub input: Option<PathBuf>,

    /// Target dependency format (default: from settings)
    #[arg(long)]
    pub format: Option<DeclarationFormat>,

    /// Turn single-quoted strings into double-quoted ones
    #[arg(long)]
    pub quotes: bool,

    /// Paste the converted text into this script
    #[arg(long, value_name = "SCRIPT", requires = "offset")]
    pub into: Option<PathBuf>,

    /// Byte offset in the target script
    #[arg(long, requires = "into")]
    pub offset: Option<usize>,

    /// Write the result back to the target script
    #[arg(long, requires = "into")]
    pub write: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print one setting, or all of them
    Get {
        key: Option<SettingsKey>,
        /// Resolve with the settings of this project
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },
    /// Change a setting
    Set {
        key: SettingsKey,
        value: String,
        /// Store in the settings of this project
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },
    /// Print the settings file location
    Path {
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },
}

impl ConvertArgs {
    /// Input file, `None` when reading standard input
    pub fn input_file(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}
