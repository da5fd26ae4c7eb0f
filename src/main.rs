//! gradle-assist - Gradle build script assistant CLI tool
//!
//! Checks the project's Gradle wrapper against the latest release, inspects
//! Kotlin DSL build scripts and converts pasted declarations.

use clap::Parser;
use gradle_assist::cli::{CliArgs, Command};
use gradle_assist::orchestrator::{read_input, Orchestrator};
use gradle_assist::output::{create_formatter, OutputConfig};
use gradle_assist::settings::{installation_path, SettingsStore};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_ansi(!args.no_color)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let store = SettingsStore::new(installation_path(args.settings.as_deref())?);
    if args.verbose {
        eprintln!("gradle-assist v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Settings: {}", store.installation_path().display());
    }

    let orchestrator = Orchestrator::new(store).with_progress(!args.quiet && !args.json);
    let formatter = create_formatter(OutputConfig::from_args(&args));

    let mut stdout = io::stdout().lock();
    let has_problems = match &args.command {
        Command::Check(check) => {
            let report = orchestrator.check(check).await?;
            formatter.format_check(&report, &mut stdout)?;
            report.has_problems()
        }
        Command::Inspect(inspect) => {
            let report = orchestrator.inspect(inspect)?;
            formatter.format_inspect(&report, &mut stdout)?;
            report.has_problems()
        }
        Command::Convert(convert) => {
            let input = read_input(convert)?;
            let report = orchestrator.convert(convert, &input)?;
            formatter.format_convert(&report, &mut stdout)?;
            false
        }
        Command::Config { action } => {
            let report = orchestrator.config(action)?;
            formatter.format_config(&report, &mut stdout)?;
            false
        }
    };
    stdout.flush()?;

    if has_problems {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
