//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Problem lines in `path:line:column: level: message` form, colored by level
//! - Wrapper check results with upgrade and sync outcome
//! - Converted text and settings values

use crate::inspection::{Diagnostic, ProblemLevel};
use crate::orchestrator::{CheckReport, ConfigReport, ConvertReport, InspectReport};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self, dry_run: bool) -> String {
        if !dry_run {
            String::new()
        } else if self.color {
            format!("{} ", "(dry-run)".cyan())
        } else {
            "(dry-run) ".to_string()
        }
    }

    fn level_label(&self, level: ProblemLevel) -> String {
        let label = level.name();
        if !self.color {
            return label.to_string();
        }
        match level {
            ProblemLevel::Error => label.red().bold().to_string(),
            ProblemLevel::Deprecated => label.magenta().bold().to_string(),
            ProblemLevel::Warning => label.yellow().to_string(),
            ProblemLevel::WeakWarning => label.dimmed().to_string(),
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.color {
            format!("{} {}", "✓".green(), text)
        } else {
            format!("✓ {}", text)
        }
    }

    /// Write one problem line, with its fix in verbose mode
    fn format_diagnostic(
        &self,
        path: &Path,
        source: Option<&str>,
        diagnostic: &Diagnostic,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let location = match source {
            Some(source) => {
                let (line, column) = diagnostic.position(source);
                format!("{}:{}:{}", path.display(), line, column)
            }
            None => path.display().to_string(),
        };
        let kind = format!("[{}]", diagnostic.kind);
        writeln!(
            writer,
            "{}: {}: {} {}",
            location,
            self.level_label(diagnostic.level),
            diagnostic.message,
            self.dimmed(&kind)
        )?;

        if self.verbosity == Verbosity::Verbose {
            if let Some(fix) = &diagnostic.fix {
                writeln!(writer, "    {} {}", self.dimmed("fix:"), fix.title())?;
            }
        }
        Ok(())
    }
}

fn count(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

impl OutputFormatter for TextFormatter {
    fn format_check(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let quiet = self.verbosity == Verbosity::Quiet;

        if report.ignored {
            if !quiet {
                writeln!(
                    writer,
                    "{}: Gradle {}, outdated versions are ignored for this project (use --force to check)",
                    report.wrapper_path.display(),
                    report.installed
                )?;
            }
            return Ok(());
        }

        let Some(classification) = &report.classification else {
            return Ok(());
        };

        if self.verbosity == Verbosity::Verbose {
            let fetched = report
                .refreshed_at
                .map(|at| format!(" (fetched {})", at.format("%Y/%m/%d %H:%M")))
                .unwrap_or_default();
            writeln!(
                writer,
                "{}",
                self.dimmed(&format!("Latest Gradle release: {}{}", classification.latest, fetched))
            )?;
        }

        match &report.diagnostic {
            None => {
                if !quiet {
                    writeln!(
                        writer,
                        "{}",
                        self.success(&format!("Gradle {} is up to date", report.installed))
                    )?;
                }
            }
            Some(diagnostic) => {
                if !(quiet && report.upgraded()) {
                    self.format_diagnostic(&report.wrapper_path, None, diagnostic, writer)?;
                }
            }
        }

        if let Some(upgrade) = &report.upgrade {
            if !quiet && upgrade.has_changes() {
                let prefix = self.dry_run_prefix(report.dry_run);
                let verb = if upgrade.file_modified {
                    "Upgraded"
                } else {
                    "Would upgrade"
                };
                writeln!(
                    writer,
                    "{}{} {} to Gradle {}",
                    prefix,
                    verb,
                    upgrade.path.display(),
                    classification.latest
                )?;
            }
        } else if report.diagnostic.is_some() && classification.is_outdated() && !quiet {
            writeln!(
                writer,
                "  Run with --upgrade to change the wrapper to {}",
                classification.latest
            )?;
        }

        if let Some(sync) = &report.sync {
            if sync.success {
                if !quiet {
                    writeln!(writer, "Synced project with `{}`", sync.command)?;
                }
            } else {
                writeln!(writer, "Sync failed: `{}`", sync.command)?;
                for line in sync.stderr.trim().lines() {
                    writeln!(writer, "    {}", line)?;
                }
            }
        }
        Ok(())
    }

    fn format_inspect(
        &self,
        report: &InspectReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for diagnostic in &report.diagnostics {
            self.format_diagnostic(&report.path, Some(&report.source), diagnostic, writer)?;
        }
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        if report.diagnostics.is_empty() {
            writeln!(
                writer,
                "{}",
                self.success(&format!("No problems found in {}", report.path.display()))
            )?;
        } else {
            writeln!(
                writer,
                "{} found in {}",
                count(report.diagnostics.len(), "problem", "problems"),
                report.path.display()
            )?;
        }

        let Some(fix) = &report.fix else {
            return Ok(());
        };
        let prefix = self.dry_run_prefix(report.dry_run);
        let mut line = format!(
            "{}{} {}",
            prefix,
            if report.dry_run { "Would apply" } else { "Applied" },
            count(fix.applied, "fix", "fixes")
        );
        if fix.skipped > 0 {
            line.push_str(&format!(", skipped {}", count(fix.skipped, "conflicting fix", "conflicting fixes")));
        }
        writeln!(writer, "{}", line)?;
        if !fix.remaining.is_empty() {
            writeln!(
                writer,
                "{} left",
                count(fix.remaining.len(), "problem", "problems")
            )?;
        }
        if report.dry_run && fix.applied > 0 {
            writeln!(writer)?;
            write!(writer, "{}", fix.text)?;
        }
        Ok(())
    }

    fn format_convert(
        &self,
        report: &ConvertReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match &report.target {
            Some(target) if report.written => {
                if self.verbosity != Verbosity::Quiet {
                    writeln!(
                        writer,
                        "Pasted into {}: {} converted",
                        target.display(),
                        count(report.conversion.changes(), "declaration", "declarations")
                    )?;
                }
                Ok(())
            }
            _ => write!(writer, "{}", report.conversion.text),
        }
    }

    fn format_config(&self, report: &ConfigReport, writer: &mut dyn Write) -> std::io::Result<()> {
        match report {
            ConfigReport::Values { source, values } => {
                if self.verbosity == Verbosity::Verbose {
                    writeln!(writer, "{}", self.dimmed(&format!("# {}", source.display())))?;
                }
                for (key, value) in values {
                    if values.len() == 1 {
                        writeln!(writer, "{}", value)?;
                    } else {
                        writeln!(writer, "{} = {}", key, value)?;
                    }
                }
            }
            ConfigReport::Set { key, value, path } => {
                if self.verbosity != Verbosity::Quiet {
                    writeln!(writer, "{} = {} ({})", key, value, path.display())?;
                }
            }
            ConfigReport::Path { path } => writeln!(writer, "{}", path.display())?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Conversion;
    use crate::domain::GradleVersion;
    use crate::gradle_sync::SyncResult;
    use crate::inspection::{inspect_script, InspectionConfig, InspectionKind, QuickFix};
    use crate::orchestrator::FixReport;
    use crate::rewrite::{TextEdit, WriteResult};
    use crate::settings::SettingsKey;
    use crate::update::classify;
    use std::path::PathBuf;

    fn render(formatter: &TextFormatter, f: impl Fn(&TextFormatter, &mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        f(formatter, &mut out);
        String::from_utf8(out).unwrap()
    }

    fn plain(verbosity: Verbosity) -> TextFormatter {
        TextFormatter::with_color(verbosity, false)
    }

    fn check_report(installed: GradleVersion, latest: GradleVersion) -> CheckReport {
        let classification = classify(&installed, &latest);
        let diagnostic = classification.is_outdated().then(|| {
            Diagnostic::new(
                InspectionKind::OutdatedWrapper,
                ProblemLevel::Warning,
                format!("Gradle {} is outdated, the latest version is {}", installed, latest),
                0..10,
            )
            .with_fix(QuickFix::rewrite("Change Gradle version", vec![TextEdit::new(0..3, "x")]))
        });
        CheckReport {
            wrapper_path: PathBuf::from("gradle/wrapper/gradle-wrapper.properties"),
            installed,
            ignored: false,
            classification: Some(classification),
            refreshed_at: None,
            diagnostic,
            upgrade: None,
            sync: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_check_up_to_date() {
        let report = check_report(GradleVersion::new(8, 10, 2), GradleVersion::new(8, 10, 2));
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_check(&report, w).unwrap());
        assert_eq!(out, "✓ Gradle 8.10.2 is up to date\n");

        let out = render(&plain(Verbosity::Quiet), |f, w| f.format_check(&report, w).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_outdated() {
        let report = check_report(GradleVersion::without_revision(8, 5), GradleVersion::new(8, 10, 2));
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_check(&report, w).unwrap());
        assert!(out.contains(
            "gradle/wrapper/gradle-wrapper.properties: warning: Gradle 8.5 is outdated, the latest version is 8.10.2 [outdated-wrapper]"
        ));
        assert!(out.contains("Run with --upgrade"));
    }

    #[test]
    fn test_check_upgraded_and_synced() {
        let mut report = check_report(GradleVersion::without_revision(8, 5), GradleVersion::new(8, 10, 2));
        report.upgrade = Some(WriteResult {
            path: report.wrapper_path.clone(),
            edits_applied: 1,
            file_modified: true,
            content: String::new(),
        });
        report.sync = Some(SyncResult::failure(
            "./gradlew help".into(),
            String::new(),
            "FAILURE: Build failed\n".into(),
        ));
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_check(&report, w).unwrap());
        assert!(out.contains("Upgraded gradle/wrapper/gradle-wrapper.properties to Gradle 8.10.2\n"));
        assert!(out.contains("Sync failed: `./gradlew help`\n    FAILURE: Build failed\n"));
        assert!(!out.contains("--upgrade"));
    }

    #[test]
    fn test_check_ignored() {
        let mut report = check_report(GradleVersion::new(7, 0, 0), GradleVersion::new(8, 0, 0));
        report.ignored = true;
        report.classification = None;
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_check(&report, w).unwrap());
        assert!(out.contains("outdated versions are ignored"));
    }

    #[test]
    fn test_inspect_output() {
        let source = "dependencies {\n    compile(\"a:b:1\")\n}\n".to_string();
        let diagnostics = inspect_script(&source, &InspectionConfig::default());
        let report = InspectReport {
            path: PathBuf::from("build.gradle.kts"),
            source,
            diagnostics,
            fix: None,
            dry_run: false,
        };

        let out = render(&plain(Verbosity::Verbose), |f, w| f.format_inspect(&report, w).unwrap());
        assert!(out.contains(
            "build.gradle.kts:2:5: warning: 'compile' configuration is deprecated, use 'implementation' [deprecated-configuration]\n"
        ));
        assert!(out.contains("    fix: Replace with 'implementation'\n"));
        assert!(out.contains("1 problem found in build.gradle.kts\n"));
    }

    #[test]
    fn test_inspect_fix_dry_run() {
        let report = InspectReport {
            path: PathBuf::from("build.gradle.kts"),
            source: String::new(),
            diagnostics: Vec::new(),
            fix: Some(FixReport {
                applied: 2,
                skipped: 1,
                remaining: Vec::new(),
                text: "fixed\n".into(),
                written: false,
            }),
            dry_run: true,
        };
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_inspect(&report, w).unwrap());
        assert!(out.contains("✓ No problems found in build.gradle.kts\n"));
        assert!(out.contains("(dry-run) Would apply 2 fixes, skipped 1 conflicting fix\n"));
        assert!(out.ends_with("\nfixed\n"));
    }

    #[test]
    fn test_convert_output() {
        let conversion = Conversion {
            text: "implementation(\"a:b:1\")\n".into(),
            dependencies: 1,
            plugins: 0,
            quotes: 0,
        };
        let report = ConvertReport {
            conversion: conversion.clone(),
            target: None,
            written: false,
        };
        let out = render(&plain(Verbosity::Quiet), |f, w| f.format_convert(&report, w).unwrap());
        assert_eq!(out, "implementation(\"a:b:1\")\n");

        let report = ConvertReport {
            conversion,
            target: Some(PathBuf::from("build.gradle.kts")),
            written: true,
        };
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_convert(&report, w).unwrap());
        assert_eq!(out, "Pasted into build.gradle.kts: 1 declaration converted\n");
    }

    #[test]
    fn test_config_output() {
        let report = ConfigReport::Values {
            source: PathBuf::from("settings.toml"),
            values: vec![
                (SettingsKey::IgnoreOutdatedVersion, "false".into()),
                (SettingsKey::DependencyFormat, "named".into()),
            ],
        };
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_config(&report, w).unwrap());
        assert_eq!(out, "ignore-outdated-version = false\ndependency-format = named\n");

        let report = ConfigReport::Values {
            source: PathBuf::from("settings.toml"),
            values: vec![(SettingsKey::DependencyFormat, "named".into())],
        };
        let out = render(&plain(Verbosity::Normal), |f, w| f.format_config(&report, w).unwrap());
        assert_eq!(out, "named\n");
    }

    #[test]
    fn test_colored_level() {
        let formatter = TextFormatter::new(Verbosity::Normal);
        colored::control::set_override(true);
        assert!(formatter.level_label(ProblemLevel::Error).contains("error"));
        assert_ne!(formatter.level_label(ProblemLevel::Error), "error");
        colored::control::unset_override();
    }
}
