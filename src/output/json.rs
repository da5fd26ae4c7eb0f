//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of command reports
//! - Problems with line/column positions and fix titles

use crate::inspection::{Diagnostic, InspectionKind, ProblemLevel};
use crate::orchestrator::{CheckReport, ConfigReport, ConvertReport, InspectReport};
use crate::output::{OutputFormatter, Verbosity};
use crate::update::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a problem
#[derive(Serialize)]
struct JsonDiagnostic {
    kind: InspectionKind,
    level: ProblemLevel,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
    start: usize,
    end: usize,
    /// Title of the available fix
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
}

/// JSON representation of `check`
#[derive(Serialize)]
struct JsonCheck {
    wrapper: String,
    installed: String,
    ignored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outdatedness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refreshed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem: Option<JsonDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upgrade: Option<JsonUpgrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync: Option<JsonSync>,
    dry_run: bool,
}

/// JSON representation of a wrapper upgrade
#[derive(Serialize)]
struct JsonUpgrade {
    path: String,
    changed: bool,
    written: bool,
}

/// JSON representation of a sync run
#[derive(Serialize)]
struct JsonSync {
    command: String,
    success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    stderr: String,
}

/// JSON representation of `inspect`
#[derive(Serialize)]
struct JsonInspect {
    path: String,
    problems: Vec<JsonDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonFix>,
    dry_run: bool,
}

/// JSON representation of applied fixes
#[derive(Serialize)]
struct JsonFix {
    applied: usize,
    skipped: usize,
    remaining: usize,
    written: bool,
    /// Fixed text (only in dry-run mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// JSON representation of `convert`
#[derive(Serialize)]
struct JsonConvert<'a> {
    text: &'a str,
    dependencies: usize,
    plugins: usize,
    quotes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    written: bool,
}

impl JsonFormatter {
    fn diagnostic_to_json(&self, diagnostic: &Diagnostic, source: Option<&str>) -> JsonDiagnostic {
        let position = source.map(|s| diagnostic.position(s));
        JsonDiagnostic {
            kind: diagnostic.kind,
            level: diagnostic.level,
            message: diagnostic.message.clone(),
            line: position.map(|(line, _)| line),
            column: position.map(|(_, column)| column),
            start: diagnostic.range.start,
            end: diagnostic.range.end,
            fix: diagnostic.fix.as_ref().map(|fix| fix.title()),
        }
    }

    fn write_json<T: Serialize>(&self, value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = if self.verbosity == Verbosity::Quiet {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
        .map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let classification = report.classification.as_ref();
        let output = JsonCheck {
            wrapper: report.wrapper_path.display().to_string(),
            installed: report.installed.to_string(),
            ignored: report.ignored,
            latest: classification.map(|c| c.latest.clone()),
            outdatedness: classification.map(|c| {
                serde_json::to_value(c.outdatedness)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            }),
            severity: classification.and_then(|c| c.severity),
            refreshed_at: report.refreshed_at,
            problem: report
                .diagnostic
                .as_ref()
                .map(|d| self.diagnostic_to_json(d, None)),
            upgrade: report.upgrade.as_ref().map(|u| JsonUpgrade {
                path: u.path.display().to_string(),
                changed: u.has_changes(),
                written: u.file_modified,
            }),
            sync: report.sync.as_ref().map(|s| JsonSync {
                command: s.command.clone(),
                success: s.success,
                stderr: s.stderr.clone(),
            }),
            dry_run: report.dry_run,
        };
        self.write_json(&output, writer)
    }

    fn format_inspect(
        &self,
        report: &InspectReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonInspect {
            path: report.path.display().to_string(),
            problems: report
                .diagnostics
                .iter()
                .map(|d| self.diagnostic_to_json(d, Some(&report.source)))
                .collect(),
            fix: report.fix.as_ref().map(|fix| JsonFix {
                applied: fix.applied,
                skipped: fix.skipped,
                remaining: fix.remaining.len(),
                written: fix.written,
                text: report.dry_run.then(|| fix.text.clone()),
            }),
            dry_run: report.dry_run,
        };
        self.write_json(&output, writer)
    }

    fn format_convert(
        &self,
        report: &ConvertReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonConvert {
            text: &report.conversion.text,
            dependencies: report.conversion.dependencies,
            plugins: report.conversion.plugins,
            quotes: report.conversion.quotes,
            target: report.target.as_ref().map(|t| t.display().to_string()),
            written: report.written,
        };
        self.write_json(&output, writer)
    }

    fn format_config(&self, report: &ConfigReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = match report {
            ConfigReport::Values { source, values } => {
                let values: BTreeMap<&str, &str> = values
                    .iter()
                    .map(|(key, value)| (key.name(), value.as_str()))
                    .collect();
                serde_json::json!({ "path": source.display().to_string(), "values": values })
            }
            ConfigReport::Set { key, value, path } => serde_json::json!({
                "path": path.display().to_string(),
                "key": key.name(),
                "value": value,
            }),
            ConfigReport::Path { path } => serde_json::json!({ "path": path.display().to_string() }),
        };
        self.write_json(&output, writer)
    }
}
