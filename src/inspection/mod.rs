//! Build script inspections
//!
//! This module provides:
//! - Diagnostics with a highlight level and an optional quick fix
//! - The script inspections: declaration format, deprecated configurations,
//!   Kotlin dependencies and plugin requests
//! - The wrapper version inspection
//! - Batch application of quick fixes

mod configuration;
mod format;
mod kotlin;
mod plugins;
mod wrapper;

pub use wrapper::{inspect_wrapper, wrapper_level};

use crate::error::RewriteError;
use crate::format::DeclarationFormat;
use crate::parser::{line_col, scan};
use crate::rewrite::{apply_all, normalize_edits, TextEdit};
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// How prominently a problem is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemLevel {
    WeakWarning,
    Warning,
    Deprecated,
    Error,
}

/// Inspection that reported a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionKind {
    OutdatedWrapper,
    InconsistentFormat,
    DeprecatedConfiguration,
    KotlinCoordinates,
    StdlibDependency,
    RedundantKotlinVersion,
    BuiltInPluginWithId,
    KotlinPluginWithId,
}

/// A fix offered for a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuickFix {
    /// Text edits on the inspected file
    Rewrite { title: String, edits: Vec<TextEdit> },
    /// Make the declaration's own format the preferred one
    SetPreferredFormat { format: DeclarationFormat },
}

/// A problem found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: InspectionKind,
    pub level: ProblemLevel,
    pub message: String,
    /// Byte range of the highlighted element
    pub range: Range<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<QuickFix>,
}

/// Inputs of the script inspections
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectionConfig {
    pub preferred_format: DeclarationFormat,
}

/// Outcome of applying the quick fixes of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    /// Diagnostics whose fix was applied
    pub applied: usize,
    /// Fixes left out because they collide with an earlier one
    pub skipped: usize,
}

impl ProblemLevel {
    pub fn name(&self) -> &'static str {
        match self {
            ProblemLevel::WeakWarning => "weak warning",
            ProblemLevel::Warning => "warning",
            ProblemLevel::Deprecated => "deprecated",
            ProblemLevel::Error => "error",
        }
    }
}

impl fmt::Display for ProblemLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl InspectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            InspectionKind::OutdatedWrapper => "outdated-wrapper",
            InspectionKind::InconsistentFormat => "inconsistent-format",
            InspectionKind::DeprecatedConfiguration => "deprecated-configuration",
            InspectionKind::KotlinCoordinates => "kotlin-coordinates",
            InspectionKind::StdlibDependency => "stdlib-dependency",
            InspectionKind::RedundantKotlinVersion => "redundant-kotlin-version",
            InspectionKind::BuiltInPluginWithId => "built-in-plugin-with-id",
            InspectionKind::KotlinPluginWithId => "kotlin-plugin-with-id",
        }
    }
}

impl fmt::Display for InspectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl QuickFix {
    pub fn rewrite(title: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        QuickFix::Rewrite {
            title: title.into(),
            edits,
        }
    }

    /// Human readable description
    pub fn title(&self) -> String {
        match self {
            QuickFix::Rewrite { title, .. } => title.clone(),
            QuickFix::SetPreferredFormat { format } => {
                format!("Set preferred dependency format to {}", format)
            }
        }
    }

    fn edits(&self) -> Option<&[TextEdit]> {
        match self {
            QuickFix::Rewrite { edits, .. } => Some(edits),
            QuickFix::SetPreferredFormat { .. } => None,
        }
    }
}

impl Diagnostic {
    pub fn new(
        kind: InspectionKind,
        level: ProblemLevel,
        message: impl Into<String>,
        range: Range<usize>,
    ) -> Self {
        Self {
            kind,
            level,
            message: message.into(),
            range,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: QuickFix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// 1-based line and column of the start of the problem
    pub fn position(&self, source: &str) -> (usize, usize) {
        line_col(source, self.range.start)
    }
}

/// Run every script inspection over a Kotlin DSL build script
///
/// Diagnostics are ordered by position.
pub fn inspect_script(source: &str, config: &InspectionConfig) -> Vec<Diagnostic> {
    let scan = scan(source);
    let mut diagnostics = Vec::new();
    diagnostics.extend(format::inspect(&scan, config.preferred_format));
    diagnostics.extend(configuration::inspect(&scan));
    diagnostics.extend(kotlin::inspect(source, &scan));
    diagnostics.extend(plugins::inspect(&scan));
    diagnostics.sort_by_key(|d| (d.range.start, d.range.end));
    debug!(count = diagnostics.len(), "inspected script");
    diagnostics
}

/// Apply the rewrite fixes of `diagnostics` to `source`
///
/// Fixes are taken in order; a fix touching text already changed by an
/// earlier one is skipped so the result stays well formed.
pub fn fix_all(source: &str, diagnostics: &[Diagnostic]) -> Result<FixOutcome, RewriteError> {
    let mut accepted: Vec<TextEdit> = Vec::new();
    let mut applied = 0;
    let mut skipped = 0;

    for edits in diagnostics
        .iter()
        .filter_map(|d| d.fix.as_ref().and_then(QuickFix::edits))
    {
        let collides = edits
            .iter()
            .any(|edit| accepted.iter().any(|other| overlaps(&edit.range, &other.range)));
        if collides {
            skipped += 1;
            continue;
        }
        accepted.extend(edits.iter().cloned());
        applied += 1;
    }

    let edits = normalize_edits(source, accepted);
    let text = apply_all(source, &edits)?;
    Ok(FixOutcome {
        text,
        applied,
        skipped,
    })
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    if a.is_empty() || b.is_empty() {
        return a.start.max(b.start) <= a.end.min(b.end);
    }
    a.start < b.end && b.start < a.end
}

/// Range of the line holding `range` when nothing else sits on it, otherwise `range`
pub(crate) fn statement_line(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = source[range.end..]
        .find('\n')
        .map(|i| range.end + i + 1)
        .unwrap_or(source.len());
    let before = &source[line_start..range.start];
    let after = &source[range.end..line_end];
    if before.trim().is_empty() && after.trim().is_empty() {
        line_start..line_end
    } else {
        range
    }
}
