//! Host-facing outdatedness classifier
//!
//! Maps the outdatedness tag of an installed version to a severity and keeps
//! what a notifier displays: both versions as written.

use crate::domain::{compare_outdatedness, GradleVersion, Outdatedness};
use crate::error::NotYetAvailable;
use crate::update::LatestVersion;
use serde::Serialize;
use std::fmt;

/// How urgent an update is, `Major` being the most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Revision,
    Minor,
    Major,
}

/// Classification of an installed version against the latest one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutdatednessReport {
    pub outdatedness: Outdatedness,
    /// `None` unless the installed version is behind
    pub severity: Option<Severity>,
    /// Installed version as written
    pub installed: String,
    /// Latest version as written
    pub latest: String,
}

impl Severity {
    /// Severity of an outdatedness tag
    pub fn of(outdatedness: Outdatedness) -> Option<Severity> {
        match outdatedness {
            Outdatedness::MajorDiff => Some(Severity::Major),
            Outdatedness::MinorDiff => Some(Severity::Minor),
            Outdatedness::RevisionDiff => Some(Severity::Revision),
            Outdatedness::Equal | Outdatedness::CurrentNewer => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Revision => "revision",
            Severity::Minor => "minor",
            Severity::Major => "major",
        };
        f.write_str(name)
    }
}

impl OutdatednessReport {
    /// Whether the installed version is behind
    pub fn is_outdated(&self) -> bool {
        self.severity.is_some()
    }
}

/// Classify `installed` against `latest`
pub fn classify(installed: &GradleVersion, latest: &GradleVersion) -> OutdatednessReport {
    let outdatedness = compare_outdatedness(installed, latest);
    OutdatednessReport {
        outdatedness,
        severity: Severity::of(outdatedness),
        installed: installed.to_string(),
        latest: latest.to_string(),
    }
}

/// Classify `installed` against the value held by `latest`
pub fn classify_against(
    installed: &GradleVersion,
    latest: &LatestVersion,
) -> Result<OutdatednessReport, NotYetAvailable> {
    let newest = latest.version()?;
    Ok(classify(installed, &newest))
}
