//! Gradle version model
//!
//! This module provides:
//! - `GradleVersion`: `major.minor[.revision]`, numeric ordering, textual rendering
//! - `Outdatedness`: directional classification of an installed version against the latest
//! - `compare_outdatedness`: the classifier itself

use crate::error::VersionError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

/// A Gradle release version
///
/// Equality, hashing and ordering are numeric with an absent revision counted
/// as `0`, so `1.2` and `1.2.0` compare equal. Rendering reproduces the form
/// the version was built from.
#[derive(Debug, Clone, Copy)]
pub struct GradleVersion {
    major: u32,
    minor: u32,
    revision: Option<u32>,
}

/// How far an installed version is behind the latest one
///
/// The first differing component (major, then minor, then revision) decides
/// the tag. Whenever the installed version is ahead, the result is
/// `CurrentNewer` regardless of which component differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outdatedness {
    /// Same version
    Equal,
    /// Only the revision is behind
    RevisionDiff,
    /// The minor version is behind
    MinorDiff,
    /// The major version is behind
    MajorDiff,
    /// Installed version is newer than the latest known one
    CurrentNewer,
}

impl GradleVersion {
    /// Create a version with a revision component
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision: Some(revision),
        }
    }

    /// Create a two-component version (`major.minor`)
    pub fn without_revision(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            revision: None,
        }
    }

    /// Parse `major.minor` or `major.minor.revision`
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let caps = VERSION_RE
            .captures(text)
            .ok_or_else(|| VersionError::invalid_format(text))?;

        let component = |index: usize| -> Result<Option<u32>, VersionError> {
            caps.get(index)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map_err(|_| VersionError::invalid_format(text))
        };

        let major = component(1)?.ok_or_else(|| VersionError::invalid_format(text))?;
        let minor = component(2)?.ok_or_else(|| VersionError::invalid_format(text))?;
        let revision = component(3)?;

        Ok(Self {
            major,
            minor,
            revision,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Revision as written, `None` for two-component versions
    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.revision.unwrap_or(0))
    }
}

/// Classify `current` against `latest`
pub fn compare_outdatedness(current: &GradleVersion, latest: &GradleVersion) -> Outdatedness {
    let components = [
        (current.major, latest.major, Outdatedness::MajorDiff),
        (current.minor, latest.minor, Outdatedness::MinorDiff),
        (
            current.revision.unwrap_or(0),
            latest.revision.unwrap_or(0),
            Outdatedness::RevisionDiff,
        ),
    ];

    for (installed, newest, tag) in components {
        match installed.cmp(&newest) {
            Ordering::Equal => continue,
            Ordering::Less => return tag,
            Ordering::Greater => return Outdatedness::CurrentNewer,
        }
    }

    Outdatedness::Equal
}

impl Outdatedness {
    /// Whether the installed version is behind
    pub fn is_outdated(&self) -> bool {
        matches!(
            self,
            Outdatedness::RevisionDiff | Outdatedness::MinorDiff | Outdatedness::MajorDiff
        )
    }
}

impl fmt::Display for Outdatedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outdatedness::Equal => "up to date",
            Outdatedness::RevisionDiff => "revision behind",
            Outdatedness::MinorDiff => "minor version behind",
            Outdatedness::MajorDiff => "major version behind",
            Outdatedness::CurrentNewer => "newer than latest",
        };
        f.write_str(label)
    }
}

impl PartialEq for GradleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GradleVersion {}

impl Hash for GradleVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for GradleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GradleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for GradleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(revision) = self.revision {
            write!(f, ".{}", revision)?;
        }
        Ok(())
    }
}

impl FromStr for GradleVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GradleVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GradleVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> GradleVersion {
        GradleVersion::parse(text).unwrap()
    }

    #[test]
    fn test_parse_two_and_three_components() {
        let two = v("1.2");
        assert_eq!((two.major(), two.minor(), two.revision()), (1, 2, None));

        let three = v("8.10.2");
        assert_eq!((three.major(), three.minor(), three.revision()), (8, 10, Some(2)));
    }

    #[test]
    fn test_parse_failures() {
        for input in ["1", "1.a", "v1.2", "", "1.2.3.4", "1.2-rc-1", " 1.2", "1..2"] {
            assert_eq!(
                GradleVersion::parse(input),
                Err(VersionError::invalid_format(input)),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_overflow_is_invalid_format() {
        assert!(GradleVersion::parse("99999999999.0").is_err());
    }

    #[test]
    fn test_render_preserves_parsed_form() {
        assert_eq!(v("1.2").to_string(), "1.2");
        assert_eq!(v("1.2.0").to_string(), "1.2.0");
        assert_eq!(GradleVersion::new(7, 6, 1).to_string(), "7.6.1");
        assert_eq!(GradleVersion::without_revision(8, 5).to_string(), "8.5");
    }

    #[test]
    fn test_missing_revision_equals_zero() {
        assert_eq!(v("1.2"), v("1.2.0"));
        assert_eq!(v("1.2").cmp(&v("1.2.0")), Ordering::Equal);
        assert_eq!(compare_outdatedness(&v("1.2"), &v("1.2.0")), Outdatedness::Equal);
    }

    #[test]
    fn test_total_order() {
        let mut versions = vec![v("8.0"), v("7.6.1"), v("8.0.2"), v("7.10"), v("7.6")];
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, vec!["7.6", "7.6.1", "7.10", "8.0", "8.0.2"]);

        let (a, b, c) = (v("6.9"), v("7.0"), v("7.0.1"));
        assert!(a < b && b < c && a < c);
    }

    #[test]
    fn test_outdatedness_directional() {
        assert_eq!(
            compare_outdatedness(&GradleVersion::new(1, 0, 0), &GradleVersion::new(2, 0, 0)),
            Outdatedness::MajorDiff
        );
        assert_eq!(
            compare_outdatedness(&GradleVersion::new(2, 0, 0), &GradleVersion::new(1, 0, 0)),
            Outdatedness::CurrentNewer
        );
    }

    #[test]
    fn test_outdatedness_tags() {
        assert_eq!(compare_outdatedness(&v("8.1"), &v("8.5")), Outdatedness::MinorDiff);
        assert_eq!(compare_outdatedness(&v("8.5"), &v("8.5.1")), Outdatedness::RevisionDiff);
        assert_eq!(compare_outdatedness(&v("8.5.2"), &v("8.5.1")), Outdatedness::CurrentNewer);
        assert_eq!(compare_outdatedness(&v("8.6"), &v("8.5.3")), Outdatedness::CurrentNewer);
        assert_eq!(compare_outdatedness(&v("7.9.9"), &v("8.0")), Outdatedness::MajorDiff);
        assert_eq!(compare_outdatedness(&v("8.5"), &v("8.5")), Outdatedness::Equal);
    }

    #[test]
    fn test_is_outdated() {
        assert!(Outdatedness::MajorDiff.is_outdated());
        assert!(Outdatedness::RevisionDiff.is_outdated());
        assert!(!Outdatedness::Equal.is_outdated());
        assert!(!Outdatedness::CurrentNewer.is_outdated());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let json = serde_json::to_string(&v("8.5")).unwrap();
        assert_eq!(json, "\"8.5\"");
        let back: GradleVersion = serde_json::from_str("\"8.10.2\"").unwrap();
        assert_eq!(back.to_string(), "8.10.2");
        assert!(serde_json::from_str::<GradleVersion>("\"8\"").is_err());
    }
}
