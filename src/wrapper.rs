//! Gradle wrapper properties
//!
//! Reads `gradle/wrapper/gradle-wrapper.properties`, extracts the Gradle
//! version from `distributionUrl` and produces the edit upgrading it.
//!
//! A distribution URL ends in a file name such as `gradle-8.5-bin.zip`; the
//! version is the text between `gradle-` and the next `-` (or `.zip`).

use crate::domain::GradleVersion;
use crate::error::ScriptError;
use crate::rewrite::{read_script, TextEdit};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Location of the wrapper properties inside a project
pub const WRAPPER_PROPERTIES: &str = "gradle/wrapper/gradle-wrapper.properties";

/// Key holding the distribution URL
pub const DISTRIBUTION_URL_KEY: &str = "distributionUrl";

const FILE_PREFIX: &str = "gradle-";
const ARCHIVE_SUFFIX: &str = ".zip";

/// A `key=value` line of a properties file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    /// Value with escapes resolved
    pub value: String,
    /// Byte range of the raw value in the file
    pub value_range: Range<usize>,
}

/// Parsed wrapper properties of a project
#[derive(Debug, Clone)]
pub struct WrapperProperties {
    pub path: PathBuf,
    pub content: String,
    pub distribution_url: PropertyEntry,
    pub version: GradleVersion,
}

impl WrapperProperties {
    /// Path of the wrapper properties of `project_dir`
    pub fn locate(project_dir: &Path) -> PathBuf {
        project_dir.join(WRAPPER_PROPERTIES)
    }

    /// Read the wrapper properties of `project_dir`
    pub fn load(project_dir: &Path) -> Result<Self, ScriptError> {
        let path = Self::locate(project_dir);
        let content = read_script(&path)?;
        Self::parse(path, content)
    }

    /// Parse already loaded properties
    pub fn parse(path: impl Into<PathBuf>, content: String) -> Result<Self, ScriptError> {
        let path = path.into();
        let distribution_url = find_property(&content, DISTRIBUTION_URL_KEY)
            .ok_or_else(|| ScriptError::property_not_found(&path, DISTRIBUTION_URL_KEY))?;
        let version = extract_version(&distribution_url.value)?;
        Ok(Self {
            path,
            content,
            distribution_url,
            version,
        })
    }

    /// Edit replacing the version in the distribution file name with `latest`
    ///
    /// `None` when the file name already names `latest`.
    pub fn upgrade_edit(&self, latest: &GradleVersion) -> Option<TextEdit> {
        let range = &self.distribution_url.value_range;
        let raw = &self.content[range.clone()];
        let version = version_range(raw)?;
        let replacement = latest.to_string();
        if raw[version.clone()] == replacement {
            return None;
        }
        Some(TextEdit::new(
            range.start + version.start..range.start + version.end,
            replacement,
        ))
    }
}

/// Extract the Gradle version from a distribution URL
pub fn extract_version(distribution_url: &str) -> Result<GradleVersion, ScriptError> {
    let text = version_range(distribution_url)
        .map(|range| &distribution_url[range])
        .ok_or_else(|| ScriptError::invalid_distribution_url(distribution_url))?;
    GradleVersion::parse(text).map_err(|_| ScriptError::invalid_distribution_url(distribution_url))
}

/// Byte range of the version text in a distribution URL
fn version_range(url: &str) -> Option<Range<usize>> {
    let file_start = url.rfind('/').map(|i| i + 1).unwrap_or(0);
    let file_name = &url[file_start..];
    let start = file_name
        .find(FILE_PREFIX)
        .map(|i| i + FILE_PREFIX.len())
        .unwrap_or(0);
    let rest = &file_name[start..];
    let rest = rest.find(ARCHIVE_SUFFIX).map(|i| &rest[..i]).unwrap_or(rest);
    let end = start + rest.find('-').unwrap_or(rest.len());
    if end == start {
        return None;
    }
    Some(file_start + start..file_start + end)
}

/// Find `key` in properties `content`
///
/// Handles `=`, `:` and whitespace separators, comment lines and backslash
/// escapes. Line continuations are not supported.
pub fn find_property(content: &str, key: &str) -> Option<PropertyEntry> {
    let mut line_start = 0;
    for line in content.split_inclusive('\n') {
        let offset = line_start;
        line_start += line.len();

        let text = line.trim_end_matches(['\n', '\r']);
        let trimmed = text.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let indent = text.len() - trimmed.len();

        let key_end = key_end(trimmed);
        if unescape_property(&trimmed[..key_end]) != key {
            continue;
        }

        let after_key = &trimmed[key_end..];
        let separator = after_key.trim_start_matches([' ', '\t']);
        let separator = separator
            .strip_prefix(['=', ':'])
            .unwrap_or(separator);
        let raw = separator.trim_start_matches([' ', '\t']);
        let raw_start = offset + indent + key_end + (after_key.len() - raw.len());
        let raw = raw.trim_end();

        return Some(PropertyEntry {
            key: key.to_string(),
            value: unescape_property(raw),
            value_range: raw_start..raw_start + raw.len(),
        });
    }
    None
}

/// Length of the key at the start of a properties line
fn key_end(line: &str) -> usize {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' => return i,
            _ => {}
        }
    }
    line.len()
}

fn unescape_property(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
