//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Gradle version strings that do not follow `major.minor[.revision]`
//! - FormatError: Misuse of a declaration format (extract/generate)
//! - RegistryError: Issues with the Gradle release feed
//! - NotYetAvailable: Latest version read before the first successful refresh
//! - RewriteError: Invalid batch of text edits
//! - ScriptError: Build script and wrapper properties file operations
//! - SettingsError: Persisted settings

use std::path::PathBuf;
use thiserror::Error;

use crate::format::DeclarationFormat;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Version parsing errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Declaration format errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Release feed errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Latest version not fetched yet
    #[error(transparent)]
    NotYetAvailable(#[from] NotYetAvailable),

    /// Text edit errors
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// Script file errors
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Settings errors
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors raised while parsing a Gradle version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Text does not match `major.minor[.revision]`
    #[error("invalid Gradle version '{input}': expected 'major.minor' or 'major.minor.revision'")]
    InvalidFormat { input: String },
}

/// Errors raised by declaration format recognizers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Extraction attempted on an occurrence that cannot be decomposed
    #[error("{format} declaration cannot be converted without losing information")]
    NotConvertible { format: DeclarationFormat },

    /// Generation attempted in a detect-only format
    #[error("{format} declarations cannot be generated")]
    UnsupportedOperation { format: DeclarationFormat },
}

/// Errors related to the Gradle release feed
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Network request failed
    #[error("failed to fetch {feed}: {message}")]
    NetworkError { feed: String, message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {feed}")]
    RateLimitExceeded { feed: String },

    /// Feed answered with something that is not a release list
    #[error("invalid response from {feed}: {message}")]
    InvalidResponse { feed: String, message: String },

    /// Feed URL answered 404
    #[error("release feed not found at {feed}")]
    NotFound { feed: String },

    /// Timeout
    #[error("timeout while fetching {feed}")]
    Timeout { feed: String },

    /// Every entry of the feed was a nightly, snapshot, release candidate or unparsable
    #[error("no stable Gradle release found in {feed}")]
    NoStableReleaseFound { feed: String },
}

/// The latest Gradle version has not been fetched yet
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("latest Gradle version is not available yet")]
pub struct NotYetAvailable;

/// Errors raised when a batch of edits violates the rewriter preconditions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// Edits not sorted by start offset
    #[error("edit #{index} starts at {start}, before the previous edit at {previous}")]
    Unsorted {
        index: usize,
        start: usize,
        previous: usize,
    },

    /// Two edits cover the same text
    #[error("edit #{index} at {start} overlaps the previous edit ending at {previous_end}")]
    Overlapping {
        index: usize,
        start: usize,
        previous_end: usize,
    },

    /// Range outside of the buffer
    #[error("edit range {start}..{end} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// Range splits a multi-byte character
    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Errors related to build script and wrapper file operations
#[derive(Error, Debug)]
pub enum ScriptError {
    /// File not found
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Properties file lacks the expected key
    #[error("property '{key}' not found in {path}")]
    PropertyNotFound { path: PathBuf, key: String },

    /// distributionUrl does not name a Gradle distribution
    #[error("cannot find a Gradle version in distributionUrl '{value}'")]
    InvalidDistributionUrl { value: String },

    /// Offset outside of the target script
    #[error("offset {offset} is outside of {path} ({len} bytes)")]
    InvalidOffset {
        path: PathBuf,
        offset: usize,
        len: usize,
    },
}

/// Errors related to persisted settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("failed to read settings {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write settings file
    #[error("failed to write settings {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// TOML serialization error
    #[error("failed to serialize settings: {message}")]
    SerializeError { message: String },

    /// Detect-only format chosen as the preferred one
    #[error("{format} cannot be used as the preferred dependency format")]
    ReadOnlyFormat { format: DeclarationFormat },

    /// Unknown format name
    #[error("unknown dependency format '{value}': expected 'notation', 'positional' or 'named'")]
    UnknownFormat { value: String },

    /// Unknown settings key
    #[error("unknown settings key '{key}'")]
    UnknownKey { key: String },

    /// Value not valid for the key
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },

    /// Platform has no configuration directory
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

impl VersionError {
    /// Creates a new InvalidFormat error
    pub fn invalid_format(input: impl Into<String>) -> Self {
        VersionError::InvalidFormat {
            input: input.into(),
        }
    }
}

impl FormatError {
    /// Creates a new NotConvertible error
    pub fn not_convertible(format: DeclarationFormat) -> Self {
        FormatError::NotConvertible { format }
    }

    /// Creates a new UnsupportedOperation error
    pub fn unsupported(format: DeclarationFormat) -> Self {
        FormatError::UnsupportedOperation { format }
    }
}

impl RegistryError {
    /// Creates a new NetworkError
    pub fn network_error(feed: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::NetworkError {
            feed: feed.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(feed: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidResponse {
            feed: feed.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(feed: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded { feed: feed.into() }
    }

    /// Creates a new Timeout error
    pub fn timeout(feed: impl Into<String>) -> Self {
        RegistryError::Timeout { feed: feed.into() }
    }

    /// Creates a new NoStableReleaseFound error
    pub fn no_stable_release(feed: impl Into<String>) -> Self {
        RegistryError::NoStableReleaseFound { feed: feed.into() }
    }
}

impl ScriptError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ScriptError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new PropertyNotFound error
    pub fn property_not_found(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        ScriptError::PropertyNotFound {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Creates a new InvalidDistributionUrl error
    pub fn invalid_distribution_url(value: impl Into<String>) -> Self {
        ScriptError::InvalidDistributionUrl {
            value: value.into(),
        }
    }
}

impl SettingsError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SettingsError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_invalid_format() {
        let err = VersionError::invalid_format("v1.2");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid Gradle version"));
        assert!(msg.contains("v1.2"));
    }

    #[test]
    fn test_format_error_messages() {
        let err = FormatError::not_convertible(DeclarationFormat::Notation);
        assert!(format!("{}", err).contains("cannot be converted"));

        let err = FormatError::unsupported(DeclarationFormat::SemiNamed);
        let msg = format!("{}", err);
        assert!(msg.contains("cannot be generated"));
        assert!(msg.contains("semi-named"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("services.gradle.org", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_no_stable_release() {
        let err = RegistryError::no_stable_release("services.gradle.org");
        assert!(format!("{}", err).contains("no stable Gradle release"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("services.gradle.org");
        assert!(format!("{}", err).contains("timeout"));
    }

    #[test]
    fn test_not_yet_available() {
        assert!(format!("{}", NotYetAvailable).contains("not available yet"));
    }

    #[test]
    fn test_rewrite_error_overlapping() {
        let err = RewriteError::Overlapping {
            index: 1,
            start: 3,
            previous_end: 5,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("overlaps"));
        assert!(msg.contains("edit #1"));
    }

    #[test]
    fn test_script_error_property_not_found() {
        let err = ScriptError::property_not_found("gradle-wrapper.properties", "distributionUrl");
        let msg = format!("{}", err);
        assert!(msg.contains("distributionUrl"));
        assert!(msg.contains("gradle-wrapper.properties"));
    }

    #[test]
    fn test_settings_error_read_only_format() {
        let err = SettingsError::ReadOnlyFormat {
            format: DeclarationFormat::SemiNamed,
        };
        assert!(format!("{}", err).contains("preferred dependency format"));
    }

    #[test]
    fn test_settings_error_parse() {
        let err = SettingsError::parse_error("/tmp/settings.toml", "expected a boolean");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse TOML"));
        assert!(msg.contains("expected a boolean"));
    }

    #[test]
    fn test_app_error_from_version_error() {
        let app_err: AppError = VersionError::invalid_format("1").into();
        assert!(format!("{}", app_err).contains("invalid Gradle version"));
    }

    #[test]
    fn test_app_error_from_script_error() {
        let app_err: AppError = ScriptError::not_found("/missing/build.gradle.kts").into();
        assert!(format!("{}", app_err).contains("file not found"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ScriptError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
