//! Dependency declaration formats
//!
//! A Kotlin DSL dependency can be written in four shapes:
//! - Notation: `implementation("group:artifact:version")`
//! - Positional: `implementation("group", "artifact", "version")`
//! - Named: `implementation(group = "group", name = "artifact", version = "version")`
//! - SemiNamed: `implementation("group", name = "artifact")` (detect only)
//!
//! Each shape has a recognizer that tests the call shape, decides whether the
//! call can be decomposed without loss, extracts a `DependencyDeclaration`
//! and generates the argument list of that shape.

mod named;
mod notation;
mod positional;
mod semi_named;

pub use named::NamedFormat;
pub use notation::NotationFormat;
pub use positional::PositionalFormat;
pub use semi_named::SemiNamedFormat;

use crate::domain::{CallOccurrence, DependencyDeclaration};
use crate::error::{FormatError, SettingsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Parameter names of the `group, name, version` dependency overload
pub const COORDINATE_PARAMETERS: [&str; 3] = ["group", "name", "version"];

/// Syntactic shape of a dependency declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationFormat {
    /// Single `group:artifact[:version]` string
    #[default]
    Notation,
    /// Unlabelled arguments
    Positional,
    /// Every argument labelled
    Named,
    /// Some arguments labelled
    SemiNamed,
}

/// Strategy for one declaration format
pub trait FormatRecognizer: Send + Sync {
    /// The format handled by this recognizer
    fn format(&self) -> DeclarationFormat;

    /// Shape test on arity and argument labels only
    fn matches(&self, call: &CallOccurrence) -> bool;

    /// Whether group, artifact and version can be extracted without loss
    fn is_convertible(&self, call: &CallOccurrence) -> bool;

    /// Decompose the call; fails with `NotConvertible` unless `is_convertible` holds
    fn extract(&self, call: &CallOccurrence) -> Result<DependencyDeclaration, FormatError>;

    /// Argument list (parentheses included) declaring `declaration` in this format
    fn generate(&self, declaration: &DependencyDeclaration) -> Result<String, FormatError>;
}

impl DeclarationFormat {
    /// All formats in classification priority order
    pub fn all() -> &'static [DeclarationFormat] {
        &[
            DeclarationFormat::Notation,
            DeclarationFormat::Positional,
            DeclarationFormat::Named,
            DeclarationFormat::SemiNamed,
        ]
    }

    /// Formats that can be chosen as the preferred one
    pub fn selectable() -> &'static [DeclarationFormat] {
        &[
            DeclarationFormat::Notation,
            DeclarationFormat::Positional,
            DeclarationFormat::Named,
        ]
    }

    /// Returns the settings name for this format
    pub fn name(&self) -> &'static str {
        match self {
            DeclarationFormat::Notation => "notation",
            DeclarationFormat::Positional => "positional",
            DeclarationFormat::Named => "named",
            DeclarationFormat::SemiNamed => "semi-named",
        }
    }

    /// Whether declarations can be generated in this format
    pub fn is_generatable(&self) -> bool {
        !matches!(self, DeclarationFormat::SemiNamed)
    }

    /// Recognizer implementing this format
    pub fn recognizer(&self) -> Box<dyn FormatRecognizer> {
        get_recognizer(*self)
    }
}

impl fmt::Display for DeclarationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeclarationFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DeclarationFormat::all()
            .iter()
            .copied()
            .find(|format| format.name() == normalized || format.name().replace('-', "") == normalized)
            .ok_or_else(|| SettingsError::UnknownFormat {
                value: s.to_string(),
            })
    }
}

/// Get the recognizer for the specified format
pub fn get_recognizer(format: DeclarationFormat) -> Box<dyn FormatRecognizer> {
    match format {
        DeclarationFormat::Notation => Box::new(NotationFormat),
        DeclarationFormat::Positional => Box::new(PositionalFormat),
        DeclarationFormat::Named => Box::new(NamedFormat),
        DeclarationFormat::SemiNamed => Box::new(SemiNamedFormat),
    }
}

/// Determine the format of a call, `None` when it is not a dependency declaration
///
/// Formats partition the call shapes, so more than one match is a defect; it
/// is logged and resolved by priority order.
pub fn classify(call: &CallOccurrence) -> Option<DeclarationFormat> {
    let matching: Vec<DeclarationFormat> = DeclarationFormat::all()
        .iter()
        .copied()
        .filter(|format| format.recognizer().matches(call))
        .collect();

    if matching.len() > 1 {
        warn!(
            callee = %call.callee,
            formats = ?matching,
            "dependency declaration matches more than one format"
        );
    }

    matching.first().copied()
}

/// Re-generate the arguments of `call` in `target`
///
/// Returns the new argument list, or `NotConvertible` when the call is not a
/// decomposable dependency declaration.
pub fn convert(call: &CallOccurrence, target: DeclarationFormat) -> Result<String, FormatError> {
    let source = classify(call).ok_or(FormatError::NotConvertible { format: target })?;
    let declaration = source.recognizer().extract(call)?;
    target.recognizer().generate(&declaration)
}

#[cfg(test)]
pub(crate) fn parse_test_call(arguments: &str) -> CallOccurrence {
    crate::parser::kotlin::parse_call(&format!("implementation{}", arguments))
        .expect("test call should parse")
}
