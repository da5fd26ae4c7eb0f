//! Syntax-independent dependency declaration

use crate::domain::Expression;
use serde::Serialize;
use std::fmt;

/// A library dependency: group, artifact and an optional version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDeclaration {
    pub group: Expression,
    pub artifact: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Expression>,
}

impl DependencyDeclaration {
    pub fn new(group: Expression, artifact: Expression, version: Option<Expression>) -> Self {
        Self {
            group,
            artifact,
            version,
        }
    }

    /// Declaration made of plain literals
    pub fn from_strings(group: &str, artifact: &str, version: Option<&str>) -> Self {
        Self::new(
            Expression::literal(group),
            Expression::literal(artifact),
            version.map(Expression::literal),
        )
    }

    /// Whether every component is a plain literal
    pub fn is_literal(&self) -> bool {
        self.group.is_literal()
            && self.artifact.is_literal()
            && self.version.as_ref().is_none_or(Expression::is_literal)
    }

    /// Returns a copy without the version
    pub fn without_version(&self) -> Self {
        Self {
            version: None,
            ..self.clone()
        }
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.group.display_text(),
            self.artifact.display_text()
        )?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version.display_text())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_strings() {
        let dep = DependencyDeclaration::from_strings("org.slf4j", "slf4j-api", Some("2.0.9"));
        assert_eq!(dep.group, Expression::literal("org.slf4j"));
        assert_eq!(dep.version, Some(Expression::literal("2.0.9")));
        assert!(dep.is_literal());
        assert_eq!(dep.to_string(), "org.slf4j:slf4j-api:2.0.9");
    }

    #[test]
    fn test_is_literal_with_template_version() {
        let dep = DependencyDeclaration::new(
            Expression::literal("io.ktor"),
            Expression::literal("ktor-server-core"),
            Some(Expression::Template("$ktorVersion".to_string())),
        );
        assert!(!dep.is_literal());
        assert_eq!(dep.to_string(), "io.ktor:ktor-server-core:$ktorVersion");
    }

    #[test]
    fn test_without_version() {
        let dep = DependencyDeclaration::from_strings("g", "a", Some("1"));
        assert_eq!(dep.without_version().to_string(), "g:a");
    }
}
