//! Positional format: `implementation("group", "artifact", "version")`

use crate::domain::{CallOccurrence, DependencyDeclaration};
use crate::error::FormatError;
use crate::format::{DeclarationFormat, FormatRecognizer};

/// Recognizer for unlabelled multi-argument declarations
pub struct PositionalFormat;

impl FormatRecognizer for PositionalFormat {
    fn format(&self) -> DeclarationFormat {
        DeclarationFormat::Positional
    }

    fn matches(&self, call: &CallOccurrence) -> bool {
        call.arguments.len() >= 2 && call.named_count() == 0
    }

    /// Configuration, classifier and extension arguments have no place in the model
    fn is_convertible(&self, call: &CallOccurrence) -> bool {
        self.matches(call) && call.arguments.len() <= 3
    }

    fn extract(&self, call: &CallOccurrence) -> Result<DependencyDeclaration, FormatError> {
        if !self.is_convertible(call) {
            return Err(FormatError::not_convertible(self.format()));
        }
        let mut values = call.arguments.iter().map(|a| a.value.clone());
        match (values.next(), values.next(), values.next()) {
            (Some(group), Some(artifact), version) => {
                Ok(DependencyDeclaration::new(group, artifact, version))
            }
            _ => Err(FormatError::not_convertible(self.format())),
        }
    }

    fn generate(&self, declaration: &DependencyDeclaration) -> Result<String, FormatError> {
        let mut arguments = vec![declaration.group.to_kotlin(), declaration.artifact.to_kotlin()];
        if let Some(version) = &declaration.version {
            arguments.push(version.to_kotlin());
        }
        Ok(format!("({})", arguments.join(", ")))
    }
}
