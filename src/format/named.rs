//! Named format: `implementation(group = "g", name = "a", version = "v")`

use crate::domain::{CallOccurrence, DependencyDeclaration};
use crate::error::FormatError;
use crate::format::{DeclarationFormat, FormatRecognizer, COORDINATE_PARAMETERS};

/// Recognizer for fully labelled declarations
pub struct NamedFormat;

impl FormatRecognizer for NamedFormat {
    fn format(&self) -> DeclarationFormat {
        DeclarationFormat::Named
    }

    fn matches(&self, call: &CallOccurrence) -> bool {
        !call.arguments.is_empty() && call.unnamed_count() == 0
    }

    fn is_convertible(&self, call: &CallOccurrence) -> bool {
        if !self.matches(call) {
            return false;
        }
        let labels: Vec<&str> = call
            .arguments
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect();
        let once = |label: &str| labels.iter().filter(|l| **l == label).count() == 1;

        labels.iter().all(|l| COORDINATE_PARAMETERS.contains(l))
            && once("group")
            && once("name")
            && labels.iter().filter(|l| **l == "version").count() <= 1
    }

    fn extract(&self, call: &CallOccurrence) -> Result<DependencyDeclaration, FormatError> {
        if !self.is_convertible(call) {
            return Err(FormatError::not_convertible(self.format()));
        }
        match (call.named_argument("group"), call.named_argument("name")) {
            (Some(group), Some(artifact)) => Ok(DependencyDeclaration::new(
                group.clone(),
                artifact.clone(),
                call.named_argument("version").cloned(),
            )),
            _ => Err(FormatError::not_convertible(self.format())),
        }
    }

    fn generate(&self, declaration: &DependencyDeclaration) -> Result<String, FormatError> {
        let mut arguments = vec![
            format!("group = {}", declaration.group.to_kotlin()),
            format!("name = {}", declaration.artifact.to_kotlin()),
        ];
        if let Some(version) = &declaration.version {
            arguments.push(format!("version = {}", version.to_kotlin()));
        }
        Ok(format!("({})", arguments.join(", ")))
    }
}
