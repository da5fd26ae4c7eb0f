//! SemiNamed format: `implementation("group", name = "artifact")`
//!
//! Detect only. Mixed calls are recognized and can be read, but never generated.

use crate::domain::{CallOccurrence, DependencyDeclaration, Expression};
use crate::error::FormatError;
use crate::format::{DeclarationFormat, FormatRecognizer, COORDINATE_PARAMETERS};

/// Recognizer for partially labelled declarations
pub struct SemiNamedFormat;

impl SemiNamedFormat {
    /// Bind arguments to `group, name, version`: positional ones by index, labelled ones by name
    fn bind(call: &CallOccurrence) -> Option<[Option<&Expression>; 3]> {
        let mut bound: [Option<&Expression>; 3] = [None, None, None];
        let mut seen_named = false;

        for (index, argument) in call.arguments.iter().enumerate() {
            let slot = match &argument.name {
                None if seen_named => return None,
                None => index,
                Some(name) => {
                    seen_named = true;
                    COORDINATE_PARAMETERS.iter().position(|p| p == name)?
                }
            };
            if slot >= bound.len() || bound[slot].is_some() {
                return None;
            }
            bound[slot] = Some(&argument.value);
        }

        (bound[0].is_some() && bound[1].is_some()).then_some(bound)
    }
}

impl FormatRecognizer for SemiNamedFormat {
    fn format(&self) -> DeclarationFormat {
        DeclarationFormat::SemiNamed
    }

    fn matches(&self, call: &CallOccurrence) -> bool {
        call.named_count() > 0 && call.unnamed_count() > 0
    }

    fn is_convertible(&self, call: &CallOccurrence) -> bool {
        self.matches(call) && Self::bind(call).is_some()
    }

    fn extract(&self, call: &CallOccurrence) -> Result<DependencyDeclaration, FormatError> {
        if !self.matches(call) {
            return Err(FormatError::not_convertible(self.format()));
        }
        match Self::bind(call) {
            Some([Some(group), Some(artifact), version]) => Ok(DependencyDeclaration::new(
                group.clone(),
                artifact.clone(),
                version.cloned(),
            )),
            _ => Err(FormatError::not_convertible(self.format())),
        }
    }

    fn generate(&self, _declaration: &DependencyDeclaration) -> Result<String, FormatError> {
        Err(FormatError::unsupported(self.format()))
    }
}
