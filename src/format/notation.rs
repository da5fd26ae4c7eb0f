//! Notation format: `implementation("group:artifact:version")`

use crate::domain::{
    unescape, CallOccurrence, DependencyDeclaration, Expression, TemplateSegment,
};
use crate::error::FormatError;
use crate::format::{DeclarationFormat, FormatRecognizer};

/// Recognizer for single-string dependency notations
pub struct NotationFormat;

impl NotationFormat {
    /// Split the notation string, `None` when it cannot be decomposed
    fn decompose(call: &CallOccurrence) -> Option<DependencyDeclaration> {
        let argument = call.arguments.first()?;
        match &argument.value {
            Expression::Literal(value) => decompose_literal(value),
            Expression::Template(_) => decompose_template(&argument.value.segments()),
            Expression::Reference(_) => None,
        }
    }
}

/// `group:artifact[:version]` with non-empty parts
fn decompose_literal(value: &str) -> Option<DependencyDeclaration> {
    let parts: Vec<&str> = value.split(':').collect();
    if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(DependencyDeclaration::from_strings(
        parts[0],
        parts[1],
        parts.get(2).copied(),
    ))
}

/// `group:artifact:<text>$interpolation<text>` with exactly one interpolation
fn decompose_template(segments: &[TemplateSegment]) -> Option<DependencyDeclaration> {
    let position = segments
        .iter()
        .position(|s| matches!(s, TemplateSegment::Interpolation(_)))?;
    let (before, rest) = segments.split_at(position);
    let (interpolation, after) = rest.split_first()?;

    if after
        .iter()
        .any(|s| matches!(s, TemplateSegment::Interpolation(_)))
    {
        return None;
    }

    let prefix = raw_text(before);
    let suffix = raw_text(after);
    let TemplateSegment::Interpolation(interpolated) = interpolation else {
        return None;
    };
    if interpolated.contains(':') || suffix.contains(':') {
        return None;
    }

    let parts: Vec<&str> = prefix.split(':').collect();
    if parts.len() != 3 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }

    let version = Expression::from_segments(&[
        TemplateSegment::Text(parts[2].to_string()),
        interpolation.clone(),
        TemplateSegment::Text(suffix),
    ]);

    Some(DependencyDeclaration::new(
        Expression::literal(unescape(parts[0])),
        Expression::literal(unescape(parts[1])),
        Some(version),
    ))
}

fn raw_text(segments: &[TemplateSegment]) -> String {
    segments
        .iter()
        .filter_map(|s| match s {
            TemplateSegment::Text(text) => Some(text.as_str()),
            TemplateSegment::Interpolation(_) => None,
        })
        .collect()
}

impl FormatRecognizer for NotationFormat {
    fn format(&self) -> DeclarationFormat {
        DeclarationFormat::Notation
    }

    fn matches(&self, call: &CallOccurrence) -> bool {
        match call.arguments.as_slice() {
            [argument] => {
                !argument.is_named()
                    && matches!(
                        argument.value,
                        Expression::Literal(_) | Expression::Template(_)
                    )
            }
            _ => false,
        }
    }

    fn is_convertible(&self, call: &CallOccurrence) -> bool {
        self.matches(call) && Self::decompose(call).is_some()
    }

    fn extract(&self, call: &CallOccurrence) -> Result<DependencyDeclaration, FormatError> {
        if !self.matches(call) {
            return Err(FormatError::not_convertible(self.format()));
        }
        Self::decompose(call).ok_or_else(|| FormatError::not_convertible(self.format()))
    }

    fn generate(&self, declaration: &DependencyDeclaration) -> Result<String, FormatError> {
        let mut notation = format!(
            "{}:{}",
            declaration.group.to_template_fragment(),
            declaration.artifact.to_template_fragment()
        );
        if let Some(version) = &declaration.version {
            notation.push(':');
            notation.push_str(&version.to_template_fragment());
        }
        Ok(format!("(\"{}\")", notation))
    }
}
