//! Declarations written in another format than the preferred one

use crate::domain::CallOccurrence;
use crate::format::{classify, DeclarationFormat};
use crate::inspection::{Diagnostic, InspectionKind, ProblemLevel, QuickFix};
use crate::parser::ScriptScan;
use crate::rewrite::TextEdit;

pub(super) fn inspect(scan: &ScriptScan, preferred: DeclarationFormat) -> Vec<Diagnostic> {
    scan.dependency_calls()
        .filter_map(|call| inspect_call(call, preferred))
        .collect()
}

fn inspect_call(call: &CallOccurrence, preferred: DeclarationFormat) -> Option<Diagnostic> {
    let format = classify(call)?;
    if format == preferred {
        return None;
    }

    let recognizer = format.recognizer();
    let rewritten = recognizer
        .is_convertible(call)
        .then(|| recognizer.extract(call).ok())
        .flatten()
        .and_then(|declaration| preferred.recognizer().generate(&declaration).ok());

    let diagnostic = match rewritten {
        Some(arguments) => Diagnostic::new(
            InspectionKind::InconsistentFormat,
            ProblemLevel::Warning,
            format!("Dependency is declared in {} format, preferred is {}", format, preferred),
            call.range.clone(),
        )
        .with_fix(QuickFix::rewrite(
            format!("Convert to {} format", preferred),
            vec![TextEdit::new(call.arguments_range.clone(), arguments)],
        )),
        None => {
            let diagnostic = Diagnostic::new(
                InspectionKind::InconsistentFormat,
                ProblemLevel::Warning,
                format!(
                    "Dependency is declared in {} format and cannot be converted to {}",
                    format, preferred
                ),
                call.range.clone(),
            );
            if format.is_generatable() {
                diagnostic.with_fix(QuickFix::SetPreferredFormat { format })
            } else {
                diagnostic
            }
        }
    };
    Some(diagnostic)
}
