//! Configurations removed in Gradle 7

use crate::inspection::{Diagnostic, InspectionKind, ProblemLevel, QuickFix};
use crate::parser::ScriptScan;
use crate::rewrite::TextEdit;

/// Deprecated configuration and its replacement
const DEPRECATED_CONFIGURATIONS: &[(&str, &str)] = &[
    ("compile", "implementation"),
    ("testCompile", "testImplementation"),
    ("runtime", "runtimeOnly"),
    ("testRuntime", "testRuntimeOnly"),
];

/// Replacement of a deprecated configuration
pub fn replacement(configuration: &str) -> Option<&'static str> {
    DEPRECATED_CONFIGURATIONS
        .iter()
        .find(|(deprecated, _)| *deprecated == configuration)
        .map(|(_, replacement)| *replacement)
}

pub(super) fn inspect(scan: &ScriptScan) -> Vec<Diagnostic> {
    scan.dependency_calls()
        .filter_map(|call| {
            let replacement = replacement(&call.callee)?;
            Some(
                Diagnostic::new(
                    InspectionKind::DeprecatedConfiguration,
                    ProblemLevel::Warning,
                    format!(
                        "'{}' configuration is deprecated, use '{}'",
                        call.callee, replacement
                    ),
                    call.callee_range.clone(),
                )
                .with_fix(QuickFix::rewrite(
                    format!("Replace with '{}'", replacement),
                    vec![TextEdit::new(call.callee_range.clone(), replacement)],
                )),
            )
        })
        .collect()
}
