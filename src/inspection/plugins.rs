//! Plugin requests using `id(...)` where an accessor exists

use crate::domain::{built_in_name, kotlin_module};
use crate::inspection::{Diagnostic, InspectionKind, ProblemLevel, QuickFix};
use crate::parser::{PluginEntry, PluginRequestKind, ScriptScan};
use crate::rewrite::TextEdit;

pub(super) fn inspect(scan: &ScriptScan) -> Vec<Diagnostic> {
    scan.plugins
        .iter()
        .filter(|entry| entry.kind == PluginRequestKind::Id)
        .filter_map(|entry| built_in(entry).or_else(|| kotlin(entry)))
        .collect()
}

fn built_in(entry: &PluginEntry) -> Option<Diagnostic> {
    let name = built_in_name(&entry.id)?;
    let replacement = entry.declaration().render();
    Some(
        Diagnostic::new(
            InspectionKind::BuiltInPluginWithId,
            ProblemLevel::WeakWarning,
            format!("Built-in plugin '{}' can be applied without id()", name),
            entry.request_range.clone(),
        )
        .with_fix(QuickFix::rewrite(
            format!("Replace with {}", replacement),
            vec![TextEdit::new(entry.request_range.clone(), replacement)],
        )),
    )
}

fn kotlin(entry: &PluginEntry) -> Option<Diagnostic> {
    let module = kotlin_module(&entry.id)?;
    let replacement = format!("kotlin(\"{}\")", module);
    Some(
        Diagnostic::new(
            InspectionKind::KotlinPluginWithId,
            ProblemLevel::WeakWarning,
            format!("Kotlin plugin can be applied with {}", replacement),
            entry.call_range.clone(),
        )
        .with_fix(QuickFix::rewrite(
            format!("Replace with {}", replacement),
            vec![TextEdit::new(entry.call_range.clone(), replacement)],
        )),
    )
}
