//! Kotlin dependency inspections
//!
//! - Coordinates of `org.jetbrains.kotlin` modules that `kotlin("<module>")` expresses
//! - Explicit stdlib dependencies, added by the Kotlin plugin since 1.4
//! - Versions in `kotlin("<module>", "<version>")` repeating the plugin version

use crate::domain::{CallOccurrence, DependencyDeclaration, Expression};
use crate::format::classify;
use crate::inspection::{statement_line, Diagnostic, InspectionKind, ProblemLevel, QuickFix};
use crate::parser::{parse_call_in, ScriptScan};
use crate::rewrite::TextEdit;
use semver::{Version, VersionReq};
use std::sync::LazyLock;

const KOTLIN_GROUP: &str = "org.jetbrains.kotlin";
const ARTIFACT_PREFIX: &str = "kotlin-";
const STDLIB: &str = "stdlib";

/// Plugin versions applying the stdlib dependency themselves
static IMPLICIT_STDLIB: LazyLock<VersionReq> =
    LazyLock::new(|| VersionReq::parse(">=1.4").unwrap());

pub(super) fn inspect(source: &str, scan: &ScriptScan) -> Vec<Diagnostic> {
    let plugin_version = scan.kotlin_plugin_version();
    let mut diagnostics = Vec::new();

    for call in scan.dependency_calls() {
        let declaration = convertible_declaration(call);

        if plugin_version.is_some_and(adds_stdlib)
            && depends_on_stdlib(source, call, declaration.as_ref())
        {
            diagnostics.push(
                Diagnostic::new(
                    InspectionKind::StdlibDependency,
                    ProblemLevel::Warning,
                    "The Kotlin plugin adds the stdlib dependency itself",
                    call.range.clone(),
                )
                .with_fix(QuickFix::rewrite(
                    "Remove stdlib dependency",
                    vec![TextEdit::delete(statement_line(source, call.range.clone()))],
                )),
            );
        }

        if let Some(declaration) = &declaration {
            if let Some(diagnostic) = coordinates(call, declaration, plugin_version) {
                diagnostics.push(diagnostic);
            }
        }

        if let Some(version) = plugin_version {
            if let Some(diagnostic) = redundant_version(source, call, version) {
                diagnostics.push(diagnostic);
            }
        }
    }
    diagnostics
}

fn convertible_declaration(call: &CallOccurrence) -> Option<DependencyDeclaration> {
    let recognizer = classify(call)?.recognizer();
    if !recognizer.is_convertible(call) {
        return None;
    }
    recognizer.extract(call).ok()
}

/// Kotlin module named by `kotlin-<module>` coordinates
fn coordinate_module(declaration: &DependencyDeclaration) -> Option<&str> {
    if declaration.group.literal_value()? != KOTLIN_GROUP {
        return None;
    }
    declaration
        .artifact
        .literal_value()?
        .strip_prefix(ARTIFACT_PREFIX)
        .filter(|module| !module.is_empty())
}

fn coordinates(
    call: &CallOccurrence,
    declaration: &DependencyDeclaration,
    plugin_version: Option<&str>,
) -> Option<Diagnostic> {
    let module = coordinate_module(declaration)?;
    let version = declaration
        .version
        .as_ref()
        .filter(|version| version.literal_value().is_none_or(|v| Some(v) != plugin_version));

    let notation = match version {
        Some(version) => format!("(kotlin(\"{}\", {}))", module, version.to_kotlin()),
        None => format!("(kotlin(\"{}\"))", module),
    };

    Some(
        Diagnostic::new(
            InspectionKind::KotlinCoordinates,
            ProblemLevel::Warning,
            format!("Dependency can be declared as kotlin(\"{}\")", module),
            call.range.clone(),
        )
        .with_fix(QuickFix::rewrite(
            "Replace with kotlin() notation",
            vec![TextEdit::new(call.arguments_range.clone(), notation)],
        )),
    )
}

/// The `kotlin("<module>", ...)` call passed as the first argument of `call`
fn kotlin_notation(source: &str, call: &CallOccurrence) -> Option<CallOccurrence> {
    let argument = call.arguments.first().filter(|a| !a.is_named())?;
    if !matches!(argument.value, Expression::Reference(_)) {
        return None;
    }
    parse_call_in(source, argument.range.clone()).filter(|inner| inner.callee == "kotlin")
}

fn depends_on_stdlib(
    source: &str,
    call: &CallOccurrence,
    declaration: Option<&DependencyDeclaration>,
) -> bool {
    if let Some(declaration) = declaration {
        return declaration
            .artifact
            .literal_value()
            .is_some_and(|artifact| artifact.starts_with("kotlin-stdlib"));
    }
    kotlin_notation(source, call)
        .and_then(|inner| inner.arguments.first().cloned())
        .is_some_and(|module| {
            module
                .value
                .literal_value()
                .is_some_and(|m| m.starts_with(STDLIB))
        })
}

fn redundant_version(source: &str, call: &CallOccurrence, plugin_version: &str) -> Option<Diagnostic> {
    let inner = kotlin_notation(source, call)?;
    let [module, version] = inner.arguments.as_slice() else {
        return None;
    };
    if version.value.literal_value() != Some(plugin_version) {
        return None;
    }

    Some(
        Diagnostic::new(
            InspectionKind::RedundantKotlinVersion,
            ProblemLevel::WeakWarning,
            "Version is the same as the Kotlin plugin version",
            version.range.clone(),
        )
        .with_fix(QuickFix::rewrite(
            "Remove redundant version",
            vec![TextEdit::delete(module.range.end..version.range.end)],
        )),
    )
}

/// Whether Kotlin plugin `version` adds the stdlib dependency
fn adds_stdlib(version: &str) -> bool {
    parse_plugin_version(version).is_some_and(|v| IMPLICIT_STDLIB.matches(&v))
}

/// Release part of a plugin version, `1.9.20-Beta` read as 1.9.20 and `1.4`
/// as 1.4.0
fn parse_plugin_version(text: &str) -> Option<Version> {
    let core = text.split(['-', '+']).next()?;
    let mut parts: Vec<&str> = core.split('.').take(3).collect();
    while parts.len() < 3 {
        parts.push("0");
    }
    Version::parse(&parts.join(".")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan;
    use crate::rewrite::apply_all;

    fn script(plugin_version: &str, dependencies: &str) -> String {
        format!(
            "plugins {{\n    kotlin(\"jvm\") version \"{}\"\n}}\n\ndependencies {{\n{}}}\n",
            plugin_version, dependencies
        )
    }

    fn run(source: &str) -> Vec<Diagnostic> {
        inspect(source, &scan(source))
    }

    fn fix_of(source: &str, diagnostic: &Diagnostic) -> String {
        match &diagnostic.fix {
            Some(QuickFix::Rewrite { edits, .. }) => apply_all(source, edits).unwrap(),
            other => panic!("unexpected fix {:?}", other),
        }
    }

    #[test]
    fn test_parse_plugin_version() {
        assert_eq!(parse_plugin_version("1.9.22"), Some(Version::new(1, 9, 22)));
        assert_eq!(parse_plugin_version("1.4"), Some(Version::new(1, 4, 0)));
        assert_eq!(parse_plugin_version("2.0.0-Beta1"), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_plugin_version("latest"), None);
        assert_eq!(parse_plugin_version(""), None);
        assert!(adds_stdlib("1.4.0"));
        assert!(!adds_stdlib("1.3.72"));
    }

    #[test]
    fn test_pre_release_plugin_adds_stdlib() {
        assert!(adds_stdlib("1.4.0-RC"));
        assert!(adds_stdlib("1.4-M1"));
        assert!(adds_stdlib("1.9"));
        assert!(adds_stdlib("2.0.0+dev-123"));
        assert!(!adds_stdlib("1.3.70-eap-42"));
    }

    #[test]
    fn test_coordinates_drop_plugin_version() {
        let source = script(
            "1.9.22",
            "    implementation(\"org.jetbrains.kotlin:kotlin-reflect:1.9.22\")\n",
        );
        let diagnostics = run(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, InspectionKind::KotlinCoordinates);
        assert!(fix_of(&source, &diagnostics[0]).contains("    implementation(kotlin(\"reflect\"))\n"));
    }

    #[test]
    fn test_coordinates_keep_other_version() {
        let source = script(
            "1.9.22",
            "    implementation(group = \"org.jetbrains.kotlin\", name = \"kotlin-reflect\", version = \"1.8.0\")\n",
        );
        let diagnostics = run(&source);
        assert_eq!(diagnostics.len(), 1);
        assert!(fix_of(&source, &diagnostics[0])
            .contains("    implementation(kotlin(\"reflect\", \"1.8.0\"))\n"));
    }

    #[test]
    fn test_coordinates_other_group() {
        let source = script("1.9.22", "    implementation(\"org.example:kotlin-utils:1.0\")\n");
        assert!(run(&source).is_empty());
    }

    #[test]
    fn test_stdlib_dependency() {
        let source = script(
            "1.9.22",
            "    implementation(kotlin(\"stdlib-jdk8\"))\n    api(\"a:b:1\")\n",
        );
        let diagnostics = run(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, InspectionKind::StdlibDependency);

        let fixed = fix_of(&source, &diagnostics[0]);
        assert!(!fixed.contains("stdlib"));
        assert!(fixed.contains("dependencies {\n    api(\"a:b:1\")\n}"));
    }

    #[test]
    fn test_stdlib_before_1_4() {
        let source = script("1.3.72", "    implementation(kotlin(\"stdlib\"))\n");
        assert!(run(&source).is_empty());
    }

    #[test]
    fn test_stdlib_by_coordinates() {
        let source = script(
            "1.4.32",
            "    implementation(\"org.jetbrains.kotlin:kotlin-stdlib:1.4.32\")\n",
        );
        let kinds: Vec<InspectionKind> = run(&source).iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![InspectionKind::StdlibDependency, InspectionKind::KotlinCoordinates]
        );
    }

    #[test]
    fn test_redundant_version() {
        let source = script("1.9.22", "    implementation(kotlin(\"reflect\", \"1.9.22\"))\n");
        let diagnostics = run(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, InspectionKind::RedundantKotlinVersion);
        assert_eq!(&source[diagnostics[0].range.clone()], "\"1.9.22\"");
        assert!(fix_of(&source, &diagnostics[0]).contains("    implementation(kotlin(\"reflect\"))\n"));
    }

    #[test]
    fn test_other_version_is_kept() {
        let source = script("1.9.22", "    implementation(kotlin(\"reflect\", \"1.8.0\"))\n");
        assert!(run(&source).is_empty());
    }

    #[test]
    fn test_without_kotlin_plugin() {
        let source = "dependencies {\n    implementation(kotlin(\"stdlib\"))\n    implementation(kotlin(\"reflect\", \"1.9.22\"))\n}\n";
        assert!(run(source).is_empty());
    }
}
