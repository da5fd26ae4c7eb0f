//! Paste conversion
//!
//! Turns dependency and plugin declarations found in pasted text into Kotlin
//! DSL declarations in the preferred format. Text may come from a Groovy
//! script (`implementation 'g:a:1'`) or from another Kotlin script written in
//! a different format.
//!
//! When pasting into an existing script only the declarations that land in a
//! `dependencies {}` (or `plugins {}`) block of the resulting script are
//! rewritten.

use crate::domain::{escape, unescape};
use crate::error::{AppError, ScriptError};
use crate::format::{classify, DeclarationFormat};
use crate::parser::{self, PluginRequestKind, ScriptScan};
use crate::rewrite::{apply_all, normalize_edits, TextEdit};
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// What a conversion edit rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditKind {
    Dependency,
    Plugin,
    Quotes,
}

/// Options of a paste conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Target format of dependency declarations
    pub format: DeclarationFormat,
    /// Also turn remaining single-quoted strings into double-quoted ones
    pub convert_quotes: bool,
}

/// Result of a conversion
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// The whole buffer after conversion
    pub text: String,
    pub dependencies: usize,
    pub plugins: usize,
    pub quotes: usize,
}

impl Conversion {
    /// Total number of rewritten spans
    pub fn changes(&self) -> usize {
        self.dependencies + self.plugins + self.quotes
    }
}

/// Convert a standalone piece of text
pub fn convert_text(text: &str, options: &ConvertOptions) -> Result<Conversion, AppError> {
    let scan = parser::scan(text);
    let edits = collect_edits(text, 0..text.len(), &scan, options);
    finish(text, edits)
}

/// Paste `pasted` into `script` at `offset` and convert what lands in
/// `dependencies {}` and `plugins {}` blocks
pub fn paste_into(
    script: &str,
    offset: usize,
    pasted: &str,
    options: &ConvertOptions,
) -> Result<Conversion, AppError> {
    if offset > script.len() || !script.is_char_boundary(offset) {
        return Err(ScriptError::InvalidOffset {
            path: "<script>".into(),
            offset,
            len: script.len(),
        }
        .into());
    }

    let mut combined = String::with_capacity(script.len() + pasted.len());
    combined.push_str(&script[..offset]);
    combined.push_str(pasted);
    combined.push_str(&script[offset..]);

    let region = offset..offset + pasted.len();
    let scan = parser::scan(&combined);
    let edits = collect_edits(&combined, region, &scan, options)
        .into_iter()
        .filter(|(kind, edit)| match kind {
            EditKind::Dependency => scan.is_inside(edit.range.start, "dependencies"),
            EditKind::Plugin => scan.is_inside(edit.range.start, "plugins"),
            EditKind::Quotes => true,
        })
        .collect();
    finish(&combined, edits)
}

fn finish(buffer: &str, edits: Vec<(EditKind, TextEdit)>) -> Result<Conversion, AppError> {
    let kinds: Vec<(Range<usize>, EditKind)> = edits
        .iter()
        .map(|(kind, edit)| (edit.range.clone(), *kind))
        .collect();
    let edits = normalize_edits(buffer, edits.into_iter().map(|(_, edit)| edit).collect());

    let mut conversion = Conversion {
        text: apply_all(buffer, &edits)?,
        dependencies: 0,
        plugins: 0,
        quotes: 0,
    };
    for edit in &edits {
        let kind = kinds
            .iter()
            .find(|(range, _)| *range == edit.range)
            .map(|(_, kind)| *kind);
        match kind {
            Some(EditKind::Dependency) => conversion.dependencies += 1,
            Some(EditKind::Plugin) => conversion.plugins += 1,
            Some(EditKind::Quotes) => conversion.quotes += 1,
            None => {}
        }
    }
    Ok(conversion)
}

/// Edits converting everything in `region` of `buffer`
fn collect_edits(
    buffer: &str,
    region: Range<usize>,
    scan: &ScriptScan,
    options: &ConvertOptions,
) -> Vec<(EditKind, TextEdit)> {
    let within = |range: &Range<usize>| region.start <= range.start && range.end <= region.end;
    let mut edits = Vec::new();

    // Kotlin calls in another format
    let mut declaration_ranges: Vec<Range<usize>> = Vec::new();
    for scanned in &scan.calls {
        let call = &scanned.call;
        if !within(&call.range)
            || !parser::may_declare_dependency(&call.callee)
            || scanned.is_inside_other_than("dependencies")
        {
            continue;
        }
        let Some(source) = classify(call) else {
            continue;
        };
        declaration_ranges.push(call.range.clone());
        if source == options.format {
            continue;
        }
        match source
            .recognizer()
            .extract(call)
            .and_then(|d| options.format.recognizer().generate(&d))
        {
            Ok(arguments) => edits.push((
                EditKind::Dependency,
                TextEdit::new(call.arguments_range.clone(), arguments),
            )),
            Err(e) => debug!(callee = %call.callee, error = %e, "leaving declaration as is"),
        }
    }

    // Kotlin `id("...")` requests that have a shorter form
    let mut plugin_ranges: Vec<Range<usize>> = Vec::new();
    for entry in &scan.plugins {
        if !within(&entry.request_range) {
            continue;
        }
        plugin_ranges.push(entry.request_range.clone());
        let literal_version = entry.version.as_ref().is_none_or(|v| v.is_literal());
        if entry.kind == PluginRequestKind::Id && literal_version {
            let declaration = entry.declaration();
            edits.push((
                EditKind::Plugin,
                TextEdit::new(entry.request_range.clone(), declaration.render()),
            ));
        }
    }

    // Groovy declarations
    let text = &buffer[region.clone()];
    for found in parser::find_dependencies(text) {
        let range = shifted(&found.range, region.start);
        if overlaps_any(&range, &declaration_ranges)
            || scan.is_inside_other_than(range.start, "dependencies")
        {
            continue;
        }
        match options.format.recognizer().generate(&found.declaration) {
            Ok(arguments) => {
                declaration_ranges.push(range.clone());
                edits.push((
                    EditKind::Dependency,
                    TextEdit::new(range, format!("{}{}", found.configuration, arguments)),
                ));
            }
            Err(e) => debug!(error = %e, "cannot generate declaration"),
        }
    }
    for plugin in parser::find_plugins(text) {
        let range = shifted(&plugin.range, region.start);
        if overlaps_any(&range, &plugin_ranges) || scan.is_inside_other_than(range.start, "plugins")
        {
            continue;
        }
        plugin_ranges.push(range.clone());
        edits.push((EditKind::Plugin, TextEdit::new(range, plugin.render())));
    }

    if options.convert_quotes {
        let rewritten: Vec<Range<usize>> = edits.iter().map(|(_, e)| e.range.clone()).collect();
        for range in parser::single_quoted_literals(buffer) {
            if !within(&range) || overlaps_any(&range, &rewritten) {
                continue;
            }
            if let Some(replacement) = double_quoted(&buffer[range.clone()]) {
                edits.push((EditKind::Quotes, TextEdit::new(range, replacement)));
            }
        }
    }

    edits
}

/// `'text'` as a Kotlin string, `None` for one-character literals
fn double_quoted(literal: &str) -> Option<String> {
    let body = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    let value = unescape(body);
    if value.chars().count() == 1 {
        return None;
    }
    Some(format!("\"{}\"", escape(&value)))
}

fn shifted(range: &Range<usize>, base: usize) -> Range<usize> {
    range.start + base..range.end + base
}

fn overlaps_any(range: &Range<usize>, others: &[Range<usize>]) -> bool {
    others
        .iter()
        .any(|other| range.start < other.end && other.start < range.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(format: DeclarationFormat) -> ConvertOptions {
        ConvertOptions {
            format,
            convert_quotes: false,
        }
    }

    #[test]
    fn test_convert_groovy_dependencies() {
        let text = "dependencies {\n    implementation 'com.google.guava:guava:33.0.0-jre'\n    testImplementation group: 'junit', name: 'junit', version: '4.13.2'\n}\n";
        let conversion = convert_text(text, &options(DeclarationFormat::Notation)).unwrap();
        assert_eq!(
            conversion.text,
            "dependencies {\n    implementation(\"com.google.guava:guava:33.0.0-jre\")\n    testImplementation(\"junit:junit:4.13.2\")\n}\n"
        );
        assert_eq!(conversion.dependencies, 2);
    }

    #[test]
    fn test_convert_to_named() {
        let text = "implementation 'io.ktor:ktor-server-core:1.6.0'";
        let conversion = convert_text(text, &options(DeclarationFormat::Named)).unwrap();
        assert_eq!(
            conversion.text,
            r#"implementation(group = "io.ktor", name = "ktor-server-core", version = "1.6.0")"#
        );
    }

    #[test]
    fn test_convert_kotlin_format() {
        let text = "implementation(\"g\", \"a\", \"1.0\")\napi(\"x:y:2\")\n";
        let conversion = convert_text(text, &options(DeclarationFormat::Notation)).unwrap();
        assert_eq!(conversion.text, "implementation(\"g:a:1.0\")\napi(\"x:y:2\")\n");
        assert_eq!(conversion.dependencies, 1);
    }

    #[test]
    fn test_conforming_text_untouched() {
        let text = "dependencies {\n    implementation(\"g:a:1\")\n}\n";
        let conversion = convert_text(text, &options(DeclarationFormat::Notation)).unwrap();
        assert_eq!(conversion.text, text);
        assert_eq!(conversion.changes(), 0);
    }

    #[test]
    fn test_convert_plugins() {
        let text = "plugins {\n    id 'java-library'\n    id 'org.jetbrains.kotlin.jvm' version '1.9.22'\n    id 'com.diffplug.spotless' version '6.25.0'\n}\n";
        let conversion = convert_text(text, &ConvertOptions::default()).unwrap();
        assert_eq!(
            conversion.text,
            "plugins {\n    `java-library`\n    kotlin(\"jvm\") version \"1.9.22\"\n    id(\"com.diffplug.spotless\") version \"6.25.0\"\n}\n"
        );
        assert_eq!(conversion.plugins, 3);
    }

    #[test]
    fn test_convert_quotes() {
        let text = "implementation 'g:a:1'\ndescription = 'my library'\nval c = 'x'\n";
        let conversion = convert_text(
            text,
            &ConvertOptions {
                format: DeclarationFormat::Notation,
                convert_quotes: true,
            },
        )
        .unwrap();
        assert_eq!(
            conversion.text,
            "implementation(\"g:a:1\")\ndescription = \"my library\"\nval c = 'x'\n"
        );
        assert_eq!(conversion.quotes, 1);
    }

    #[test]
    fn test_quotes_escape_dollar() {
        assert_eq!(double_quoted("'$HOME'").as_deref(), Some("\"\\$HOME\""));
        assert_eq!(double_quoted("'a'"), None);
        assert_eq!(double_quoted("''").as_deref(), Some("\"\""));
    }

    #[test]
    fn test_paste_into_dependencies_block() {
        let script = "plugins {\n    java\n}\n\ndependencies {\n}\n";
        let offset = script.find("dependencies {\n").unwrap() + "dependencies {\n".len();
        let conversion = paste_into(
            script,
            offset,
            "    implementation 'g:a:1'\n",
            &options(DeclarationFormat::Notation),
        )
        .unwrap();
        assert_eq!(
            conversion.text,
            "plugins {\n    java\n}\n\ndependencies {\n    implementation(\"g:a:1\")\n}\n"
        );
    }

    #[test]
    fn test_paste_outside_blocks_untouched() {
        let script = "dependencies {\n}\n";
        let conversion = paste_into(
            script,
            script.len(),
            "implementation 'g:a:1'\n",
            &options(DeclarationFormat::Notation),
        )
        .unwrap();
        assert_eq!(conversion.text, "dependencies {\n}\nimplementation 'g:a:1'\n");
        assert_eq!(conversion.changes(), 0);
    }

    #[test]
    fn test_repository_calls_untouched() {
        let text = "repositories {\n    maven(\"https://jitpack.io\")\n}\n";
        let conversion = convert_text(text, &options(DeclarationFormat::Named)).unwrap();
        assert_eq!(conversion.text, text);
        assert_eq!(conversion.changes(), 0);
    }

    #[test]
    fn test_groovy_repository_url_untouched() {
        let text = "maven {\n    url 'https://jitpack.io'\n}\n";
        let conversion = convert_text(text, &options(DeclarationFormat::Positional)).unwrap();
        assert_eq!(conversion.text, text);
        assert_eq!(conversion.changes(), 0);
    }

    #[test]
    fn test_nested_dependency_blocks_converted() {
        let text = "buildscript {\n    dependencies {\n        classpath 'g:a:1'\n    }\n}\ndependencies {\n    constraints {\n        implementation 'x:y:2'\n    }\n}\n";
        let conversion = convert_text(text, &options(DeclarationFormat::Notation)).unwrap();
        assert_eq!(
            conversion.text,
            "buildscript {\n    dependencies {\n        classpath(\"g:a:1\")\n    }\n}\ndependencies {\n    constraints {\n        implementation(\"x:y:2\")\n    }\n}\n"
        );
        assert_eq!(conversion.dependencies, 2);
    }

    #[test]
    fn test_paste_into_invalid_offset() {
        let result = paste_into("abc", 10, "x", &ConvertOptions::default());
        assert!(matches!(
            result,
            Err(AppError::Script(ScriptError::InvalidOffset { offset: 10, .. }))
        ));
    }
}
