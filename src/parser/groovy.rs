//! Groovy DSL intake for pasted text
//!
//! Recognizes Groovy-shaped declarations so they can be rewritten in the
//! Kotlin DSL:
//! - `implementation 'group:artifact:version'` (parentheses optional)
//! - `implementation group: 'group', name: 'artifact', version: 'version'`
//! - `id 'plugin.id' version '1.0'` (parentheses optional)
//!
//! Single-quoted Groovy strings never interpolate; double-quoted ones keep
//! their `$name` / `${expr}` templates.

use crate::domain::{
    unescape, CallArgument, CallOccurrence, DependencyDeclaration, Expression, PluginDeclaration,
};
use crate::format::{FormatRecognizer, NamedFormat, NotationFormat};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

// Configuration followed by a notation string or a group/name/version map
static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\b(?P<config>[A-Za-z_]\w*)(?P<open>\s*\(\s*|[ \t]+)(?:{}|group\s*:\s*{}\s*,\s*(?:name|artifact)\s*:\s*{}(?:\s*,\s*version\s*:\s*{})?)(?P<close>\s*\))?"#,
        quoted("notation", r"[^'\n]+", r#"[^"\n]+"#),
        quoted("group", r"[^'\n]+", r#"[^"\n]+"#),
        quoted("name", r"[^'\n]+", r#"[^"\n]+"#),
        quoted("version", r"[^'\n]+", r#"[^"\n]+"#),
    ))
    .unwrap()
});

// Plugin request with an optional version
static PLUGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\bid\s*(?P<open>\(\s*)?{}(?:\s*\))?(?:[ \t]+version\s*\(?\s*{}(?:\s*\))?)?"#,
        quoted("id", r"[\w.-]+", r"[\w.-]+"),
        quoted("version", r"[^'\n]+", r#"[^"\n]+"#),
    ))
    .unwrap()
});

/// Pattern for a string in either quote style, the closing quote matching the
/// opening one. The body lands in `<name>_sq` or `<name>_dq`.
fn quoted(name: &str, single_body: &str, double_body: &str) -> String {
    format!(
        r#"(?:'(?P<{name}_sq>{single_body})'|"(?P<{name}_dq>{double_body})")"#
    )
}

/// Words that precede quoted text without being configurations
const NOT_CONFIGURATIONS: &[&str] = &["id", "version", "apply", "plugin", "from", "println"];

/// A dependency declaration found in pasted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignDependency {
    pub configuration: String,
    pub declaration: DependencyDeclaration,
    pub range: Range<usize>,
}

/// Find Groovy-shaped dependency declarations
///
/// Matches whose text cannot be decomposed (`'just-a-name'`, four-part
/// notations) are dropped.
pub fn find_dependencies(text: &str) -> Vec<ForeignDependency> {
    DEPENDENCY_RE
        .captures_iter(text)
        .filter_map(|caps| dependency_from_match(&caps))
        .collect()
}

/// Find plugin requests
pub fn find_plugins(text: &str) -> Vec<PluginDeclaration> {
    PLUGIN_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = quoted_body(&caps, "id")?.to_string();
            let version = quoted_body(&caps, "version").map(str::to_string);
            Some(PluginDeclaration::new(id, version).with_range(whole.range()))
        })
        .collect()
}

fn dependency_from_match(caps: &Captures<'_>) -> Option<ForeignDependency> {
    let whole = caps.get(0)?;
    let configuration = caps.name("config")?.as_str();
    if NOT_CONFIGURATIONS.contains(&configuration) {
        return None;
    }

    let mut end = whole.end();
    let opened = caps
        .name("open")
        .is_some_and(|m| m.as_str().contains('('));
    if let Some(close) = caps.name("close") {
        if !opened {
            end = close.start();
        }
    }

    let declaration = if let Some(notation) = string_capture(caps, "notation") {
        let call = CallOccurrence::new(configuration, vec![CallArgument::positional(notation)]);
        NotationFormat.extract(&call).ok()?
    } else {
        let mut arguments = vec![
            CallArgument::named("group", string_capture(caps, "group")?),
            CallArgument::named("name", string_capture(caps, "name")?),
        ];
        if let Some(version) = string_capture(caps, "version") {
            arguments.push(CallArgument::named("version", version));
        }
        NamedFormat
            .extract(&CallOccurrence::new(configuration, arguments))
            .ok()?
    };

    Some(ForeignDependency {
        configuration: configuration.to_string(),
        declaration,
        range: whole.start()..end,
    })
}

fn quoted_body<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(&format!("{name}_sq"))
        .or_else(|| caps.name(&format!("{name}_dq")))
        .map(|body| body.as_str())
}

/// Value of the string captured as `name`, in whichever quote style matched
fn string_capture(caps: &Captures<'_>, name: &str) -> Option<Expression> {
    if let Some(body) = caps.name(&format!("{name}_sq")) {
        return Some(Expression::Literal(unescape(body.as_str())));
    }
    caps.name(&format!("{name}_dq"))
        .map(|body| Expression::from_string_body(body.as_str()))
}
