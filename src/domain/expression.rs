//! Argument expressions of dependency declarations
//!
//! A declaration component is either a plain string literal, a string
//! template containing `$name` / `${expr}` interpolations, or any other
//! expression kept as opaque source text (a variable, a property access,
//! a function call).

use serde::Serialize;

/// A single argument value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "kebab-case")]
pub enum Expression {
    /// String literal without interpolation, holding the unescaped value
    Literal(String),
    /// String template, holding the raw body between the quotes
    Template(String),
    /// Non-string expression, holding its source text
    Reference(String),
}

/// A piece of a string template body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Raw literal text (escapes not yet resolved)
    Text(String),
    /// Interpolation source, including the `$` and braces
    Interpolation(String),
}

impl Expression {
    pub fn literal(value: impl Into<String>) -> Self {
        Expression::Literal(value.into())
    }

    /// Build from the raw body of a double-quoted string
    pub fn from_string_body(raw: &str) -> Self {
        let segments = template_segments(raw);
        if segments
            .iter()
            .any(|s| matches!(s, TemplateSegment::Interpolation(_)))
        {
            Expression::Template(raw.to_string())
        } else {
            Expression::Literal(unescape(raw))
        }
    }

    /// Build from a segment list, collapsing to a literal when nothing is interpolated
    pub fn from_segments(segments: &[TemplateSegment]) -> Self {
        let raw: String = segments
            .iter()
            .map(|s| match s {
                TemplateSegment::Text(t) | TemplateSegment::Interpolation(t) => t.as_str(),
            })
            .collect();
        Self::from_string_body(&raw)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    /// The plain value when this is a literal
    pub fn literal_value(&self) -> Option<&str> {
        match self {
            Expression::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Template segments; a literal is a single text segment, a reference a single interpolation
    pub fn segments(&self) -> Vec<TemplateSegment> {
        match self {
            Expression::Literal(value) => vec![TemplateSegment::Text(escape(value))],
            Expression::Template(raw) => template_segments(raw),
            Expression::Reference(source) => {
                vec![TemplateSegment::Interpolation(format!("${{{}}}", source))]
            }
        }
    }

    /// Render as a Kotlin expression
    pub fn to_kotlin(&self) -> String {
        match self {
            Expression::Literal(value) => format!("\"{}\"", escape(value)),
            Expression::Template(raw) => format!("\"{}\"", raw),
            Expression::Reference(source) => source.clone(),
        }
    }

    /// Render as a fragment usable inside a Kotlin string template
    pub fn to_template_fragment(&self) -> String {
        match self {
            Expression::Literal(value) => escape(value),
            Expression::Template(raw) => raw.clone(),
            Expression::Reference(source) if is_identifier(source) => format!("${}", source),
            Expression::Reference(source) => format!("${{{}}}", source),
        }
    }

    /// Human readable text (literal value, template body, or source)
    pub fn display_text(&self) -> &str {
        match self {
            Expression::Literal(text) | Expression::Template(text) | Expression::Reference(text) => {
                text
            }
        }
    }
}

/// Split a raw template body into text and interpolation segments
pub fn template_segments(raw: &str) -> Vec<TemplateSegment> {
    let chars: Vec<char> = raw.chars().collect();
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() {
            text.push(c);
            text.push(chars[i + 1]);
            i += 2;
            continue;
        }

        if c == '$' && i + 1 < chars.len() {
            let next = chars[i + 1];
            if next == '{' {
                let end = matching_brace(&chars, i + 1);
                flush_text(&mut segments, &mut text);
                segments.push(TemplateSegment::Interpolation(
                    chars[i..end].iter().collect(),
                ));
                i = end;
                continue;
            }
            if next.is_ascii_alphabetic() || next == '_' {
                let mut end = i + 1;
                while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
                {
                    end += 1;
                }
                flush_text(&mut segments, &mut text);
                segments.push(TemplateSegment::Interpolation(
                    chars[i..end].iter().collect(),
                ));
                i = end;
                continue;
            }
        }

        text.push(c);
        i += 1;
    }

    flush_text(&mut segments, &mut text);
    segments
}

fn flush_text(segments: &mut Vec<TemplateSegment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(TemplateSegment::Text(std::mem::take(text)));
    }
}

/// Index one past the `}` closing the `{` at `open`, or the end of input
fn matching_brace(chars: &[char], open: usize) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' if in_string => i += 1,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

/// Escape a value for a Kotlin double-quoted string
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Resolve backslash escapes of a Kotlin (or Groovy) string body
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_body_literal() {
        assert_eq!(
            Expression::from_string_body("com.google.guava:guava:33.0-jre"),
            Expression::literal("com.google.guava:guava:33.0-jre")
        );
        assert_eq!(Expression::from_string_body(r"a\$b"), Expression::literal("a$b"));
    }

    #[test]
    fn test_from_string_body_template() {
        let expr = Expression::from_string_body("g:a:$version");
        assert_eq!(expr, Expression::Template("g:a:$version".to_string()));
        assert!(!expr.is_literal());
    }

    #[test]
    fn test_template_segments() {
        assert_eq!(
            template_segments("io.ktor:ktor-${part}:$ktorVersion-x"),
            vec![
                TemplateSegment::Text("io.ktor:ktor-".to_string()),
                TemplateSegment::Interpolation("${part}".to_string()),
                TemplateSegment::Text(":".to_string()),
                TemplateSegment::Interpolation("$ktorVersion".to_string()),
                TemplateSegment::Text("-x".to_string()),
            ]
        );
    }

    #[test]
    fn test_template_segments_nested_braces() {
        assert_eq!(
            template_segments("${versions.get(\"a\") ?: \"}\"}!"),
            vec![
                TemplateSegment::Interpolation("${versions.get(\"a\") ?: \"}\"}".to_string()),
                TemplateSegment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_dollar_without_identifier_is_text() {
        assert_eq!(
            template_segments("cost: $5"),
            vec![TemplateSegment::Text("cost: $5".to_string())]
        );
    }

    #[test]
    fn test_to_kotlin() {
        assert_eq!(Expression::literal("1.0").to_kotlin(), "\"1.0\"");
        assert_eq!(Expression::literal("a\"b$").to_kotlin(), "\"a\\\"b\\$\"");
        assert_eq!(Expression::Template("$v".into()).to_kotlin(), "\"$v\"");
        assert_eq!(
            Expression::Reference("libs.versions.ktor".into()).to_kotlin(),
            "libs.versions.ktor"
        );
    }

    #[test]
    fn test_to_template_fragment() {
        assert_eq!(Expression::Reference("ktorVersion".into()).to_template_fragment(), "$ktorVersion");
        assert_eq!(
            Expression::Reference("rootProject.extra[\"v\"]".into()).to_template_fragment(),
            "${rootProject.extra[\"v\"]}"
        );
    }

    #[test]
    fn test_unescape_roundtrip_of_escape() {
        let value = "tab\there \"quoted\" \\ $dollar";
        assert_eq!(unescape(&escape(value)), value);
        assert_eq!(unescape(r"A"), "A");
    }
}
