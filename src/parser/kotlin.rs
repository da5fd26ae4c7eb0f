//! Kotlin DSL build script scanner
//!
//! Handles:
//! - Lexing of Kotlin scripts (comments, string templates, raw strings, back-ticked names)
//! - Statement-level calls inside `dependencies {}` blocks, nested blocks included
//! - Plugin requests inside `plugins {}` blocks: `id("x")`, `kotlin("jvm")`, built-in accessors
//! - Block lookup by offset (which block encloses a position)
//!
//! This is not a Kotlin parser. Expressions are only split into tokens and
//! bracket pairs; anything that is not a plain call statement is skipped.

use crate::domain::{
    template_segments, CallArgument, CallOccurrence, Expression, PluginDeclaration,
    TemplateSegment, KOTLIN_NAMESPACE,
};
use std::ops::Range;

/// Callees that never declare a dependency
const NON_CONFIGURATION_CALLS: &[&str] = &[
    "add",
    "apply",
    "because",
    "components",
    "constraints",
    "enforcedPlatform",
    "exclude",
    "files",
    "fileTree",
    "gradleApi",
    "gradleTestKit",
    "kotlin",
    "localGroovy",
    "modules",
    "platform",
    "println",
    "project",
    "testFixtures",
];

/// Keywords that look like calls when followed by parentheses
const KEYWORDS: &[&str] = &[
    "catch", "else", "for", "fun", "if", "return", "try", "val", "var", "when", "while",
];

const TWO_CHAR_OPERATORS: &[&[u8; 2]] = &[
    b"==", b"!=", b"->", b"?:", b"<=", b">=", b"&&", b"||", b"::", b"?.", b"+=", b"-=", b"*=",
    b"/=", b"..",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident,
    /// Back-ticked name; the range includes the back-ticks
    Backtick,
    /// String literal; `body` is the range between the quotes
    Str { body: Range<usize>, raw: bool },
    /// Single-quoted literal (a Kotlin char, or a Groovy string in pasted text)
    Char,
    Number,
    Op,
    Punct(u8),
    Newline,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    range: Range<usize>,
}

/// A `name { ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Name of the call owning the block, empty for anonymous blocks
    pub name: String,
    /// Whole block, name included
    pub range: Range<usize>,
    /// Text between the braces
    pub body: Range<usize>,
}

/// A call statement and the names of the blocks enclosing it, outermost first
#[derive(Debug, Clone)]
pub struct ScannedCall {
    pub call: CallOccurrence,
    pub path: Vec<String>,
}

/// How a plugin is requested in a `plugins {}` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginRequestKind {
    /// `id("x")`
    Id,
    /// `kotlin("jvm")`
    Kotlin,
    /// `java`, `` `java-library` ``
    BuiltIn,
}

/// A plugin request found in a `plugins {}` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginEntry {
    pub kind: PluginRequestKind,
    /// Fully qualified id (`org.jetbrains.kotlin.jvm` for `kotlin("jvm")`)
    pub id: String,
    pub version: Option<Expression>,
    /// Range of the `id(...)` / `kotlin(...)` call or the accessor
    pub call_range: Range<usize>,
    /// Range of the request including its `version` clause
    pub request_range: Range<usize>,
}

/// Result of scanning a script
#[derive(Debug, Clone, Default)]
pub struct ScriptScan {
    pub calls: Vec<ScannedCall>,
    pub plugins: Vec<PluginEntry>,
    pub blocks: Vec<Block>,
}

impl ScannedCall {
    /// Whether one of the enclosing blocks is named `name`
    pub fn is_inside(&self, name: &str) -> bool {
        self.path.iter().any(|p| p == name)
    }

    /// Whether the call sits in some named block but in none named `name`
    pub fn is_inside_other_than(&self, name: &str) -> bool {
        self.path.iter().any(|p| !p.is_empty()) && !self.is_inside(name)
    }
}

impl PluginEntry {
    /// Plugin declaration for rendering
    pub fn declaration(&self) -> PluginDeclaration {
        PluginDeclaration::new(
            self.id.clone(),
            self.version.as_ref().map(|v| v.display_text().to_string()),
        )
        .with_range(self.request_range.clone())
    }
}

impl ScriptScan {
    /// Calls declaring dependencies: statements inside a `dependencies` block
    pub fn dependency_calls(&self) -> impl Iterator<Item = &CallOccurrence> {
        self.calls
            .iter()
            .filter(|c| c.is_inside("dependencies"))
            .filter(|c| may_declare_dependency(&c.call.callee))
            .map(|c| &c.call)
    }

    /// Innermost block whose body contains `offset`
    pub fn enclosing_block(&self, offset: usize) -> Option<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.body.start <= offset && offset <= b.body.end)
            .min_by_key(|b| b.body.end - b.body.start)
    }

    /// Whether `offset` lies in the body of a block named `name`
    pub fn is_inside(&self, offset: usize, name: &str) -> bool {
        self.blocks
            .iter()
            .any(|b| b.name == name && b.body.start <= offset && offset <= b.body.end)
    }

    /// Whether `offset` lies in some named block but in none named `name`
    pub fn is_inside_other_than(&self, offset: usize, name: &str) -> bool {
        let named = self
            .blocks
            .iter()
            .any(|b| !b.name.is_empty() && b.body.start <= offset && offset <= b.body.end);
        named && !self.is_inside(offset, name)
    }

    /// Version of the Kotlin Gradle plugin applied in the `plugins` block
    pub fn kotlin_plugin_version(&self) -> Option<&str> {
        self.plugins
            .iter()
            .filter(|p| p.id.starts_with(KOTLIN_NAMESPACE))
            .find_map(|p| p.version.as_ref().and_then(Expression::literal_value))
    }
}

/// Whether a call named `callee` can be a dependency declaration
pub fn may_declare_dependency(callee: &str) -> bool {
    !NON_CONFIGURATION_CALLS.contains(&callee) && !KEYWORDS.contains(&callee)
}

/// Scan a whole script
pub fn scan(source: &str) -> ScriptScan {
    let scanner = Scanner::new(source);
    let mut out = ScriptScan::default();
    let mut path = Vec::new();
    scanner.scan_body(0, scanner.tokens.len(), &mut path, &mut out);
    out
}

/// Parse text consisting of exactly one call, such as `implementation("g:a:1")`
pub fn parse_call(text: &str) -> Option<CallOccurrence> {
    let scanner = Scanner::new(text);
    let indices: Vec<usize> = (0..scanner.tokens.len())
        .filter(|&i| scanner.tokens[i].kind != TokenKind::Newline)
        .collect();
    let (&first, &last) = (indices.first()?, indices.last()?);
    scanner.call_statement(first, last + 1)
}

/// Parse the call at `range` of `source`, reporting offsets relative to `source`
pub fn parse_call_in(source: &str, range: Range<usize>) -> Option<CallOccurrence> {
    let base = range.start;
    let mut call = parse_call(source.get(range)?)?;
    let shift = |r: &mut Range<usize>| *r = r.start + base..r.end + base;
    shift(&mut call.callee_range);
    shift(&mut call.arguments_range);
    shift(&mut call.range);
    for argument in &mut call.arguments {
        shift(&mut argument.range);
    }
    Some(call)
}

/// Ranges of single-quoted literals (quotes included)
pub fn single_quoted_literals(source: &str) -> Vec<Range<usize>> {
    tokenize(source)
        .into_iter()
        .filter(|t| t.kind == TokenKind::Char)
        .map(|t| t.range)
        .collect()
}

/// 1-based line and column of a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

struct Scanner<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    partner: Vec<Option<usize>>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        let tokens = tokenize(source);
        let partner = pair_brackets(&tokens);
        Self {
            source,
            tokens,
            partner,
        }
    }

    fn text(&self, index: usize) -> &'a str {
        &self.source[self.tokens[index].range.clone()]
    }

    fn is_punct(&self, index: usize, c: u8) -> bool {
        matches!(self.tokens.get(index), Some(t) if t.kind == TokenKind::Punct(c))
    }

    fn is_ident(&self, index: usize, name: &str) -> bool {
        matches!(self.tokens.get(index), Some(t) if t.kind == TokenKind::Ident)
            && self.text(index) == name
    }

    fn is_separator(&self, index: usize) -> bool {
        self.tokens[index].kind == TokenKind::Newline || self.is_punct(index, b';')
    }

    /// Index of the separator ending the statement starting at `start`, or `end`
    fn statement_end(&self, start: usize, end: usize) -> usize {
        let mut i = start;
        while i < end {
            if self.is_separator(i) {
                return i;
            }
            i = match self.partner[i] {
                Some(close) if close > i => close + 1,
                _ => i + 1,
            };
        }
        end
    }

    fn scan_body(&self, start: usize, end: usize, path: &mut Vec<String>, out: &mut ScriptScan) {
        let mut i = start;
        while i < end {
            if self.is_separator(i) {
                i += 1;
                continue;
            }
            let stop = self.statement_end(i, end).min(end);
            self.scan_statement(i, stop, path, out);
            i = stop;
        }
    }

    fn scan_statement(&self, start: usize, end: usize, path: &mut Vec<String>, out: &mut ScriptScan) {
        if path.last().map(String::as_str) == Some("plugins") {
            if let Some(entry) = self.plugin_entry(start, end) {
                out.plugins.push(entry);
                return;
            }
        }

        if let Some(call) = self.call_statement(start, end) {
            if !KEYWORDS.contains(&call.callee.as_str()) {
                out.calls.push(ScannedCall {
                    call,
                    path: path.clone(),
                });
                return;
            }
        }

        let last = end - 1;
        if !self.is_punct(last, b'}') {
            return;
        }
        let Some(open) = self.partner[last] else {
            return;
        };
        if open < start {
            return;
        }

        let name = match open.checked_sub(1) {
            Some(before) if before >= start && self.tokens[before].kind == TokenKind::Ident => {
                self.text(before).to_string()
            }
            _ => String::new(),
        };
        out.blocks.push(Block {
            name: name.clone(),
            range: self.tokens[start].range.start..self.tokens[last].range.end,
            body: self.tokens[open].range.end..self.tokens[last].range.start,
        });

        path.push(name);
        self.scan_body(open + 1, last, path, out);
        path.pop();
    }

    /// `callee(args)` optionally followed by a trailing lambda, spanning exactly `start..end`
    fn call_statement(&self, start: usize, end: usize) -> Option<CallOccurrence> {
        let callee_token = &self.tokens[start];
        let callee = match &callee_token.kind {
            TokenKind::Ident => self.text(start).to_string(),
            TokenKind::Backtick => self.text(start).trim_matches('`').to_string(),
            TokenKind::Str { .. } => self.string_expression(start).literal_value()?.to_string(),
            _ => return None,
        };

        let open = start + 1;
        if open >= end || !self.is_punct(open, b'(') {
            return None;
        }
        let close = self.partner[open]?;
        if close >= end {
            return None;
        }

        let mut last = close;
        let mut has_trailing_lambda = false;
        if close + 1 < end {
            let brace = close + 1;
            if !self.is_punct(brace, b'{') {
                return None;
            }
            let brace_close = self.partner[brace]?;
            if brace_close + 1 != end {
                return None;
            }
            has_trailing_lambda = true;
            last = brace_close;
        }

        Some(CallOccurrence {
            callee,
            callee_range: callee_token.range.clone(),
            arguments: self.arguments(open, close),
            arguments_range: self.tokens[open].range.start..self.tokens[close].range.end,
            has_trailing_lambda,
            range: callee_token.range.start..self.tokens[last].range.end,
        })
    }

    fn arguments(&self, open: usize, close: usize) -> Vec<CallArgument> {
        let mut arguments = Vec::new();
        let mut segment_start = open + 1;
        let mut i = open + 1;
        while i <= close {
            if i == close || self.is_punct(i, b',') {
                if let Some(argument) = self.argument(segment_start, i) {
                    arguments.push(argument);
                }
                segment_start = i + 1;
                i += 1;
                continue;
            }
            i = match self.partner[i] {
                Some(partner) if partner > i && partner < close => partner + 1,
                _ => i + 1,
            };
        }
        arguments
    }

    fn argument(&self, start: usize, end: usize) -> Option<CallArgument> {
        let indices: Vec<usize> = (start..end)
            .filter(|&i| self.tokens[i].kind != TokenKind::Newline)
            .collect();
        let (&first, &last) = (indices.first()?, indices.last()?);
        let range = self.tokens[first].range.start..self.tokens[last].range.end;

        let named = indices.len() >= 3
            && self.tokens[indices[0]].kind == TokenKind::Ident
            && self.is_punct(indices[1], b'=');
        let (name, value_indices) = if named {
            (Some(self.text(indices[0]).to_string()), &indices[2..])
        } else {
            (None, &indices[..])
        };

        Some(CallArgument {
            name,
            value: self.value(value_indices),
            range,
        })
    }

    fn value(&self, indices: &[usize]) -> Expression {
        if let [single] = indices {
            if matches!(self.tokens[*single].kind, TokenKind::Str { .. }) {
                return self.string_expression(*single);
            }
        }
        match (indices.first(), indices.last()) {
            (Some(&first), Some(&last)) => Expression::Reference(
                self.source[self.tokens[first].range.start..self.tokens[last].range.end].to_string(),
            ),
            _ => Expression::Reference(String::new()),
        }
    }

    fn string_expression(&self, index: usize) -> Expression {
        match &self.tokens[index].kind {
            TokenKind::Str { body, raw: false } => {
                Expression::from_string_body(&self.source[body.clone()])
            }
            TokenKind::Str { body, raw: true } => {
                let text = &self.source[body.clone()];
                let interpolated = template_segments(text)
                    .iter()
                    .any(|s| matches!(s, TemplateSegment::Interpolation(_)));
                if interpolated {
                    Expression::Reference(self.text(index).to_string())
                } else {
                    Expression::Literal(text.to_string())
                }
            }
            _ => Expression::Reference(self.text(index).to_string()),
        }
    }

    /// Plugin request statement spanning `start..end`
    fn plugin_entry(&self, start: usize, end: usize) -> Option<PluginEntry> {
        let (kind, id, call_last) = if self.is_ident(start, "id") || self.is_ident(start, "kotlin")
        {
            let open = start + 1;
            if !self.is_punct(open, b'(') {
                return None;
            }
            let close = self.partner[open]?;
            if close != open + 2 || close >= end {
                return None;
            }
            let argument = self.string_expression(open + 1);
            let value = argument.literal_value()?;
            if self.is_ident(start, "id") {
                (PluginRequestKind::Id, value.to_string(), close)
            } else {
                (
                    PluginRequestKind::Kotlin,
                    format!("{}{}", KOTLIN_NAMESPACE, value),
                    close,
                )
            }
        } else {
            let name = match self.tokens[start].kind {
                TokenKind::Ident => self.text(start),
                TokenKind::Backtick => self.text(start).trim_matches('`'),
                _ => return None,
            };
            if start + 1 != end && !self.is_ident(start + 1, "apply") {
                return None;
            }
            (PluginRequestKind::BuiltIn, name.to_string(), start)
        };

        let (version, request_last) = self.plugin_version(call_last + 1, end);
        let call_range = self.tokens[start].range.start..self.tokens[call_last].range.end;
        let request_range =
            self.tokens[start].range.start..self.tokens[request_last.unwrap_or(call_last)].range.end;

        Some(PluginEntry {
            kind,
            id,
            version,
            call_range,
            request_range,
        })
    }

    /// `version "v"`, `version("v")`, `.version("v")` or `version someVal` starting at `at`
    fn plugin_version(&self, at: usize, end: usize) -> (Option<Expression>, Option<usize>) {
        let keyword = if self.is_punct(at, b'.') { at + 1 } else { at };
        if keyword >= end || !self.is_ident(keyword, "version") {
            return (None, None);
        }
        let next = keyword + 1;
        if next >= end {
            return (None, None);
        }
        if self.is_punct(next, b'(') {
            let Some(close) = self.partner[next] else {
                return (None, None);
            };
            let indices: Vec<usize> = (next + 1..close).collect();
            return (Some(self.value(&indices)), Some(close));
        }
        match self.tokens[next].kind {
            TokenKind::Str { .. } | TokenKind::Ident => (Some(self.value(&[next])), Some(next)),
            _ => (None, None),
        }
    }
}

fn pair_brackets(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut partner = vec![None; tokens.len()];
    let mut stack: Vec<(usize, u8)> = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        let TokenKind::Punct(c) = token.kind else {
            continue;
        };
        match c {
            b'(' | b'[' | b'{' => stack.push((index, c)),
            b')' | b']' | b'}' => {
                let expected = match c {
                    b')' => b'(',
                    b']' => b'[',
                    _ => b'{',
                };
                if let Some(position) = stack.iter().rposition(|(_, open)| *open == expected) {
                    let (open_index, _) = stack[position];
                    stack.truncate(position);
                    partner[open_index] = Some(index);
                    partner[index] = Some(open_index);
                }
            }
            _ => {}
        }
    }
    partner
}

fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let b = bytes[pos];
        let kind = match b {
            b' ' | b'\t' | b'\r' | 0x0c => {
                pos += 1;
                continue;
            }
            b'\n' => {
                pos += 1;
                TokenKind::Newline
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                continue;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = skip_block_comment(bytes, pos);
                continue;
            }
            b'"' => {
                let (end, kind) = scan_string(bytes, pos);
                pos = end;
                kind
            }
            b'\'' => {
                pos = scan_quoted(bytes, pos, b'\'');
                TokenKind::Char
            }
            b'`' => {
                pos = scan_quoted(bytes, pos, b'`');
                TokenKind::Backtick
            }
            _ if is_ident_start(b) => {
                while pos < bytes.len() && is_ident_part(bytes[pos]) {
                    pos += 1;
                }
                TokenKind::Ident
            }
            _ if b.is_ascii_digit() => {
                while pos < bytes.len()
                    && (is_ident_part(bytes[pos])
                        || (bytes[pos] == b'.'
                            && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)))
                {
                    pos += 1;
                }
                TokenKind::Number
            }
            _ => {
                let pair = bytes.get(pos..pos + 2);
                if pair.is_some_and(|p| TWO_CHAR_OPERATORS.iter().any(|op| op.as_slice() == p)) {
                    pos += 2;
                    TokenKind::Op
                } else {
                    pos += 1;
                    TokenKind::Punct(b)
                }
            }
        };
        tokens.push(Token {
            kind,
            range: start..pos,
        });
    }

    tokens
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Kotlin block comments nest
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut pos = start;
    while pos + 1 < bytes.len() {
        match (bytes[pos], bytes[pos + 1]) {
            (b'/', b'*') => {
                depth += 1;
                pos += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                pos += 2;
                if depth == 0 {
                    return pos;
                }
            }
            _ => pos += 1,
        }
    }
    bytes.len()
}

/// End of a quoted run started at `start`, stopping at the closing quote or the line end
fn scan_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if quote != b'`' => pos += 2,
            b'\n' => return pos,
            c if c == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

fn scan_string(bytes: &[u8], start: usize) -> (usize, TokenKind) {
    if bytes[start..].starts_with(b"\"\"\"") {
        let mut pos = start + 3;
        while pos < bytes.len() {
            if bytes[pos] == b'$' && bytes.get(pos + 1) == Some(&b'{') {
                pos = skip_template_expression(bytes, pos + 1);
                continue;
            }
            if bytes[pos..].starts_with(b"\"\"\"") {
                let mut end = pos + 3;
                while bytes.get(end) == Some(&b'"') {
                    end += 1;
                }
                let body = start + 3..end - 3;
                return (end, TokenKind::Str { body, raw: true });
            }
            pos += 1;
        }
        let body = start + 3..bytes.len();
        return (bytes.len(), TokenKind::Str { body, raw: true });
    }

    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'$' if bytes.get(pos + 1) == Some(&b'{') => {
                pos = skip_template_expression(bytes, pos + 1);
            }
            b'"' => {
                let body = start + 1..pos;
                return (pos + 1, TokenKind::Str { body, raw: false });
            }
            b'\n' => break,
            _ => pos += 1,
        }
    }
    let end = pos.min(bytes.len());
    (end, TokenKind::Str { body: start + 1..end, raw: false })
}

/// Index one past the `}` closing the template expression opened at `open`
fn skip_template_expression(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return pos + 1;
                }
            }
            b'"' => {
                pos = scan_string(bytes, pos).0;
                continue;
            }
            b'\'' => {
                pos = scan_quoted(bytes, pos, b'\'');
                continue;
            }
            _ => {}
        }
        pos += 1;
    }
    bytes.len()
}
