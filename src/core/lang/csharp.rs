//! C# lexical rules.
//!
//! Handles `//` and `/* */` comments (no nesting, `/**/` is an empty comment),
//! regular strings with backslash escapes, verbatim `@"..."` strings where
//! `""` is a literal quote, character literals and preprocessor lines.

use std::iter::Peekable;
use std::str::Chars;

use crate::core::lang::LanguageRules;
use crate::core::lang::state::{CharRole, LexState, Mode, RegionDirective, Window};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CSharpRules;

impl CSharpRules {
    fn classify_code(&self, state: LexState, w: &Window<'_>) -> (LexState, CharRole) {
        match (w.current(), w.next()) {
            ('/', Some('/')) => (state.enter(Mode::LineComment).consume(1), CharRole::CommentStart),
            ('/', Some('*')) => (state.enter(Mode::BlockComment).consume(1), CharRole::CommentStart),
            ('"', _) => (
                state.enter(Mode::String { verbatim: false }),
                CharRole::StringStart,
            ),
            ('@', Some('"')) => (
                state.enter(Mode::String { verbatim: true }).consume(1),
                CharRole::StringStart,
            ),
            ('\'', _) => (state.enter(Mode::CharLiteral), CharRole::Inert),
            ('#', _) if w.at_line_start() => (state.enter(Mode::Directive), CharRole::Directive),
            _ => (state, CharRole::Code),
        }
    }
}

/// Shared by the C# classifier and the ASP.NET wrapper hosting C#.
fn classify_regular_string(state: LexState, c: char) -> (LexState, CharRole) {
    if state.escape_pending {
        return (
            LexState {
                escape_pending: false,
                ..state
            },
            CharRole::StringContent,
        );
    }
    match c {
        '\\' => (
            LexState {
                escape_pending: true,
                ..state
            },
            CharRole::StringContent,
        ),
        '"' => (state.enter(Mode::Code), CharRole::StringEnd),
        '\n' => (state.enter(Mode::Code), CharRole::StringAbort),
        _ => (state, CharRole::StringContent),
    }
}

/// Doubled-quote strings: C# verbatim strings and every VB string.
///
/// A quote followed by another quote is an escaped quote; the pair is
/// consumed together. Any other quote closes the literal.
pub(crate) fn classify_doubled_quote_string(
    state: LexState,
    w: &Window<'_>,
) -> (LexState, CharRole) {
    if state.quote_pending {
        return (
            LexState {
                quote_pending: false,
                ..state
            },
            CharRole::StringContent,
        );
    }
    match (w.current(), w.next()) {
        ('"', Some('"')) => (
            LexState {
                quote_pending: true,
                ..state
            },
            CharRole::StringContent,
        ),
        ('"', _) => (state.enter(Mode::Code), CharRole::StringEnd),
        _ => (state, CharRole::StringContent),
    }
}

fn classify_char_literal(state: LexState, c: char) -> (LexState, CharRole) {
    if state.escape_pending {
        return (
            LexState {
                escape_pending: false,
                ..state
            },
            CharRole::Inert,
        );
    }
    match c {
        '\\' => (
            LexState {
                escape_pending: true,
                ..state
            },
            CharRole::Inert,
        ),
        '\'' | '\n' => (state.enter(Mode::Code), CharRole::Inert),
        _ => (state, CharRole::Inert),
    }
}

impl LanguageRules for CSharpRules {
    fn classify(&self, state: LexState, w: &Window<'_>) -> (LexState, CharRole) {
        if let Some(next) = state.take_pending() {
            return (next, CharRole::Delimiter);
        }
        let c = w.current();
        match state.mode {
            Mode::Code => self.classify_code(state, w),
            Mode::LineComment if c == '\n' => (state.enter(Mode::Code), CharRole::CommentEnd),
            Mode::LineComment => (state, CharRole::CommentContent),
            Mode::BlockComment if c == '*' && w.next() == Some('/') => {
                (state.enter(Mode::Code).consume(1), CharRole::CommentEnd)
            }
            Mode::BlockComment => (state, CharRole::CommentContent),
            Mode::String { verbatim: false } => classify_regular_string(state, c),
            Mode::String { verbatim: true } => classify_doubled_quote_string(state, w),
            Mode::CharLiteral => classify_char_literal(state, c),
            Mode::Directive if c == '\n' => (state.enter(Mode::Code), CharRole::DirectiveEnd),
            Mode::Directive => (state, CharRole::Directive),
            Mode::Markup | Mode::ServerComment | Mode::AspDirective => (state, CharRole::Inert),
        }
    }

    fn decode_literal(&self, raw: &str, verbatim: bool) -> String {
        if verbatim {
            raw.replace("\"\"", "\"")
        } else {
            decode_escapes(raw)
        }
    }

    fn encode_literal(&self, value: &str, verbatim: bool) -> String {
        if verbatim {
            value.replace('"', "\"\"")
        } else {
            encode_escapes(value)
        }
    }

    fn is_qualifier_char(&self, c: char) -> bool {
        c == '.' || c == ':'
    }

    /// A lone `:` (named argument, ternary, label) is not `::`.
    fn is_qualifier_at(&self, window: &Window<'_>) -> bool {
        match window.current() {
            '.' => true,
            ':' => window.prev() == Some(':') || window.next() == Some(':'),
            _ => false,
        }
    }

    fn allows_whitespace_around_member_access(&self) -> bool {
        true
    }

    fn global_qualifier(&self) -> Option<&'static str> {
        Some("global::")
    }

    fn parse_region_directive(&self, directive: &str) -> Option<RegionDirective> {
        let body = directive.trim().strip_prefix('#')?.trim_start();
        if let Some(rest) = body.strip_prefix("endregion") {
            return rest
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
                .then_some(RegionDirective::End);
        }
        let rest = body.strip_prefix("region")?;
        if !rest.chars().next().is_none_or(char::is_whitespace) {
            return None;
        }
        // A trailing `// comment` is not part of the region name.
        let name = rest.split("//").next().unwrap_or_default().trim();
        Some(RegionDirective::Start(name.to_string()))
    }
}

/// Collects UTF-16 code units from `\u`/`\x` escapes so surrogate pairs
/// written as two escapes become one character.
#[derive(Default)]
struct Utf16Joiner {
    high: Option<u16>,
}

impl Utf16Joiner {
    fn push_unit(&mut self, out: &mut String, unit: u16) {
        match unit {
            0xD800..=0xDBFF => {
                self.flush(out);
                self.high = Some(unit);
            }
            0xDC00..=0xDFFF => match self.high.take() {
                Some(high) => {
                    let combined =
                        0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                    out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => out.push(char::REPLACEMENT_CHARACTER),
            },
            _ => {
                self.flush(out);
                out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    fn push_char(&mut self, out: &mut String, c: char) {
        self.flush(out);
        out.push(c);
    }

    fn flush(&mut self, out: &mut String) {
        if self.high.take().is_some() {
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

fn take_hex(chars: &mut Peekable<Chars<'_>>, max: usize) -> String {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}

/// Resolve C# backslash escapes. Unknown or truncated escapes are kept as written.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut joiner = Utf16Joiner::default();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            joiner.push_char(&mut out, c);
            continue;
        }
        let Some(escape) = chars.next() else {
            joiner.push_char(&mut out, '\\');
            break;
        };
        let simple = match escape {
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            '0' => Some('\0'),
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{b}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            joiner.push_char(&mut out, decoded);
            continue;
        }

        match escape {
            'x' | 'u' => {
                let digits = take_hex(&mut chars, 4);
                let complete = if escape == 'u' {
                    digits.len() == 4
                } else {
                    !digits.is_empty()
                };
                match u16::from_str_radix(&digits, 16) {
                    Ok(unit) if complete => joiner.push_unit(&mut out, unit),
                    _ => {
                        joiner.flush(&mut out);
                        out.push('\\');
                        out.push(escape);
                        out.push_str(&digits);
                    }
                }
            }
            'U' => {
                let digits = take_hex(&mut chars, 8);
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == 8)
                    .and_then(char::from_u32);
                joiner.flush(&mut out);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push_str("\\U");
                        out.push_str(&digits);
                    }
                }
            }
            other => {
                joiner.flush(&mut out);
                out.push('\\');
                out.push(other);
            }
        }
    }
    joiner.flush(&mut out);
    out
}

/// Write `value` as the body of a C# regular string literal.
pub fn encode_escapes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{b}' => out.push_str("\\v"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
