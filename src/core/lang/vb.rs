//! Visual Basic lexical rules.
//!
//! VB has a single string delimiter and no escape character: `""` inside a
//! string is a literal quote. Comments start with `'` or the whole-word,
//! case-insensitive `Rem` keyword and run to the end of the physical line.
//! A trailing `_` continues the logical line but needs no state change here.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::lang::LanguageRules;
use crate::core::lang::csharp::classify_doubled_quote_string;
use crate::core::lang::state::{CharRole, LexState, Mode, RegionDirective, Window};
use crate::core::trie::CaseSensitivity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VbRules;

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl VbRules {
    /// `Rem` as a whole word (not `Remove`, not `x.Rem`).
    fn starts_rem_comment(w: &Window<'_>) -> bool {
        matches!(w.current(), 'r' | 'R')
            && !w.prev().is_some_and(|c| is_identifier_char(c) || c == '.')
            && matches!(w.peek(1), Some('e' | 'E'))
            && matches!(w.peek(2), Some('m' | 'M'))
            && !w.peek(3).is_some_and(is_identifier_char)
    }

    fn classify_code(&self, state: LexState, w: &Window<'_>) -> (LexState, CharRole) {
        match w.current() {
            '"' => (
                state.enter(Mode::String { verbatim: false }),
                CharRole::StringStart,
            ),
            '\'' => (state.enter(Mode::LineComment), CharRole::CommentStart),
            _ if Self::starts_rem_comment(w) => {
                (state.enter(Mode::LineComment).consume(2), CharRole::CommentStart)
            }
            '#' if w.at_line_start() => (state.enter(Mode::Directive), CharRole::Directive),
            _ => (state, CharRole::Code),
        }
    }
}

impl LanguageRules for VbRules {
    fn classify(&self, state: LexState, w: &Window<'_>) -> (LexState, CharRole) {
        if let Some(next) = state.take_pending() {
            return (next, CharRole::Delimiter);
        }
        let c = w.current();
        match state.mode {
            Mode::Code => self.classify_code(state, w),
            Mode::LineComment if c == '\n' => (state.enter(Mode::Code), CharRole::CommentEnd),
            Mode::LineComment => (state, CharRole::CommentContent),
            Mode::String { .. } => classify_doubled_quote_string(state, w),
            Mode::Directive if c == '\n' => (state.enter(Mode::Code), CharRole::DirectiveEnd),
            Mode::Directive => (state, CharRole::Directive),
            // VB has neither block comments nor char literals of its own.
            Mode::BlockComment | Mode::CharLiteral => (state.enter(Mode::Code), CharRole::Code),
            Mode::Markup | Mode::ServerComment | Mode::AspDirective => (state, CharRole::Inert),
        }
    }

    fn decode_literal(&self, raw: &str, _verbatim: bool) -> String {
        raw.replace("\"\"", "\"")
    }

    fn encode_literal(&self, value: &str, _verbatim: bool) -> String {
        value.replace('"', "\"\"")
    }

    fn is_identifier_char(&self, c: char) -> bool {
        is_identifier_char(c)
    }

    fn case_sensitivity(&self) -> CaseSensitivity {
        CaseSensitivity::Insensitive
    }

    fn global_qualifier(&self) -> Option<&'static str> {
        Some("Global.")
    }

    fn parse_region_directive(&self, directive: &str) -> Option<RegionDirective> {
        let body = directive.trim().strip_prefix('#')?.trim_start();
        let mut words = body.split_whitespace();
        let first = words.next()?.to_ascii_lowercase();
        match first.as_str() {
            "end" => words
                .next()
                .is_some_and(|w| w.eq_ignore_ascii_case("region"))
                .then_some(RegionDirective::End),
            "region" => {
                let rest = body[first.len()..].trim();
                let name = rest.split('\'').next().unwrap_or_default().trim();
                let name = name.trim_matches('"');
                Some(RegionDirective::Start(name.to_string()))
            }
            _ => None,
        }
    }

    fn concatenation_glue(&self, between: &str) -> Option<String> {
        decode_concatenation_glue(between)
    }
}

// ============================================================
// Concatenation glue
// ============================================================

static GLUE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^(?:
            (?P<op>[&+])
          | (?P<chr>chrw?) \s* \( \s* (?: (?P<dec>[0-9]+) | &h(?P<hex>[0-9a-f]+) ) \s* \)
          | (?P<cc>controlchars) \s* \. \s* (?P<member>[a-z]+)
          | (?P<name>[a-z_][a-z0-9_]*)
        )",
    )
    .expect("glue token pattern is valid")
});

/// Value of a named VB control-character constant.
fn named_constant(name: &str) -> Option<&'static str> {
    let value = match name.to_ascii_lowercase().as_str() {
        "vbcrlf" | "vbnewline" => "\r\n",
        "vbcr" => "\r",
        "vblf" => "\n",
        "vbtab" => "\t",
        "vbnullchar" => "\0",
        "vbnullstring" => "",
        "vbback" => "\u{8}",
        "vbformfeed" => "\u{c}",
        "vbverticaltab" => "\u{b}",
        _ => return None,
    };
    Some(value)
}

/// Value of a `ControlChars.<member>` constant.
fn control_chars_member(member: &str) -> Option<&'static str> {
    let value = match member.to_ascii_lowercase().as_str() {
        "crlf" | "newline" => "\r\n",
        "cr" => "\r",
        "lf" => "\n",
        "tab" => "\t",
        "nullchar" => "\0",
        "quote" => "\"",
        "back" => "\u{8}",
        "formfeed" => "\u{c}",
        "verticaltab" => "\u{b}",
        _ => return None,
    };
    Some(value)
}

/// Skip whitespace and `_` line continuations.
fn skip_trivia(mut rest: &str) -> &str {
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix('_') {
            Some(after) if after.trim_start_matches([' ', '\t', '\r']).starts_with('\n') => {
                rest = after;
            }
            _ => return trimmed,
        }
    }
}

/// Decode the text between two adjacent VB literals when it is exactly a
/// concatenation of operators and known control-character constants, e.g.
/// `& vbCrLf &` yields `"\r\n"` and ` & ` yields `""`.
///
/// Returns `None` as soon as anything else (a call, a variable, a comment)
/// appears, or when operators and constants do not alternate.
pub fn decode_concatenation_glue(between: &str) -> Option<String> {
    let mut glue = String::new();
    let mut rest = skip_trivia(between);
    let mut expect_operator = true;
    let mut saw_operator = false;

    while !rest.is_empty() {
        let caps = GLUE_TOKEN.captures(rest)?;
        let token_len = caps.get(0)?.end();

        if caps.name("op").is_some() {
            if !expect_operator {
                return None;
            }
            saw_operator = true;
        } else {
            if expect_operator {
                return None;
            }
            let value = if caps.name("chr").is_some() {
                let code = match (caps.name("dec"), caps.name("hex")) {
                    (Some(dec), _) => dec.as_str().parse::<u32>().ok()?,
                    (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok()?,
                    (None, None) => return None,
                };
                char::from_u32(code)?.to_string()
            } else if caps.name("cc").is_some() {
                control_chars_member(caps.name("member")?.as_str())?.to_string()
            } else {
                named_constant(caps.name("name")?.as_str())?.to_string()
            };
            glue.push_str(&value);
        }

        expect_operator = !expect_operator;
        rest = skip_trivia(&rest[token_len..]);
    }

    // Must end on an operator, right before the next literal.
    (saw_operator && !expect_operator).then_some(glue)
}
