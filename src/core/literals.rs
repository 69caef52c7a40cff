//! String-literal scanner.
//!
//! Walks a code fragment one character at a time, lets the language rules
//! classify each character, and emits a [`LiteralResult`] for every string
//! literal that is closed before the end of the fragment. Unterminated
//! literals are dropped without a result.
//!
//! Two comment conventions suppress localization:
//!
//! - a comment whose text is exactly the no-localize marker (`/*VL_NO_LOC*/`,
//!   `//VL_NO_LOC`, `'VL_NO_LOC`) flags the next literal
//! - a region named after the marker (`#region VL_NO_LOC` ... `#endregion`)
//!   flags every literal inside it

use serde::Serialize;

use crate::core::lang::{CharRole, LanguageRules, LexState, RegionDirective, Window};
use crate::core::merge::merge_adjacent;
use crate::core::position::{ScanPosition, SourceSpan};

pub const DEFAULT_NO_LOCALIZE_MARKER: &str = "VL_NO_LOC";

/// Options for one literal scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Comment text / region name that excludes literals from localization.
    pub no_localize_marker: String,
    /// Run the language's concatenation merge pass (VB) after scanning.
    pub merge_concatenations: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            no_localize_marker: DEFAULT_NO_LOCALIZE_MARKER.to_string(),
            merge_concatenations: true,
        }
    }
}

/// A string literal found in a fragment.
///
/// `span`, `offset` and `length` cover the text between the delimiters;
/// `token_offset` and `token_length` cover the whole literal including `@`
/// and quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralResult<T = ()> {
    /// Decoded value (escapes and doubled quotes resolved).
    pub value: String,
    pub span: SourceSpan,
    pub offset: usize,
    pub length: usize,
    pub token_offset: usize,
    pub token_length: usize,
    pub was_verbatim: bool,
    pub is_within_no_localize_region: bool,
    pub is_preceded_by_no_localize_comment: bool,
    /// Caller-supplied tags (namespace, class, method, ...), copied as-is.
    pub context: T,
}

impl<T> LiteralResult<T> {
    /// Neither a no-localize comment nor a no-localize region excludes this literal.
    pub fn is_localizable(&self) -> bool {
        !self.is_within_no_localize_region && !self.is_preceded_by_no_localize_comment
    }

    /// Absolute offset just past the closing delimiter.
    pub fn token_end(&self) -> usize {
        self.token_offset + self.token_length
    }
}

/// Scan `text`, which starts at `start` in its file, for string literals.
pub fn scan_literals(
    text: &str,
    start: ScanPosition,
    rules: &(impl LanguageRules + ?Sized),
    options: &ScanOptions,
) -> Vec<LiteralResult> {
    scan_literals_with_context(text, start, rules, options, ())
}

/// Like [`scan_literals`], tagging every result with a copy of `context`.
pub fn scan_literals_with_context<T: Clone>(
    text: &str,
    start: ScanPosition,
    rules: &(impl LanguageRules + ?Sized),
    options: &ScanOptions,
    context: T,
) -> Vec<LiteralResult<T>> {
    let mut scanner = LiteralScanner {
        rules,
        marker: options.no_localize_marker.as_str(),
        context,
        results: Vec::new(),
        open: None,
        comment: String::new(),
        directive: String::new(),
        preceded_by_marker: false,
        regions: Vec::new(),
    };

    let chars: Vec<char> = text.chars().collect();
    let mut state = rules.initial_state();
    let mut pos = start;
    for (i, c) in chars.iter().copied().enumerate() {
        let (next, role) = rules.classify(state, &Window::new(&chars, i));
        scanner.apply(role, c, pos, next);
        state = next;
        pos.advance(c);
    }

    if let Some(open) = &scanner.open {
        tracing::trace!(
            line = open.token_start.line,
            column = open.token_start.column,
            "dropping unterminated literal"
        );
    }

    let mut results = scanner.results;
    if options.merge_concatenations {
        merge_adjacent(text, start, rules, &mut results);
    }
    results
}

/// A literal whose closing delimiter has not been seen yet.
struct OpenLiteral {
    token_start: ScanPosition,
    content_start: Option<ScanPosition>,
    verbatim: bool,
    raw: String,
}

struct LiteralScanner<'a, R: ?Sized, T> {
    rules: &'a R,
    marker: &'a str,
    context: T,
    results: Vec<LiteralResult<T>>,
    open: Option<OpenLiteral>,
    comment: String,
    directive: String,
    preceded_by_marker: bool,
    /// One entry per open region; `true` when the region is a no-localize region.
    regions: Vec<bool>,
}

impl<R: LanguageRules + ?Sized, T: Clone> LiteralScanner<'_, R, T> {
    fn apply(&mut self, role: CharRole, c: char, pos: ScanPosition, next: LexState) {
        match role {
            CharRole::StringStart => {
                self.open = Some(OpenLiteral {
                    token_start: pos,
                    content_start: None,
                    verbatim: next.is_verbatim(),
                    raw: String::new(),
                });
            }
            CharRole::StringContent => {
                if let Some(open) = &mut self.open {
                    open.content_start.get_or_insert(pos);
                    open.raw.push(c);
                }
            }
            CharRole::StringEnd => {
                if let Some(open) = self.open.take() {
                    self.emit(open, pos, c);
                }
            }
            CharRole::StringAbort => self.open = None,
            CharRole::CommentStart => self.comment.clear(),
            CharRole::CommentContent => self.comment.push(c),
            CharRole::CommentEnd => self.close_comment(),
            CharRole::Directive => self.directive.push(c),
            CharRole::DirectiveEnd => self.close_directive(),
            CharRole::Code | CharRole::Delimiter | CharRole::Inert => {}
        }
    }

    fn emit(&mut self, open: OpenLiteral, close: ScanPosition, quote: char) {
        let content_start = open.content_start.unwrap_or(close);
        let token_end = close.advanced(quote);
        self.results.push(LiteralResult {
            value: self.rules.decode_literal(&open.raw, open.verbatim),
            span: SourceSpan::new(content_start, close),
            offset: content_start.offset,
            length: close.offset - content_start.offset,
            token_offset: open.token_start.offset,
            token_length: token_end.offset - open.token_start.offset,
            was_verbatim: open.verbatim,
            is_within_no_localize_region: self.regions.contains(&true),
            is_preceded_by_no_localize_comment: std::mem::take(&mut self.preceded_by_marker),
            context: self.context.clone(),
        });
    }

    fn close_comment(&mut self) {
        let text = self
            .comment
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '/' | '*' | '\''));
        if text == self.marker {
            self.preceded_by_marker = true;
        }
        self.comment.clear();
    }

    fn close_directive(&mut self) {
        match self.rules.parse_region_directive(&self.directive) {
            Some(RegionDirective::Start(name)) => self.regions.push(name == self.marker),
            Some(RegionDirective::End) => {
                self.regions.pop();
            }
            None => {}
        }
        self.directive.clear();
    }
}
