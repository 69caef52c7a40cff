//! Lexical state threaded through the character classifiers.
//!
//! Classifiers are pure: they take a [`LexState`] and a [`Window`] over the
//! source and return the next state plus the [`CharRole`] of the current
//! character. The scanners drive them one character at a time.

/// What kind of text the scanner is currently inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Code,
    /// `// ...` (C#) or `' ...` / `Rem ...` (VB), up to the end of the line.
    LineComment,
    /// `/* ... */`, no nesting.
    BlockComment,
    /// A string literal. Verbatim strings use `""` for a quote and no backslash escapes.
    String { verbatim: bool },
    /// C# character literal such as `'"'`.
    CharLiteral,
    /// Preprocessor line (`#region`, `#If`, ...).
    Directive,
    /// ASP.NET page text outside `<% %>` blocks.
    Markup,
    /// ASP.NET `<%-- ... --%>`.
    ServerComment,
    /// ASP.NET `<%@ ... %>` and `<%$ ... %>`.
    AspDirective,
}

/// Classifier state. Updated functionally: every step returns a new value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LexState {
    pub mode: Mode,
    /// A backslash was seen inside a C# regular string or char literal.
    pub escape_pending: bool,
    /// The first quote of a doubled `""` inside a verbatim/VB string was seen.
    pub quote_pending: bool,
    /// Characters still to be consumed as part of a multi-character delimiter.
    pub pending: u8,
}

impl LexState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Switch to `mode`, clearing per-mode flags.
    pub fn enter(self, mode: Mode) -> Self {
        Self::new(mode)
    }

    /// Mark the next `count` characters as belonging to the delimiter just seen.
    pub fn consume(self, count: u8) -> Self {
        Self {
            pending: count,
            ..self
        }
    }

    /// If a delimiter is still being consumed, the state after consuming one more character.
    pub fn take_pending(self) -> Option<Self> {
        (self.pending > 0).then(|| Self {
            pending: self.pending - 1,
            ..self
        })
    }

    pub fn inside_comment(&self) -> bool {
        matches!(
            self.mode,
            Mode::LineComment | Mode::BlockComment | Mode::ServerComment
        )
    }

    pub fn inside_string(&self) -> bool {
        matches!(self.mode, Mode::String { .. })
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self.mode, Mode::String { verbatim: true })
    }

    /// The rest of the physical line is inert.
    pub fn skip_line(&self) -> bool {
        matches!(self.mode, Mode::LineComment | Mode::Directive)
    }

    pub fn in_markup(&self) -> bool {
        matches!(
            self.mode,
            Mode::Markup | Mode::ServerComment | Mode::AspDirective
        )
    }
}

/// Role of one character, as decided by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharRole {
    /// Ordinary program text; the only role references are matched in.
    Code,
    /// First character of a string literal token (`"` or the `@` of `@"`).
    StringStart,
    StringContent,
    /// The closing quote.
    StringEnd,
    /// The literal can no longer be valid (raw newline in a C# regular string).
    StringAbort,
    CommentStart,
    CommentContent,
    /// First character of the comment closer, or the newline ending a line comment.
    CommentEnd,
    Directive,
    DirectiveEnd,
    /// Trailing characters of a multi-character delimiter.
    Delimiter,
    /// Text that is neither code, string nor comment (char literals, markup).
    Inert,
}

/// `#region`-style directive recognized by a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionDirective {
    Start(String),
    End,
}

/// Lookback/lookahead view of the source around the current character.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    chars: &'a [char],
    index: usize,
}

impl<'a> Window<'a> {
    pub fn new(chars: &'a [char], index: usize) -> Self {
        debug_assert!(index < chars.len());
        Self { chars, index }
    }

    pub fn current(&self) -> char {
        self.chars[self.index]
    }

    pub fn prev(&self) -> Option<char> {
        self.index.checked_sub(1).map(|i| self.chars[i])
    }

    /// The window one character back.
    pub fn before(&self) -> Option<Self> {
        self.index.checked_sub(1).map(|index| Self {
            chars: self.chars,
            index,
        })
    }

    pub fn prev_prev(&self) -> Option<char> {
        self.index.checked_sub(2).map(|i| self.chars[i])
    }

    pub fn next(&self) -> Option<char> {
        self.peek(1)
    }

    /// Character `n` positions after the current one.
    pub fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    /// Whether the characters right after the current one spell `s`.
    pub fn lookahead_is(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek(i + 1) == Some(c))
    }

    /// First non-whitespace character after the current one.
    pub fn next_significant(&self) -> Option<char> {
        self.chars[self.index + 1..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }

    /// Only spaces and tabs stand between the start of the line (or fragment)
    /// and the current character.
    pub fn at_line_start(&self) -> bool {
        self.chars[..self.index]
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .all(|c| *c == ' ' || *c == '\t')
    }
}

#[cfg(test)]
mod tests {
    use crate::core::lang::state::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_pending_counts_down() {
        let state = LexState::new(Mode::BlockComment).consume(2);
        let once = state.take_pending().unwrap();
        assert_eq!(once.pending, 1);
        let twice = once.take_pending().unwrap();
        assert_eq!(twice.pending, 0);
        assert!(twice.take_pending().is_none());
        assert_eq!(twice.mode, Mode::BlockComment);
    }

    #[test]
    fn test_enter_clears_flags() {
        let state = LexState {
            mode: Mode::String { verbatim: true },
            quote_pending: true,
            ..LexState::default()
        };
        let next = state.enter(Mode::Code);
        assert_eq!(next, LexState::default());
    }

    #[test]
    fn test_state_accessors() {
        assert!(LexState::new(Mode::String { verbatim: true }).is_verbatim());
        assert!(LexState::new(Mode::String { verbatim: false }).inside_string());
        assert!(!LexState::new(Mode::String { verbatim: false }).is_verbatim());
        assert!(LexState::new(Mode::LineComment).skip_line());
        assert!(LexState::new(Mode::LineComment).inside_comment());
        assert!(LexState::new(Mode::ServerComment).in_markup());
        assert!(!LexState::new(Mode::Code).inside_comment());
    }

    #[test]
    fn test_window_lookaround() {
        let text = chars("ab\"\"c");
        let w = Window::new(&text, 2);
        assert_eq!(w.current(), '"');
        assert_eq!(w.prev(), Some('b'));
        assert_eq!(w.prev_prev(), Some('a'));
        assert_eq!(w.next(), Some('"'));
        assert!(w.lookahead_is("\"c"));
        assert!(!w.lookahead_is("\"cd"));
        assert_eq!(Window::new(&text, 0).prev(), None);
    }

    #[test]
    fn test_window_at_line_start() {
        let text = chars("x\n  \t#region");
        assert!(Window::new(&text, 5).at_line_start());
        assert!(!Window::new(&text, 7).at_line_start());
        assert!(Window::new(&text, 0).at_line_start());
    }

    #[test]
    fn test_window_next_significant() {
        let text = chars("a  \n . b");
        assert_eq!(Window::new(&text, 0).next_significant(), Some('.'));
        assert_eq!(Window::new(&text, 7).next_significant(), None);
    }
}
