//! ASP.NET rules: page markup around `<% %>` code blocks in a host language.
//!
//! Only code inside `<% %>`, `<%= %>`, `<%: %>` and `<%# %>` is scanned with
//! the host rules. Markup, `<%@ %>` directives, `<%$ %>` expression builders
//! and `<%-- --%>` server comments are inert. `%>` ends a block from code or
//! comment state; inside a string it is ordinary text.

use crate::core::lang::state::{CharRole, LexState, Mode, RegionDirective, Window};
use crate::core::lang::{CSharpRules, LanguageRules, VbRules};
use crate::core::trie::CaseSensitivity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRules {
    CSharp(CSharpRules),
    VisualBasic(VbRules),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspNetRules {
    host: HostRules,
    /// Whole page (`true`) or a code block already cut out of one (`false`).
    start_in_markup: bool,
}

impl AspNetRules {
    pub fn csharp(start_in_markup: bool) -> Self {
        Self {
            host: HostRules::CSharp(CSharpRules),
            start_in_markup,
        }
    }

    pub fn visual_basic(start_in_markup: bool) -> Self {
        Self {
            host: HostRules::VisualBasic(VbRules),
            start_in_markup,
        }
    }

    pub fn host(&self) -> &dyn LanguageRules {
        match &self.host {
            HostRules::CSharp(rules) => rules,
            HostRules::VisualBasic(rules) => rules,
        }
    }

    fn classify_markup(&self, state: LexState, w: &Window<'_>) -> (LexState, CharRole) {
        if w.current() != '<' || w.next() != Some('%') {
            return (state, CharRole::Inert);
        }
        if w.lookahead_is("%--") {
            return (
                state.enter(Mode::ServerComment).consume(3),
                CharRole::CommentStart,
            );
        }
        match w.peek(2) {
            Some('@' | '$') => (state.enter(Mode::AspDirective).consume(2), CharRole::Inert),
            Some('=' | ':' | '#') => (state.enter(Mode::Code).consume(2), CharRole::Inert),
            _ => (state.enter(Mode::Code).consume(1), CharRole::Inert),
        }
    }
}

impl LanguageRules for AspNetRules {
    fn initial_state(&self) -> LexState {
        if self.start_in_markup {
            LexState::new(Mode::Markup)
        } else {
            self.host().initial_state()
        }
    }

    fn classify(&self, state: LexState, w: &Window<'_>) -> (LexState, CharRole) {
        if let Some(next) = state.take_pending() {
            return (next, CharRole::Delimiter);
        }
        let closes_block = w.current() == '%' && w.next() == Some('>');

        match state.mode {
            Mode::Markup => self.classify_markup(state, w),
            Mode::ServerComment if w.current() == '-' && w.lookahead_is("-%>") => (
                state.enter(Mode::Markup).consume(3),
                CharRole::CommentEnd,
            ),
            Mode::ServerComment => (state, CharRole::CommentContent),
            Mode::AspDirective if closes_block => {
                (state.enter(Mode::Markup).consume(1), CharRole::Inert)
            }
            Mode::AspDirective => (state, CharRole::Inert),
            Mode::String { .. } => self.host().classify(state, w),
            _ if closes_block => {
                let role = if state.inside_comment() {
                    CharRole::CommentEnd
                } else {
                    CharRole::Inert
                };
                (state.enter(Mode::Markup).consume(1), role)
            }
            _ => self.host().classify(state, w),
        }
    }

    fn decode_literal(&self, raw: &str, verbatim: bool) -> String {
        self.host().decode_literal(raw, verbatim)
    }

    fn encode_literal(&self, value: &str, verbatim: bool) -> String {
        self.host().encode_literal(value, verbatim)
    }

    fn is_identifier_char(&self, c: char) -> bool {
        self.host().is_identifier_char(c)
    }

    fn is_qualifier_char(&self, c: char) -> bool {
        self.host().is_qualifier_char(c)
    }

    fn is_qualifier_at(&self, window: &Window<'_>) -> bool {
        self.host().is_qualifier_at(window)
    }

    fn case_sensitivity(&self) -> CaseSensitivity {
        self.host().case_sensitivity()
    }

    fn allows_whitespace_around_member_access(&self) -> bool {
        self.host().allows_whitespace_around_member_access()
    }

    fn global_qualifier(&self) -> Option<&'static str> {
        self.host().global_qualifier()
    }

    fn parse_region_directive(&self, directive: &str) -> Option<RegionDirective> {
        self.host().parse_region_directive(directive)
    }

    fn concatenation_glue(&self, between: &str) -> Option<String> {
        self.host().concatenation_glue(between)
    }
}
