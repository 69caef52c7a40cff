//! Per-language lexical rules.
//!
//! One generic scanning algorithm (see `core::literals` and
//! `core::references`) is parameterized by a [`LanguageRules`] implementation:
//!
//! - `csharp`: C# comments, regular/verbatim strings, char literals
//! - `vb`: Visual Basic comments (`'`, `Rem`), doubled-quote strings, concatenation glue
//! - `aspnet`: ASP.NET pages and code blocks hosting either language
//!
//! [`Rules`] is the closed set of implementations, dispatched with `enum_dispatch`.

pub mod aspnet;
pub mod csharp;
pub mod state;
pub mod vb;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

pub use aspnet::AspNetRules;
pub use csharp::CSharpRules;
pub use state::{CharRole, LexState, Mode, RegionDirective, Window};
pub use vb::VbRules;

use crate::core::trie::CaseSensitivity;

/// Capability interface injected into the scanners.
#[enum_dispatch]
pub trait LanguageRules {
    /// State at the first character of a fragment.
    fn initial_state(&self) -> LexState {
        LexState::default()
    }

    /// Classify the current character and return the state for the next one.
    ///
    /// Never fails: unterminated strings or comments simply leave the state open.
    fn classify(&self, state: LexState, window: &Window<'_>) -> (LexState, CharRole);

    /// Turn the raw text between a literal's delimiters into its value.
    fn decode_literal(&self, raw: &str, verbatim: bool) -> String;

    /// Inverse of [`LanguageRules::decode_literal`].
    fn encode_literal(&self, value: &str, verbatim: bool) -> String;

    fn is_identifier_char(&self, c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    /// Characters joining the parts of a qualified name (`.` and, for C#, `::`).
    fn is_qualifier_char(&self, c: char) -> bool {
        c == '.'
    }

    /// Whether the current character joins qualified-name parts where it
    /// stands. Only needed when a qualifier character also has other uses.
    fn is_qualifier_at(&self, window: &Window<'_>) -> bool {
        self.is_qualifier_char(window.current())
    }

    fn case_sensitivity(&self) -> CaseSensitivity {
        CaseSensitivity::Sensitive
    }

    /// Whether `Foo . Bar` is the same member access as `Foo.Bar`.
    fn allows_whitespace_around_member_access(&self) -> bool {
        false
    }

    /// Qualifier that anchors a name at the global namespace (`global::`).
    fn global_qualifier(&self) -> Option<&'static str> {
        None
    }

    /// Recognize a `#region`-style directive line.
    fn parse_region_directive(&self, directive: &str) -> Option<RegionDirective>;

    /// Decoded text of the expression between two adjacent literals, when
    /// that expression is a statically known concatenation.
    fn concatenation_glue(&self, _between: &str) -> Option<String> {
        None
    }
}

/// All supported rule sets.
#[enum_dispatch(LanguageRules)]
#[derive(Debug, Clone)]
pub enum Rules {
    CSharp(CSharpRules),
    VisualBasic(VbRules),
    AspNet(AspNetRules),
}

/// Source language of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "csharp")]
    CSharp,
    #[serde(rename = "vb")]
    VisualBasic,
    #[serde(rename = "aspnet-csharp")]
    AspNetCSharp,
    #[serde(rename = "aspnet-vb")]
    AspNetVisualBasic,
}

impl Language {
    /// Guess the language from a file extension. ASP.NET files default to a C#
    /// host; callers that can read the page directive refine it with
    /// [`Language::with_host`].
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "cs" => Some(Language::CSharp),
            "vb" => Some(Language::VisualBasic),
            "aspx" | "ascx" | "asax" | "asmx" | "ashx" | "master" => Some(Language::AspNetCSharp),
            _ => None,
        }
    }

    /// ASP.NET variant hosting `host`'s code; non-ASP.NET languages are returned unchanged.
    pub fn with_host(self, host: Language) -> Self {
        match (self.is_aspnet(), host.is_visual_basic()) {
            (true, true) => Language::AspNetVisualBasic,
            (true, false) => Language::AspNetCSharp,
            (false, _) => self,
        }
    }

    pub fn is_aspnet(self) -> bool {
        matches!(self, Language::AspNetCSharp | Language::AspNetVisualBasic)
    }

    pub fn is_visual_basic(self) -> bool {
        matches!(self, Language::VisualBasic | Language::AspNetVisualBasic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::VisualBasic => "vb",
            Language::AspNetCSharp => "aspnet-csharp",
            Language::AspNetVisualBasic => "aspnet-vb",
        }
    }

    /// Rules for this language. `start_in_markup` only matters for ASP.NET:
    /// `true` for a whole page, `false` for an extracted code block.
    pub fn rules(self, start_in_markup: bool) -> Rules {
        match self {
            Language::CSharp => CSharpRules.into(),
            Language::VisualBasic => VbRules.into(),
            Language::AspNetCSharp => AspNetRules::csharp(start_in_markup).into(),
            Language::AspNetVisualBasic => AspNetRules::visual_basic(start_in_markup).into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
