//! Scanning engine.
//!
//! Pure functions over one code fragment at a time: no file I/O, no global
//! state. Callers (the CLI, or any other code-model walker) hand in the
//! fragment text with its start position and get positioned results back.
//!
//! - `position`: line/column/offset tracking
//! - `trie`: keyword trie with failure links for multi-pattern matching
//! - `lang`: per-language lexical rules (C#, VB, ASP.NET)
//! - `literals`: string-literal scanner
//! - `merge`: VB concatenation merge pass
//! - `resources`: resource entries and the reference trie
//! - `references`: resource-reference scanner and namespace resolution

pub mod lang;
pub mod literals;
pub mod merge;
pub mod position;
pub mod references;
pub mod resources;
pub mod trie;

pub use lang::{Language, LanguageRules, Rules};
pub use literals::{LiteralResult, ScanOptions, scan_literals, scan_literals_with_context};
pub use position::{ScanPosition, SourceSpan};
pub use references::{NamespaceContext, ReferenceResult, scan_references};
pub use resources::{ReferenceTrie, ResourceEntry, ResourceId, build_trie};
pub use trie::{CaseSensitivity, Trie, TrieBuilder};
