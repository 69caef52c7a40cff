//! Resource-reference scanner.
//!
//! Finds uses of known resource entries (`Resources.Title`,
//! `NsA.Form.Key1`, `My.Resources.Greeting`) in code. Only characters the
//! language rules classify as code take part: references inside strings,
//! comments, directives or markup are never reported.
//!
//! The scanner keeps a "chain" of the identifier and qualifier characters of
//! the name currently being read and steps the reference trie with each of
//! them. When the name cannot grow any further, the longest registered key
//! ending there that starts on a name boundary is resolved against the
//! namespace context (see [`resolve`]). Matches that do not resolve to exactly
//! one entry are dropped.

pub mod resolve;

use serde::Serialize;

pub use resolve::{NamespaceContext, resolve};

use crate::core::lang::{CharRole, LanguageRules, Window};
use crate::core::position::{ScanPosition, SourceSpan};
use crate::core::resources::{ReferenceTrie, ResourceEntry, ResourceId};
use crate::core::trie::NodeId;
use crate::error::ScanError;

/// A resolved reference to a resource entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResult {
    /// Source text of the whole reference, qualifier and whitespace included.
    pub matched_text: String,
    pub span: SourceSpan,
    pub offset: usize,
    pub length: usize,
    pub entry: ResourceEntry,
    /// Qualifier written before `ClassName.Key`, if any.
    pub prefix: Option<String>,
}

/// Scan `text`, which starts at `start` in its file, for references to the
/// entries in `trie`.
///
/// Fails only when the trie holds a key without a `.` separator, which no
/// `ClassName.Key` reference can have.
pub fn scan_references(
    text: &str,
    start: ScanPosition,
    trie: &ReferenceTrie,
    rules: &(impl LanguageRules + ?Sized),
    context: &NamespaceContext,
    preferred_origin: Option<&ResourceId>,
) -> Result<Vec<ReferenceResult>, ScanError> {
    let mut scanner = ReferenceScanner {
        text,
        start,
        trie,
        rules,
        context,
        preferred_origin,
        node: trie.root(),
        chain: None,
        last_code_char: None,
        results: Vec::new(),
    };

    let chars: Vec<char> = text.chars().collect();
    let mut state = rules.initial_state();
    let mut pos = start;
    for (i, c) in chars.iter().copied().enumerate() {
        let window = Window::new(&chars, i);
        let (next, role) = rules.classify(state, &window);
        scanner.apply(role, &window, pos)?;
        state = next;
        pos.advance(c);
    }

    Ok(scanner.results)
}

/// The qualified name being read.
struct Chain {
    /// Name characters, whitespace left out.
    chars: Vec<char>,
    /// Position of each entry of `chars`.
    positions: Vec<ScanPosition>,
    /// A reference was already reported for this name.
    reported: bool,
}

impl Chain {
    fn start(&self) -> ScanPosition {
        self.positions[0]
    }
}

struct ReferenceScanner<'a, R: ?Sized> {
    text: &'a str,
    start: ScanPosition,
    trie: &'a ReferenceTrie,
    rules: &'a R,
    context: &'a NamespaceContext,
    preferred_origin: Option<&'a ResourceId>,
    node: NodeId,
    chain: Option<Chain>,
    /// Last non-whitespace code character; cleared by strings, comments
    /// and markup.
    last_code_char: Option<char>,
    results: Vec<ReferenceResult>,
}

impl<R: LanguageRules + ?Sized> ReferenceScanner<'_, R> {
    fn apply(&mut self, role: CharRole, w: &Window<'_>, pos: ScanPosition) -> Result<(), ScanError> {
        let c = w.current();
        let before = self.last_code_char;
        self.last_code_char = match role {
            CharRole::Code if c.is_whitespace() => before,
            CharRole::Code => Some(c),
            _ => None,
        };
        if role != CharRole::Code {
            self.reset();
            return Ok(());
        }

        let is_name_char = self.rules.is_identifier_char(c)
            || (self.chain.is_some() && self.rules.is_qualifier_at(w));
        if is_name_char {
            if self.chain.is_none() {
                if self.continues_other_name(w, before) {
                    return Ok(());
                }
                self.chain = Some(Chain {
                    chars: Vec::new(),
                    positions: Vec::new(),
                    reported: false,
                });
            }
            self.node = self.trie.step(self.node, c);
            if let Some(chain) = &mut self.chain {
                chain.chars.push(c);
                chain.positions.push(pos);
            }
            if !w.next().is_some_and(|n| self.rules.is_identifier_char(n)) {
                self.try_report(pos.advanced(c))?;
            }
        } else if !(c.is_whitespace() && self.whitespace_continues_chain(w)) {
            self.reset();
        }
        Ok(())
    }

    /// `obj().Form.Key1`, `x1Form.Key1`, `obj. Form.Key1`: the name at `w`
    /// is a member of something else, not the start of a reference.
    fn continues_other_name(&self, w: &Window<'_>, last_code_char: Option<char>) -> bool {
        if w.before().is_some_and(|p| {
            self.rules.is_identifier_char(p.current()) || self.rules.is_qualifier_at(&p)
        }) {
            return true;
        }
        self.rules.allows_whitespace_around_member_access()
            && w.prev().is_some_and(char::is_whitespace)
            && last_code_char == Some('.')
    }

    /// `Resources . Title`: whitespace on either side of a member access dot.
    fn whitespace_continues_chain(&self, w: &Window<'_>) -> bool {
        let Some(chain) = &self.chain else {
            return false;
        };
        if !self.rules.allows_whitespace_around_member_access()
            || !self.trie.node(self.node).can_be_followed_by_whitespace()
        {
            return false;
        }
        chain.chars.last() == Some(&'.') || w.next_significant() == Some('.')
    }

    fn reset(&mut self) {
        self.chain = None;
        self.node = self.trie.root();
    }

    fn try_report(&mut self, end: ScanPosition) -> Result<(), ScanError> {
        let Some(chain) = &self.chain else {
            return Ok(());
        };
        if chain.reported {
            return Ok(());
        }

        let trie = self.trie;
        for id in trie.matches_ending_at(self.node) {
            let node = trie.node(id);
            let Some(word) = node.word() else {
                continue;
            };
            let word_len = word.chars().count();
            let Some(match_start) = chain.chars.len().checked_sub(word_len) else {
                continue;
            };
            if match_start > 0 && !self.rules.is_qualifier_char(chain.chars[match_start - 1]) {
                continue;
            }
            if !word.contains('.') {
                let at = chain.positions[match_start];
                return Err(ScanError::MalformedReference {
                    text: word.to_string(),
                    line: at.line,
                    column: at.column,
                });
            }

            let prefix: String = chain.chars[..match_start].iter().collect();
            let prefix = prefix.trim_end_matches(|c: char| self.rules.is_qualifier_char(c));
            let prefix = (!prefix.is_empty()).then_some(prefix);

            let resolved = resolve(
                node.infos(),
                prefix,
                self.context,
                self.preferred_origin,
                self.rules,
            );
            let Some(entry) = resolved else {
                tracing::debug!(
                    reference = word,
                    prefix = prefix.unwrap_or_default(),
                    line = chain.start().line,
                    candidates = node.infos().len(),
                    "dropping unresolved reference"
                );
                continue;
            };

            let result = self.result(chain, end, entry.clone(), prefix.map(str::to_string));
            self.results.push(result);
            if let Some(chain) = &mut self.chain {
                chain.reported = true;
            }
            break;
        }
        Ok(())
    }

    fn result(
        &self,
        chain: &Chain,
        end: ScanPosition,
        entry: ResourceEntry,
        prefix: Option<String>,
    ) -> ReferenceResult {
        let start = chain.start();
        let from = start.offset - self.start.offset;
        let to = end.offset - self.start.offset;
        ReferenceResult {
            matched_text: self.text[from..to].to_string(),
            span: SourceSpan::new(start, end),
            offset: start.offset,
            length: end.offset - start.offset,
            entry,
            prefix,
        }
    }
}
