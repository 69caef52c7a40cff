//! Concatenation merge pass.
//!
//! After a fragment is scanned, adjacent literals joined only by statically
//! known glue (VB: `"Hello " & vbCrLf & "World"`) are folded into one logical
//! literal. What counts as glue is decided by
//! [`LanguageRules::concatenation_glue`]; languages without glue rules keep
//! every literal separate.

use crate::core::lang::LanguageRules;
use crate::core::literals::LiteralResult;
use crate::core::position::ScanPosition;

/// Merge adjacent results of one fragment in place.
///
/// `text` and `start` must be the same fragment and start position the
/// results were scanned from. When the text between two literals is not
/// recognized glue, both literals are kept untouched.
pub fn merge_adjacent<T>(
    text: &str,
    start: ScanPosition,
    rules: &(impl LanguageRules + ?Sized),
    results: &mut Vec<LiteralResult<T>>,
) {
    let mut i = 0;
    while i + 1 < results.len() {
        let glue = text_between(text, start, &results[i], &results[i + 1])
            .and_then(|between| rules.concatenation_glue(between));

        match glue {
            Some(glue) => {
                let next = results.remove(i + 1);
                absorb(&mut results[i], &glue, next);
                // Stay on `i`: the extended literal may merge with the one after.
            }
            None => i += 1,
        }
    }
}

fn text_between<'t, T>(
    text: &'t str,
    start: ScanPosition,
    first: &LiteralResult<T>,
    second: &LiteralResult<T>,
) -> Option<&'t str> {
    let from = first.token_end().checked_sub(start.offset)?;
    let to = second.token_offset.checked_sub(start.offset)?;
    text.get(from..to)
}

fn absorb<T>(target: &mut LiteralResult<T>, glue: &str, next: LiteralResult<T>) {
    tracing::trace!(
        line = target.span.start.line,
        glue_len = glue.len(),
        "merging concatenated literals"
    );
    target.value.push_str(glue);
    target.value.push_str(&next.value);
    target.span.end = next.span.end;
    target.length = next.span.end.offset - target.offset;
    target.token_length = next.token_end() - target.token_offset;
    target.is_within_no_localize_region |= next.is_within_no_localize_region;
}

#[cfg(test)]
mod tests {
    use crate::core::lang::{CSharpRules, VbRules};
    use crate::core::literals::{ScanOptions, scan_literals};
    use crate::core::merge::*;
    use pretty_assertions::assert_eq;

    fn scan_unmerged(text: &str, rules: &impl LanguageRules) -> Vec<LiteralResult> {
        let options = ScanOptions {
            merge_concatenations: false,
            ..ScanOptions::default()
        };
        scan_literals(text, ScanPosition::new(1, 0, 0), rules, &options)
    }

    fn merged(text: &str) -> Vec<LiteralResult> {
        let mut results = scan_unmerged(text, &VbRules);
        merge_adjacent(text, ScanPosition::new(1, 0, 0), &VbRules, &mut results);
        results
    }

    #[test]
    fn test_merge_through_control_constant() {
        let text = "s = \"A\" & vbCrLf & \"B\"";
        let results = merged(text);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "A\r\nB");
        assert_eq!(results[0].offset, 5);
        assert_eq!(results[0].token_offset, 4);
        assert_eq!(results[0].token_end(), text.len());
        assert_eq!(results[0].span.end.offset, text.len() - 1);
        assert_eq!(results[0].length, text.len() - 1 - 5);
    }

    #[test]
    fn test_unknown_glue_blocks_merge() {
        let results = merged("s = \"A\" & SomeFunc() & \"B\"");
        let found: Vec<&str> = results.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(found, vec!["A", "B"]);
    }

    #[test]
    fn test_merge_chains_across_several_literals() {
        let text = "s = \"a\" & \"b\" & vbTab & _\n    \"c\" & x & \"d\"";
        let results = merged(text);
        let found: Vec<&str> = results.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(found, vec!["ab\tc", "d"]);
        assert_eq!(results[0].span.end.line, 2);
    }

    #[test]
    fn test_separate_statements_are_not_merged() {
        let results = merged("a = \"x\"\nb = \"y\"");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_csharp_never_merges() {
        let text = "s = \"a\" + \"b\";";
        let mut results = scan_unmerged(text, &CSharpRules);
        merge_adjacent(text, ScanPosition::new(1, 0, 0), &CSharpRules, &mut results);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_merge_respects_start_offset() {
        let text = "\"A\" & vbLf & \"B\"";
        let start = ScanPosition::new(3, 8, 120);
        let options = ScanOptions {
            merge_concatenations: false,
            ..ScanOptions::default()
        };
        let mut results = scan_literals(text, start, &VbRules, &options);
        merge_adjacent(text, start, &VbRules, &mut results);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "A\nB");
        assert_eq!(results[0].token_offset, 120);
    }
}
