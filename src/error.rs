//! Errors returned by the scanning engine.
//!
//! Expected outcomes (unterminated literals, unresolved or ambiguous
//! references) are not errors; only broken inputs and invariant violations are.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("resource entry `{class_name}.{key}` has an empty {field}")]
    EmptyKey {
        field: &'static str,
        class_name: String,
        key: String,
    },

    #[error("reference `{text}` at {line}:{column} has no `.` separator")]
    MalformedReference {
        text: String,
        line: usize,
        column: usize,
    },
}
