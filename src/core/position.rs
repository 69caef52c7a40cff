//! Source positions tracked by the scanners.
//!
//! Lines and columns are whatever base the caller starts from; the scanners
//! only ever move forward. Offsets are absolute UTF-8 byte offsets so callers
//! can slice the original text directly. Columns count characters.

use serde::Serialize;

/// A point in the source text: line, column and absolute byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScanPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl ScanPosition {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Move past `c`. A newline bumps the line and resets the column to 0.
    pub fn advance(&mut self, c: char) {
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Copy of this position moved past `c`.
    pub fn advanced(mut self, c: char) -> Self {
        self.advance(c);
        self
    }
}

/// Half-open span between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub start: ScanPosition,
    pub end: ScanPosition,
}

impl SourceSpan {
    pub fn new(start: ScanPosition, end: ScanPosition) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
