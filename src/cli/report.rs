//! Report formatting and printing utilities.
//!
//! Findings are shown in cargo style. Separate from the engine so vloc can
//! be used as a library.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::commands::{FileFindings, ScanOutcome, display_path};
use crate::core::literals::LiteralResult;
use crate::core::position::ScanPosition;
use crate::core::references::ReferenceResult;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print literal findings in cargo-style format to stdout.
pub fn print_literals(outcome: &ScanOutcome<LiteralResult>) {
    print_literals_to(outcome, &mut io::stdout().lock());
}

/// Print literal findings to a custom writer.
pub fn print_literals_to<W: Write>(outcome: &ScanOutcome<LiteralResult>, writer: &mut W) {
    let width = line_number_width(outcome, |literal: &LiteralResult| literal.span.start.line);

    for file in &outcome.files {
        let path = display_path(&file.path);
        for literal in &file.findings {
            let (label, caret) = if literal.is_localizable() {
                ("error".bold().red(), "^".red())
            } else {
                ("note".bold().green(), "^".green())
            };
            let rule = if literal.is_localizable() {
                "localizable-literal"
            } else {
                "no-localize"
            };
            let _ = writeln!(
                writer,
                "{}: \"{}\"  {}",
                label,
                escape_for_display(&literal.value),
                rule.dimmed().cyan()
            );
            print_location(writer, &path, file, literal.span.start, width, caret);
        }
    }

    let localizable = outcome
        .files
        .iter()
        .flat_map(|file| &file.findings)
        .filter(|literal| literal.is_localizable())
        .count();
    let checked = outcome.files.len();
    if localizable > 0 {
        let files = outcome
            .files
            .iter()
            .filter(|file| file.findings.iter().any(|l| l.is_localizable()))
            .count();
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} localizable {} in {} {} ({} checked)",
                localizable,
                plural(localizable, "literal", "literals"),
                files,
                plural(files, "file", "files"),
                checked
            )
            .red()
        );
    } else {
        print_success_to(checked, "no localizable literals found", writer);
    }
}

/// Print reference findings to stdout.
pub fn print_references(outcome: &ScanOutcome<ReferenceResult>) {
    print_references_to(outcome, &mut io::stdout().lock());
}

/// Print reference findings to a custom writer.
pub fn print_references_to<W: Write>(outcome: &ScanOutcome<ReferenceResult>, writer: &mut W) {
    let width = line_number_width(outcome, |reference: &ReferenceResult| reference.span.start.line);

    for file in &outcome.files {
        let path = display_path(&file.path);
        for reference in &file.findings {
            let _ = writeln!(
                writer,
                "{}: {} -> {}  {}",
                "reference".bold().cyan(),
                reference.matched_text,
                reference.entry.qualified_name().bold(),
                reference.entry.origin.to_string().dimmed()
            );
            print_location(
                writer,
                &path,
                file,
                reference.span.start,
                width,
                "^".cyan(),
            );
        }
    }

    let found = outcome.finding_count();
    let checked = outcome.files.len();
    if found > 0 {
        let files = outcome.files_with_findings();
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Found {} {} in {} {} ({} checked)",
                found,
                plural(found, "reference", "references"),
                files,
                plural(files, "file", "files"),
                checked
            )
            .green()
        );
    } else {
        print_success_to(checked, "no references found", writer);
    }
}

/// Print a warning about files that could not be scanned.
pub fn print_failures(failures: &[String], verbose: bool) {
    print_failures_to(failures, verbose, &mut io::stderr().lock());
}

/// Print a failure warning to a custom writer.
pub fn print_failures_to<W: Write>(failures: &[String], verbose: bool, writer: &mut W) {
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), failure);
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be scanned (use {} for details)",
            "warning:".bold().yellow(),
            failures.len(),
            "-v".cyan()
        );
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonLiteral<'a> {
    file: String,
    language: &'static str,
    line: usize,
    column: usize,
    value: &'a str,
    offset: usize,
    length: usize,
    was_verbatim: bool,
    localizable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReference<'a> {
    file: String,
    language: &'static str,
    line: usize,
    column: usize,
    #[serde(flatten)]
    reference: &'a ReferenceResult,
}

/// Print literal findings as a JSON array to stdout.
pub fn print_literals_json(outcome: &ScanOutcome<LiteralResult>) -> Result<()> {
    let json = literals_json(outcome)?;
    println!("{}", json);
    Ok(())
}

pub fn literals_json(outcome: &ScanOutcome<LiteralResult>) -> Result<String> {
    let items: Vec<JsonLiteral> = outcome
        .files
        .iter()
        .flat_map(|file| {
            let path = display_path(&file.path);
            file.findings.iter().map(move |literal| JsonLiteral {
                file: path.clone(),
                language: file.language.as_str(),
                line: literal.span.start.line,
                column: literal.span.start.column + 1,
                value: &literal.value,
                offset: literal.offset,
                length: literal.length,
                was_verbatim: literal.was_verbatim,
                localizable: literal.is_localizable(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&items).context("Failed to serialize literals")
}

/// Print reference findings as a JSON array to stdout.
pub fn print_references_json(outcome: &ScanOutcome<ReferenceResult>) -> Result<()> {
    let json = references_json(outcome)?;
    println!("{}", json);
    Ok(())
}

pub fn references_json(outcome: &ScanOutcome<ReferenceResult>) -> Result<String> {
    let items: Vec<JsonReference> = outcome
        .files
        .iter()
        .flat_map(|file| {
            let path = display_path(&file.path);
            file.findings.iter().map(move |reference| JsonReference {
                file: path.clone(),
                language: file.language.as_str(),
                line: reference.span.start.line,
                column: reference.span.start.column + 1,
                reference,
            })
        })
        .collect();
    serde_json::to_string_pretty(&items).context("Failed to serialize references")
}

// ============================================================
// Internal Functions
// ============================================================

fn print_success_to<W: Write>(checked: usize, what: &str, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - {}",
            checked,
            plural(checked, "file", "files"),
            what
        )
        .green()
    );
}

/// `--> path:line:col`, then the source line with a caret under `at`.
fn print_location<W: Write, T>(
    writer: &mut W,
    path: &str,
    file: &FileFindings<T>,
    at: ScanPosition,
    width: usize,
    caret: colored::ColoredString,
) {
    let col = at.column + 1;
    let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), path, at.line, col);

    let Some(source_line) = file.text.lines().nth(at.line.saturating_sub(1)) else {
        return;
    };
    let source_line = source_line.trim_end_matches('\r');

    let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = width);
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        at.line.to_string().blue(),
        "|".blue(),
        source_line,
        width = width
    );

    let prefix: String = source_line.chars().take(at.column).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret,
        width = width,
        padding = caret_padding
    );
}

fn line_number_width<T>(outcome: &ScanOutcome<T>, line: impl Fn(&T) -> usize) -> usize {
    outcome
        .files
        .iter()
        .flat_map(|file| file.findings.iter().map(&line))
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

/// Control characters of a decoded value, shown as escapes.
fn escape_for_display(value: &str) -> String {
    value.escape_debug().to_string()
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
