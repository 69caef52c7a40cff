use anyhow::{Result, bail};

use super::super::args::{LiteralsCommand, OutputFormat};
use super::super::exit_status::ExitStatus;
use super::super::report;
use super::{prepare, scan_all};
use crate::core::literals::{LiteralResult, scan_literals};
use crate::core::position::ScanPosition;

pub fn literals(cmd: LiteralsCommand) -> Result<ExitStatus> {
    let prepared = prepare(&cmd.common)?;

    let mut options = prepared.config.scan_options();
    if let Some(marker) = cmd.marker {
        if marker.trim().is_empty() {
            bail!("--marker must not be empty");
        }
        options.no_localize_marker = marker;
    }
    if cmd.no_merge {
        options.merge_concatenations = false;
    }
    let start_in_markup = prepared.config.asp_net_start_in_markup;
    let show_all = cmd.all;

    let outcome = scan_all(prepared.files, prepared.skipped_count, |file| {
        let rules = file.file.language.rules(start_in_markup);
        let found: Vec<LiteralResult> =
            scan_literals(&file.text, ScanPosition::new(1, 0, 0), &rules, &options);
        Ok(found
            .into_iter()
            .filter(|literal| show_all || literal.is_localizable())
            .collect())
    });

    match cmd.common.format {
        OutputFormat::Text => report::print_literals(&outcome),
        OutputFormat::Json => report::print_literals_json(&outcome)?,
    }
    report::print_failures(&outcome.failures, cmd.common.verbose);

    let localizable = outcome
        .files
        .iter()
        .flat_map(|file| &file.findings)
        .filter(|literal| literal.is_localizable())
        .count();
    Ok(ExitStatus::for_localizable(localizable))
}
