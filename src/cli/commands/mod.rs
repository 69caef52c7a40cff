//! Command implementations.
//!
//! The scan commands share one pipeline: load config, collect files, read
//! and scan them in parallel, then hand per-file findings to `report`.

pub mod init;
pub mod literals;
pub mod references;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::args::CommonArgs;
use super::files::{LoadedFile, SourceFile, collect_files, read_files};
use crate::config::{Config, load_config};
use crate::core::lang::Language;

/// Findings of one scanned file.
#[derive(Debug)]
pub struct FileFindings<T> {
    pub path: PathBuf,
    pub language: Language,
    pub text: String,
    pub findings: Vec<T>,
}

/// Result of a scan command, before reporting.
#[derive(Debug)]
pub struct ScanOutcome<T> {
    /// Scanned files in collection order, including files without findings.
    pub files: Vec<FileFindings<T>>,
    /// Files that could not be read or scanned.
    pub failures: Vec<String>,
    /// Paths skipped while collecting (unknown language, unreadable directory).
    pub skipped_count: usize,
}

impl<T> ScanOutcome<T> {
    pub fn finding_count(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }

    pub fn files_with_findings(&self) -> usize {
        self.files.iter().filter(|f| !f.findings.is_empty()).count()
    }
}

/// Config and file list for a scan command.
pub struct Prepared {
    pub config: Config,
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
}

pub fn prepare(common: &CommonArgs) -> Result<Prepared> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd)?.config;
    let collected = collect_files(
        &common.paths_or_cwd(),
        &config.ignore_patterns(),
        common.lang.map(Language::from),
        common.verbose,
    )?;
    Ok(Prepared {
        config,
        files: collected.files,
        skipped_count: collected.skipped_count,
    })
}

/// Read and scan every file in parallel with `scan`.
pub fn scan_all<T, F>(files: Vec<SourceFile>, skipped_count: usize, scan: F) -> ScanOutcome<T>
where
    T: Send,
    F: Fn(&LoadedFile) -> Result<Vec<T>> + Sync,
{
    let results: Vec<Result<FileFindings<T>>> = read_files(files)
        .into_par_iter()
        .map(|loaded| {
            let loaded = loaded?;
            let findings = scan(&loaded)
                .with_context(|| format!("Failed to scan {}", loaded.file.path.display()))?;
            Ok(FileFindings {
                path: loaded.file.path,
                language: loaded.file.language,
                text: loaded.text,
                findings,
            })
        })
        .collect();

    let mut outcome = ScanOutcome {
        files: Vec::new(),
        failures: Vec::new(),
        skipped_count,
    };
    for result in results {
        match result {
            Ok(file) => outcome.files.push(file),
            Err(err) => outcome.failures.push(format!("{:#}", err)),
        }
    }
    outcome
}

/// Path as shown in reports: relative to the working directory when possible.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf());
    let shown = relative.to_string_lossy();
    shown.strip_prefix("./").unwrap_or(&shown).to_string()
}
