//! Source file discovery and reading.
//!
//! Each file is one scan fragment starting at line 1, column 0, offset 0.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use rayon::prelude::*;
use regex::Regex;
use walkdir::WalkDir;

use crate::core::lang::Language;

/// `<%@ Page Language="VB" %>` (also `Control`, `Master`, ...).
static PAGE_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<%@\s*\w+\b[^>]*?\bLanguage\s*=\s*["']?(visualbasic|vb|csharp|c#|cs)"#)
        .expect("valid page language regex")
});

/// A file selected for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
}

/// Result of collecting files.
pub struct CollectResult {
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
}

/// Expand `paths` (files or directories) into the files to scan.
///
/// Directories are walked recursively; only files with a known extension
/// that match none of `ignores` are kept. Files named explicitly are kept
/// whenever their language is known (`forced` or from the extension).
pub fn collect_files(
    paths: &[PathBuf],
    ignores: &[Pattern],
    forced: Option<Language>,
    verbose: bool,
) -> Result<CollectResult> {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    for root in paths {
        if root.is_file() {
            match forced.or_else(|| language_of(root)) {
                Some(language) => files.push(SourceFile {
                    path: root.clone(),
                    language,
                }),
                None => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!(
                            "{} Unknown language, skipping: {}",
                            "warning:".bold().yellow(),
                            root.display()
                        );
                    }
                }
            }
            continue;
        }
        if !root.exists() {
            anyhow::bail!("Path does not exist: {}", root.display());
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || is_ignored(path, ignores) {
                continue;
            }
            if let Some(language) = language_of(path).map(|detected| forced.unwrap_or(detected)) {
                files.push(SourceFile {
                    path: path.to_path_buf(),
                    language,
                });
            }
        }
    }

    tracing::debug!(count = files.len(), skipped = skipped_count, "collected files");
    Ok(CollectResult {
        files,
        skipped_count,
    })
}

fn language_of(path: &Path) -> Option<Language> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
}

fn is_ignored(path: &Path, ignores: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    ignores.iter().any(|p| p.matches(&path_str))
}

/// Refine an ASP.NET language from the page directive in `text`.
pub fn detect_page_language(language: Language, text: &str) -> Language {
    if !language.is_aspnet() {
        return language;
    }
    match PAGE_LANGUAGE.captures(text) {
        Some(caps) if caps[1].to_ascii_lowercase().starts_with('v') => {
            language.with_host(Language::VisualBasic)
        }
        Some(_) => language.with_host(Language::CSharp),
        None => language,
    }
}

/// A file's text, with its ASP.NET host language resolved.
pub struct LoadedFile {
    pub file: SourceFile,
    pub text: String,
}

/// Read every file in parallel; unreadable files come back as errors.
pub fn read_files(files: Vec<SourceFile>) -> Vec<Result<LoadedFile>> {
    files
        .into_par_iter()
        .map(|file| {
            let text = fs::read_to_string(&file.path)
                .with_context(|| format!("Failed to read file: {}", file.path.display()))?;
            let language = detect_page_language(file.language, &text);
            Ok(LoadedFile {
                file: SourceFile { language, ..file },
                text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn names(result: &CollectResult) -> Vec<String> {
        result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_collects_known_extensions() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("Form1.vb")).unwrap();
        File::create(dir.path().join("Program.cs")).unwrap();
        File::create(dir.path().join("Default.aspx")).unwrap();
        File::create(dir.path().join("App.config")).unwrap();

        let result = collect_files(&[dir.path().to_path_buf()], &[], None, false).unwrap();
        assert_eq!(names(&result), vec!["Default.aspx", "Form1.vb", "Program.cs"]);
        assert_eq!(result.files[1].language, Language::VisualBasic);
    }

    #[test]
    fn test_ignores_apply_inside_directories() {
        let dir = tempdir().unwrap();
        let obj = dir.path().join("obj");
        fs::create_dir(&obj).unwrap();
        File::create(obj.join("Temp.cs")).unwrap();
        File::create(dir.path().join("Program.cs")).unwrap();

        let ignores = vec![Pattern::new("**/obj/**").unwrap()];
        let result = collect_files(&[dir.path().to_path_buf()], &ignores, None, false).unwrap();
        assert_eq!(names(&result), vec!["Program.cs"]);
    }

    #[test]
    fn test_explicit_file_with_forced_language() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snippet.txt");
        File::create(&path).unwrap();

        let result = collect_files(&[path.clone()], &[], None, false).unwrap();
        assert!(result.files.is_empty());
        assert_eq!(result.skipped_count, 1);

        let result = collect_files(&[path], &[], Some(Language::VisualBasic), false).unwrap();
        assert_eq!(result.files[0].language, Language::VisualBasic);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect_files(&[missing], &[], None, false).is_err());
    }

    #[test]
    fn test_detect_page_language() {
        let vb = r#"<%@ Page Language="VB" AutoEventWireup="false" %>"#;
        let cs = r#"<%@ Control Language="C#" %>"#;
        assert_eq!(
            detect_page_language(Language::AspNetCSharp, vb),
            Language::AspNetVisualBasic
        );
        assert_eq!(
            detect_page_language(Language::AspNetVisualBasic, cs),
            Language::AspNetCSharp
        );
        assert_eq!(
            detect_page_language(Language::AspNetCSharp, "<p>no directive</p>"),
            Language::AspNetCSharp
        );
        assert_eq!(
            detect_page_language(Language::CSharp, vb),
            Language::CSharp
        );
    }

    #[test]
    fn test_read_files_resolves_host() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Default.aspx");
        fs::write(&path, "<%@ Page Language=\"VB\" %>\n<%= \"Hi\" %>").unwrap();

        let loaded = read_files(vec![SourceFile {
            path,
            language: Language::AspNetCSharp,
        }]);
        let loaded = loaded.into_iter().next().unwrap().unwrap();
        assert_eq!(loaded.file.language, Language::AspNetVisualBasic);
    }
}
