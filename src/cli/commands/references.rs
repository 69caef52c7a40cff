use std::{fs, path::Path, sync::LazyLock};

use anyhow::{Context, Result};
use regex::Regex;

use super::super::args::{OutputFormat, ReferencesCommand};
use super::super::exit_status::ExitStatus;
use super::super::report;
use super::{prepare, scan_all};
use crate::core::lang::{Language, LanguageRules};
use crate::core::position::ScanPosition;
use crate::core::references::{NamespaceContext, scan_references};
use crate::core::resources::{ReferenceTrie, ResourceEntry, ResourceId, build_trie};
use crate::core::trie::CaseSensitivity;

static CS_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*namespace\s+([\w.]+)").expect("valid namespace regex")
});
static CS_USING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?([\w.]+)\s*;")
        .expect("valid using regex")
});
static CS_USING_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:global\s+)?using\s+(\w+)\s*=\s*([\w.]+)\s*;")
        .expect("valid using alias regex")
});
static VB_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*Namespace[ \t]+([\w.]+)").expect("valid namespace regex")
});
static VB_IMPORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*Imports[ \t]+([\w.]+)[ \t]*\r?$").expect("valid imports regex")
});
static VB_IMPORTS_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*Imports[ \t]+(\w+)[ \t]*=[ \t]*([\w.]+)")
        .expect("valid imports alias regex")
});

/// Reference tries for case-sensitive (C#) and case-insensitive (VB) code.
struct Tries {
    sensitive: ReferenceTrie,
    insensitive: ReferenceTrie,
}

impl Tries {
    fn build(entries: Vec<ResourceEntry>) -> Result<Self> {
        Ok(Self {
            sensitive: build_trie(entries.clone(), CaseSensitivity::Sensitive)?,
            insensitive: build_trie(entries, CaseSensitivity::Insensitive)?,
        })
    }

    fn for_case(&self, case: CaseSensitivity) -> &ReferenceTrie {
        match case {
            CaseSensitivity::Sensitive => &self.sensitive,
            CaseSensitivity::Insensitive => &self.insensitive,
        }
    }
}

pub fn references(cmd: ReferencesCommand) -> Result<ExitStatus> {
    let prepared = prepare(&cmd.common)?;
    let tries = Tries::build(load_entries(&cmd.resources)?)?;

    let base = NamespaceContext {
        namespace: cmd.namespace.clone().unwrap_or_default(),
        imports: cmd.imports.clone(),
        aliases: cmd.aliases.iter().cloned().collect(),
        root_namespace: cmd
            .root_namespace
            .clone()
            .or_else(|| prepared.config.root_namespace.clone()),
    };
    let preferred = cmd
        .preferred_origin
        .as_deref()
        .map(ResourceId::from)
        .or_else(|| prepared.config.preferred_origin());
    let start_in_markup = prepared.config.asp_net_start_in_markup;
    let namespace_given = cmd.namespace.is_some();

    let outcome = scan_all(prepared.files, prepared.skipped_count, |file| {
        let rules = file.file.language.rules(start_in_markup);
        let context = file_context(&base, &file.text, file.file.language, namespace_given);
        let trie = tries.for_case(rules.case_sensitivity());
        let found = scan_references(
            &file.text,
            ScanPosition::new(1, 0, 0),
            trie,
            &rules,
            &context,
            preferred.as_ref(),
        )?;
        Ok(found)
    });

    match cmd.common.format {
        OutputFormat::Text => report::print_references(&outcome),
        OutputFormat::Json => report::print_references_json(&outcome)?,
    }
    report::print_failures(&outcome.failures, cmd.common.verbose);

    Ok(ExitStatus::Success)
}

/// Read the resource entries file: a JSON array of entries.
pub fn load_entries(path: &Path) -> Result<Vec<ResourceEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read resource entries: {}", path.display()))?;
    let entries: Vec<ResourceEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse resource entries: {}", path.display()))?;
    tracing::debug!(count = entries.len(), path = %path.display(), "loaded resource entries");
    Ok(entries)
}

/// Namespace context of one file: `base` plus the file's own namespace
/// declaration, imports and aliases.
///
/// Only the first namespace declared in the file is used.
pub fn file_context(
    base: &NamespaceContext,
    text: &str,
    language: Language,
    namespace_given: bool,
) -> NamespaceContext {
    let (namespace, imports, aliases) = if language.is_visual_basic() {
        (&*VB_NAMESPACE, &*VB_IMPORTS, &*VB_IMPORTS_ALIAS)
    } else {
        (&*CS_NAMESPACE, &*CS_USING, &*CS_USING_ALIAS)
    };

    let mut context = base.clone();
    if !namespace_given && let Some(caps) = namespace.captures(text) {
        context.namespace = caps[1].to_string();
    }
    for caps in imports.captures_iter(text) {
        let import = caps[1].to_string();
        if !context.imports.contains(&import) {
            context.imports.push(import);
        }
    }
    for caps in aliases.captures_iter(text) {
        context
            .aliases
            .entry(caps[1].to_string())
            .or_insert_with(|| caps[2].to_string());
    }
    context
}
