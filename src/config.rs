use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::literals::{DEFAULT_NO_LOCALIZE_MARKER, ScanOptions};
use crate::core::resources::ResourceId;

pub const CONFIG_FILE_NAME: &str = ".vlocrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_no_localize_marker")]
    pub no_localize_marker: String,
    #[serde(default = "default_merge_concatenations")]
    pub merge_concatenations: bool,
    /// Scan ASP.NET files as whole pages (markup first) rather than bare code blocks.
    #[serde(default = "default_aspnet_start_in_markup", alias = "aspnetStartInMarkup")]
    pub asp_net_start_in_markup: bool,
    /// VB project root namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_namespace: Option<String>,
    /// Resource file whose entries win when a bare reference is ambiguous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_origin: Option<String>,
}

fn default_ignores() -> Vec<String> {
    ["**/bin/**", "**/obj/**", "**/*.Designer.cs", "**/*.Designer.vb"]
        .map(String::from)
        .to_vec()
}

fn default_no_localize_marker() -> String {
    DEFAULT_NO_LOCALIZE_MARKER.to_string()
}

fn default_merge_concatenations() -> bool {
    true
}

fn default_aspnet_start_in_markup() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: default_ignores(),
            no_localize_marker: default_no_localize_marker(),
            merge_concatenations: default_merge_concatenations(),
            asp_net_start_in_markup: default_aspnet_start_in_markup(),
            root_namespace: None,
            preferred_origin: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns in `ignores` or a blank marker.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.no_localize_marker.trim().is_empty() {
            bail!("'noLocalizeMarker' must not be empty");
        }
        if self.no_localize_marker.trim() != self.no_localize_marker {
            bail!(
                "'noLocalizeMarker' must not start or end with whitespace: \"{}\"",
                self.no_localize_marker
            );
        }

        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            no_localize_marker: self.no_localize_marker.clone(),
            merge_concatenations: self.merge_concatenations,
        }
    }

    pub fn preferred_origin(&self) -> Option<ResourceId> {
        self.preferred_origin.as_deref().map(ResourceId::from)
    }

    /// Compiled `ignores`; call after [`Config::validate`].
    pub fn ignore_patterns(&self) -> Vec<Pattern> {
        self.ignores
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
