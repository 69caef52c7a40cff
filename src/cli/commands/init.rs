use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write the default `.vlocrc.json` into the working directory.
pub fn init() -> Result<ExitStatus> {
    init_in(Path::new("."))
}

/// Write the default config into `dir`, refusing to overwrite one.
pub fn init_in(dir: &Path) -> Result<ExitStatus> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        eprintln!(
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        );
        return Ok(ExitStatus::Failure);
    }

    fs::write(&config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {CONFIG_FILE_NAME}").green()
    );

    Ok(ExitStatus::Success)
}

#[cfg(test)]
mod tests {
    use crate::cli::commands::init::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert_eq!(init_in(dir.path()).unwrap(), ExitStatus::Success);
        let loaded = load_config(dir.path()).unwrap();
        assert!(loaded.from_file);
        assert_eq!(loaded.config.no_localize_marker, "VL_NO_LOC");
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{}").unwrap();

        assert_eq!(init_in(dir.path()).unwrap(), ExitStatus::Failure);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
