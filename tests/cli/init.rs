use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert!(
        parsed.get("ignores").is_some(),
        "Config should have 'ignores' field"
    );
    assert_eq!(parsed["noLocalizeMarker"], "VL_NO_LOC");
    assert_eq!(parsed["mergeConcatenations"], true);
    assert_eq!(parsed["aspNetStartInMarkup"], true);
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .vlocrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".vlocrc.json").exists());
    let content = test.read_file(".vlocrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".vlocrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: .vlocrc.json already exists
    ");

    assert_eq!(test.read_file(".vlocrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file("Program.cs", "class P { }")?;

    let output = test.literals_command().output()?;
    assert!(
        output.status.success(),
        "literals should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
