use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

// ============================================================
// Exit Status
// ============================================================

#[test]
fn test_localizable_literal_fails() -> Result<()> {
    let test = CliTest::with_file(
        "Forms/MainForm.cs",
        "class MainForm\n{\n    void Load() { Text = \"Welcome\"; }\n}\n",
    )?;

    let output = test.literals_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("error: \"Welcome\"  localizable-literal"), "{out}");
    assert!(out.contains("--> Forms/MainForm.cs:3:27"), "{out}");
    assert!(out.contains("1 localizable literal in 1 file (1 checked)"), "{out}");

    Ok(())
}

#[test]
fn test_no_localize_markers_pass() -> Result<()> {
    let test = CliTest::with_file(
        "Keys.cs",
        "class Keys\n{\n    const string A = /*VL_NO_LOC*/\"a\";\n#region VL_NO_LOC\n    const string B = \"b\";\n#endregion\n}\n",
    )?;

    let output = test.literals_command().output()?;
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Checked 1 source file - no localizable literals found"));

    Ok(())
}

#[test]
fn test_all_flag_lists_excluded_literals() -> Result<()> {
    let test = CliTest::with_file("Keys.cs", "const string A = /*VL_NO_LOC*/\"a\";\n")?;

    let output = test.literals_command().arg("--all").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("note: \"a\"  no-localize"));

    Ok(())
}

#[test]
fn test_custom_marker_from_config() -> Result<()> {
    let test = CliTest::with_file("Keys.cs", "const string A = /*NOLOC*/\"a\";\n")?;
    test.write_file(".vlocrc.json", r#"{ "noLocalizeMarker": "NOLOC" }"#)?;

    let output = test.literals_command().output()?;
    assert!(output.status.success(), "{}", stdout(&output));

    let output = test.literals_command().args(["--marker", "OTHER"]).output()?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

// ============================================================
// Languages
// ============================================================

#[test]
fn test_vb_concatenation_is_one_literal() -> Result<()> {
    let test = CliTest::with_file(
        "Module1.vb",
        "Module Module1\n    Sub Main()\n        MsgBox(\"Hello\" & vbCrLf & \"World\") ' \"comment\"\n    End Sub\nEnd Module\n",
    )?;

    let output = test
        .literals_command()
        .args(["--format", "json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let parsed: Value = serde_json::from_str(&stdout(&output))?;
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["value"], "Hello\r\nWorld");
    assert_eq!(items[0]["language"], "vb");
    assert_eq!(items[0]["line"], 3);

    let output = test
        .literals_command()
        .args(["--format", "json", "--no-merge"])
        .output()?;
    let parsed: Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(parsed.as_array().unwrap().len(), 2);

    Ok(())
}

#[test]
fn test_aspnet_page_uses_directive_language() -> Result<()> {
    let test = CliTest::with_file(
        "Default.aspx",
        "<%@ Page Language=\"VB\" %>\n<p title=\"markup\">Text</p>\n<%= \"It\"\"s\" %>\n<%-- \"hidden\" --%>\n",
    )?;

    let output = test
        .literals_command()
        .args(["--format", "json"])
        .output()?;
    let parsed: Value = serde_json::from_str(&stdout(&output))?;
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["value"], "It\"s");
    assert_eq!(items[0]["language"], "aspnet-vb");

    Ok(())
}

#[test]
fn test_lang_override_for_unknown_extension() -> Result<()> {
    let test = CliTest::with_file("snippet.txt", "x = \"hi\"")?;

    let output = test.literals_command().arg("snippet.txt").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Checked 0 source files"));

    let output = test
        .literals_command()
        .args(["snippet.txt", "--lang", "vb"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

// ============================================================
// Files and Errors
// ============================================================

#[test]
fn test_default_ignores_skip_build_output() -> Result<()> {
    let test = CliTest::with_file("obj/Debug/Temp.cs", "var s = \"generated\";")?;
    test.write_file("Form1.Designer.cs", "var s = \"designer\";")?;
    test.write_file("Program.cs", "class P { }")?;

    let output = test.literals_command().output()?;
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Checked 1 source file"));

    Ok(())
}

#[test]
fn test_missing_path_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.literals_command().arg("nope").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Path does not exist"));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".vlocrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.literals_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid glob pattern in 'ignores'"));

    Ok(())
}
