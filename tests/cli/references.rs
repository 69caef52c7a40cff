use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

const ENTRIES: &str = r#"[
  { "namespace": "NsA", "className": "Form", "key": "Key1", "value": "A", "origin": "NsA/Form.resx" },
  { "namespace": "NsB", "className": "Form", "key": "Key1", "value": "B", "origin": "NsB/Form.resx" },
  { "namespace": "MyApp.My", "className": "Resources", "key": "Greeting", "value": "Hi", "origin": "My Project/Resources.resx" }
]"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file("entries.json", ENTRIES)?;
    test.write_file(
        "A/Page.cs",
        "namespace NsA\n{\n    class Page { string T => Form.Key1; }\n}\n",
    )?;
    test.write_file(
        "B/Page.cs",
        "namespace NsB\n{\n    class Page { string T => Form.Key1; } // Form.Key1\n}\n",
    )?;
    Ok(test)
}

fn json_references(test: &CliTest, args: &[&str]) -> Result<Vec<Value>> {
    let output = test
        .references_command()
        .args(["--resources", "entries.json", "--format", "json"])
        .args(args)
        .output()?;
    assert!(output.status.success(), "{}", stderr(&output));
    let parsed: Value = serde_json::from_str(&stdout(&output))?;
    Ok(parsed.as_array().cloned().unwrap_or_default())
}

#[test]
fn test_namespace_decides_between_same_keys() -> Result<()> {
    let test = project()?;

    let found = json_references(&test, &[])?;
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["file"], "A/Page.cs");
    assert_eq!(found[0]["entry"]["namespace"], "NsA");
    assert_eq!(found[1]["file"], "B/Page.cs");
    assert_eq!(found[1]["entry"]["namespace"], "NsB");
    assert_eq!(found[1]["line"], 3);

    Ok(())
}

#[test]
fn test_explicit_namespace_overrides_declaration() -> Result<()> {
    let test = project()?;

    let found = json_references(&test, &["--namespace", "NsB"])?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|r| r["entry"]["namespace"] == "NsB"));

    Ok(())
}

#[test]
fn test_vb_root_namespace_and_my() -> Result<()> {
    let test = CliTest::with_file("entries.json", ENTRIES)?;
    test.write_file(
        "Module1.vb",
        "Module Module1\n    Sub Main()\n        MsgBox(MY.Resources.greeting)\n    End Sub\nEnd Module\n",
    )?;

    let found = json_references(&test, &["--root-namespace", "MyApp"])?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["matchedText"], "MY.Resources.greeting");
    assert_eq!(found[0]["prefix"], "MY");
    assert_eq!(found[0]["entry"]["key"], "Greeting");

    let found = json_references(&test, &[])?;
    assert!(found.is_empty());

    Ok(())
}

#[test]
fn test_text_report() -> Result<()> {
    let test = project()?;

    let output = test
        .references_command()
        .args(["A", "--resources", "entries.json"])
        .output()?;
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(
        out.contains("reference: Form.Key1 -> NsA.Form.Key1  NsA/Form.resx"),
        "{out}"
    );
    assert!(out.contains("--> A/Page.cs:3:30"), "{out}");
    assert!(out.contains("Found 1 reference in 1 file (1 checked)"), "{out}");

    Ok(())
}

#[test]
fn test_bad_resources_file_is_an_error() -> Result<()> {
    let test = CliTest::with_file("entries.json", r#"[{ "className": "Form", "key": "", "origin": "x" }]"#)?;

    let output = test
        .references_command()
        .args(["--resources", "entries.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("has an empty key"), "{}", stderr(&output));

    let output = test
        .references_command()
        .args(["--resources", "missing.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read resource entries"));

    Ok(())
}
