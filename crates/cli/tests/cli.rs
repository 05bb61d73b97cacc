use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn formforge(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("formforge").unwrap();
    cmd.current_dir(dir)
        .env("FORMFORGE_STORE", dir.join("store"))
        .env_remove("RUST_LOG");
    cmd
}

fn create(dir: &Path, template: &str) -> String {
    let output = formforge(dir)
        .args(["--format", "json", "new", "--template", template])
        .output()
        .unwrap();
    assert!(output.status.success());
    let form: Value = serde_json::from_slice(&output.stdout).unwrap();
    form["id"].as_str().unwrap().to_string()
}

#[test]
fn test_catalog_lists_field_types() {
    let dir = TempDir::new().unwrap();
    formforge(dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Short Text"))
        .stdout(predicate::str::contains("rating"));
}

#[test]
fn test_templates_lists_builtins() {
    let dir = TempDir::new().unwrap();
    let output = formforge(dir.path())
        .args(["--format", "json", "templates"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let templates: Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        vec!["blank", "contact", "feedback", "registration", "survey", "order"]
    );
}

#[test]
fn test_new_then_list_and_show() {
    let dir = TempDir::new().unwrap();
    let id = create(dir.path(), "contact");
    assert!(dir.path().join("store").join(format!("{}.form.json", id)).exists());

    formforge(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()))
        .stdout(predicate::str::contains("Contact Form"));

    formforge(dir.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Email Address"));
}

#[test]
fn test_unknown_template_fails() {
    let dir = TempDir::new().unwrap();
    formforge(dir.path())
        .args(["new", "--template", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found"));
}

#[test]
fn test_edit_script_reorders_and_saves() {
    let dir = TempDir::new().unwrap();
    let id = create(dir.path(), "blank");
    let script = dir.path().join("edits.json");
    std::fs::write(
        &script,
        r#"[
            { "action": "set_title", "title": "Signup" },
            { "action": "drag", "source": "palette-text", "target": "canvas-drop-zone" },
            { "action": "update_selected", "changes": { "label": "Name" } },
            { "action": "drag", "source": "palette-email", "target": "form-canvas" },
            { "action": "reorder_field", "from": 1, "to": 0 }
        ]"#,
    )
    .unwrap();

    formforge(dir.path())
        .args(["edit", &id, "--script"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved Signup"));

    let output = formforge(dir.path())
        .args(["--format", "json", "show", &id])
        .output()
        .unwrap();
    let form: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(form["title"], "Signup");
    assert_eq!(form["version"], 2);
    let types: Vec<_> = form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, vec!["email", "text"]);
    assert_eq!(form["fields"][1]["label"], "Name");
}

#[test]
fn test_publish_and_validate() {
    let dir = TempDir::new().unwrap();
    let id = create(dir.path(), "feedback");

    formforge(dir.path())
        .args(["validate", &id])
        .assert()
        .success();

    formforge(dir.path())
        .args(["publish", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Published"));

    formforge(dir.path())
        .args(["--format", "json", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"published\""));
}

#[test]
fn test_publish_refuses_invalid_form() {
    let dir = TempDir::new().unwrap();
    let id = create(dir.path(), "blank");
    let script = dir.path().join("edits.json");
    std::fs::write(
        &script,
        r#"[{ "action": "add_field", "type": "select" }]"#,
    )
    .unwrap();
    formforge(dir.path())
        .args(["edit", &id, "--script"])
        .arg(&script)
        .assert()
        .success();

    formforge(dir.path())
        .args(["publish", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be published"));

    formforge(dir.path())
        .arg("validate")
        .arg(dir.path().join("store"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("needs at least one option"));
}

#[test]
fn test_show_missing_form_fails() {
    let dir = TempDir::new().unwrap();
    formforge(dir.path())
        .args(["show", "form_missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not open form"));
}

#[test]
fn test_show_rejects_ids_outside_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("x.form.json"), "{}").unwrap();
    formforge(dir.path())
        .args(["show", "../x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid form id"));
}

#[test]
fn test_config_file_sets_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("formforge.toml"),
        "store_dir = \"configured\"\npretty = false\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("formforge").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("FORMFORGE_STORE")
        .env_remove("RUST_LOG")
        .args(["new", "--template", "survey"])
        .assert()
        .success();

    let stored = std::fs::read_dir(dir.path().join("configured")).unwrap().count();
    assert_eq!(stored, 1);
}
