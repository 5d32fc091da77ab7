use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write(dir: &Path, rel: &str, content: impl AsRef<str>) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content.as_ref()).unwrap();
}

fn make_config(project_root: &str) -> String {
    format!(
        r#"
version = 1
profile = "test"

[profiles.test]
project_root = "{project_root}"
schema_file = "{{{{project_root}}}}/schema.yaml"
documents_dir = "{{{{project_root}}}}/documents"
"#
    )
}

const SCHEMA: &str = r#"
categories:
  Find:
    fields:
      period: { constraintIndexed: true }

constraints:
  "isChildOf:contain":
    path: relations.isChildOf
    type: contain
    recursivelySearchable: true
"#;

fn setup_corpus(root: &Path) {
    write(root, "config.toml", make_config(&root.join("project").to_string_lossy()));
    write(root, "project/schema.yaml", SCHEMA);
    write(
        root,
        "project/documents/corpus.json",
        r#"[
            {
                "id": "a", "category": "Find",
                "fields": { "identifier": "F-a", "period": "Iron Age" },
                "created": { "user": "anna", "date": "2024-03-01T10:00:00Z" }
            },
            {
                "id": "b", "category": "Find",
                "fields": { "identifier": "F-b", "period": "Iron Age" },
                "relations": { "isChildOf": ["a"] },
                "created": { "user": "anna", "date": "2024-03-01T11:00:00Z" }
            },
            {
                "id": "c", "category": "Find",
                "fields": { "identifier": "F-c", "period": "Bronze Age" },
                "relations": { "isChildOf": ["b"] },
                "created": { "user": "anna", "date": "2024-03-01T12:00:00Z" }
            }
        ]"#,
    );
}

fn fidx(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fidx"));
    cmd.arg("--config").arg(root.join("config.toml"));
    cmd
}

#[test]
fn constraint_filters_by_field_value() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["search", "--constraint", "period:match=Iron Age", "--quiet"]);

    cmd.assert().success().stdout("a\nb\n");
}

#[test]
fn subtract_constraint_cuts_matches_away() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["search", "*", "--constraint", "period:match!=Iron Age", "--quiet"]);

    cmd.assert().success().stdout("c\n");
}

#[test]
fn recursive_constraint_includes_descendants() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["search", "--constraint", "isChildOf:contain~=a", "--quiet"]);

    cmd.assert().success().stdout("b\nc\n");
}

#[test]
fn exist_constraint_uses_presence_sentinels() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["search", "--constraint", "period:exist=KNOWN", "--quiet"]);
    cmd.assert().success().stdout("a\nb\nc\n");

    let mut cmd = fidx(tmp.path());
    cmd.args(["search", "--constraint", "period:exist=UNKNOWN", "--quiet"]);
    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn malformed_constraint_is_rejected() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["search", "--constraint", "period:match"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid constraint"));
}
