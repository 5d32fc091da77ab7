use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn write(dir: &std::path::Path, rel: &str, content: impl AsRef<str>) {
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
  Operation:
    fields:
      period: { constraintIndexed: true, fulltextIndexed: true }

constraints:
  "isChildOf:contain":
    path: relations.isChildOf
    type: contain
    recursivelySearchable: true
"#;

#[test]
fn doctor_reports_resolved_paths_and_counts() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let project = root.join("project");

    write(root, "config.toml", make_config(&project.to_string_lossy()));
    write(root, "project/schema.yaml", SCHEMA);
    write(
        root,
        "project/documents/ops.json",
        r#"[
            { "id": "t1", "category": "Operation", "fields": { "identifier": "T-01" } },
            { "id": "t2", "category": "Operation", "fields": { "identifier": "T-02" } }
        ]"#,
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fidx"));
    cmd.arg("--config").arg(root.join("config.toml")).arg("doctor");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   fidx doctor"))
        .stdout(predicate::str::contains("profile: test"))
        .stdout(predicate::str::contains("categories: 1"))
        .stdout(predicate::str::contains("constraints: 1"))
        .stdout(predicate::str::contains("documents: 2"));
}
