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
  "isRecordedIn:contain":
    path: relations.isRecordedIn
    type: contain
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
                "id": "t1", "category": "Operation",
                "fields": { "identifier": "T-01" },
                "created": { "user": "anna", "date": "2024-03-01T09:00:00Z" }
            },
            {
                "id": "a", "category": "Find",
                "fields": { "identifier": "F-a", "period": "Iron Age" },
                "relations": { "isRecordedIn": ["t1"], "isChildOf": ["t1"] },
                "created": { "user": "anna", "date": "2024-03-01T10:00:00Z" }
            },
            {
                "id": "b", "category": "Find",
                "fields": { "identifier": "F-b" },
                "relations": { "isRecordedIn": ["t1"], "isChildOf": ["a"] },
                "created": { "user": "anna", "date": "2024-03-01T11:00:00Z" }
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
fn count_reports_bucket_cardinality() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["count", "isRecordedIn:contain", "t1"]);
    cmd.assert().success().stdout("2\n");

    let mut cmd = fidx(tmp.path());
    cmd.args(["count", "period:exist", "KNOWN"]);
    cmd.assert().success().stdout("1\n");

    // t1 and b carry no period value
    let mut cmd = fidx(tmp.path());
    cmd.args(["count", "period:exist", "UNKNOWN"]);
    cmd.assert().success().stdout("2\n");

    // Unknown values count zero instead of failing
    let mut cmd = fidx(tmp.path());
    cmd.args(["count", "isRecordedIn:contain", "nope"]);
    cmd.assert().success().stdout("0\n");
}

#[test]
fn descendants_walk_the_hierarchy_transitively() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["descendants", "isChildOf:contain", "t1", "--quiet"]);
    cmd.assert().success().stdout("a\nb\n");

    // A leaf has no descendants
    let mut cmd = fidx(tmp.path());
    cmd.args(["descendants", "isChildOf:contain", "b"]);
    cmd.assert().success().stdout(predicate::str::contains("(no descendants found)"));
}

#[test]
fn descendants_require_a_recursive_index() {
    let tmp = tempdir().unwrap();
    setup_corpus(tmp.path());

    let mut cmd = fidx(tmp.path());
    cmd.args(["descendants", "isRecordedIn:contain", "t1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not recursively searchable"));
}
