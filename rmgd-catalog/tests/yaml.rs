use rmgd_catalog::{extract_records, load_records_file, load_seed_dir, normalize_all};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn load_yaml_sequence() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "games.yaml",
        r#"
- id: snake
  name: Snake
  category: arcade
  maker: Nokia
  year: 1997
  images:
    - https://img.example/snake.png
- "Name of Product": Game & Watch
"#,
    );

    let raws = load_records_file(&tmp.path().join("games.yaml")).unwrap();
    assert_eq!(raws.len(), 2);
    let records = normalize_all(&raws);
    assert_eq!(records[0].id, "snake");
    assert_eq!(records[0].year.as_deref(), Some("1997"));
    assert_eq!(records[0].images.len(), 1);
    assert_eq!(records[1].name, "Game & Watch");
}

#[test]
fn load_json_store_export() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "devices.json",
        r#"{"Items": [{"id": {"S": "d1"}, "name": {"S": "Game Boy"}}], "Count": 1}"#,
    );
    let raws = load_records_file(&tmp.path().join("devices.json")).unwrap();
    assert_eq!(raws.len(), 1);
    assert_eq!(normalize_all(&raws)[0].name, "Game Boy");
}

#[test]
fn seed_dir_reads_files_in_name_order() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "b.yaml", "- id: second\n  name: B\n");
    write(tmp.path(), "a.json", r#"[{"id": "first", "name": "A"}]"#);
    write(tmp.path(), "notes.txt", "ignored");

    let records = normalize_all(&load_seed_dir(tmp.path()).unwrap());
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[test]
fn missing_dir_returns_empty() {
    let tmp = TempDir::new().unwrap();
    assert!(load_seed_dir(&tmp.path().join("nonexistent")).unwrap().is_empty());
}

#[test]
fn malformed_file_reports_path() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "broken.json", "[{");
    let err = load_records_file(&tmp.path().join("broken.json")).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn single_record_document() {
    assert_eq!(extract_records(json!({"id": "x"})).len(), 1);
    assert_eq!(extract_records(json!({"records": [1, 2]})).len(), 2);
    assert!(extract_records(json!(null)).is_empty());
}
