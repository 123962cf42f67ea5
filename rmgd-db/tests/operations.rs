use rmgd_catalog::{Record, RecordPatch};
use rmgd_core::{RecordKind, RecordStatus, Role};
use rmgd_db::*;

fn snake() -> Record {
    let mut record = Record::new("snake", "Snake");
    record.category = "arcade".to_string();
    record.maker = "Nokia".to_string();
    record.year = Some("1997".to_string());
    record.images = vec!["b.png".to_string(), "a.png".to_string()];
    record.submitted_by = Some("alice".to_string());
    record.created_at = Some("2024-01-01T00:00:00Z".to_string());
    record
}

fn user(name: &str, role: Role) -> UserAccount {
    UserAccount {
        username: name.to_string(),
        role,
        password_hash: "hash".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[test]
fn insert_and_find_record() {
    let conn = open_memory().unwrap();
    insert_record(&conn, RecordKind::Games, &snake()).unwrap();

    let found = find_record(&conn, RecordKind::Games, "snake").unwrap().unwrap();
    assert_eq!(found, snake());
    assert!(find_record(&conn, RecordKind::Devices, "snake").unwrap().is_none());
}

#[test]
fn duplicate_insert_is_rejected() {
    let conn = open_memory().unwrap();
    insert_record(&conn, RecordKind::Games, &snake()).unwrap();
    let err = insert_record(&conn, RecordKind::Games, &snake()).unwrap_err();
    assert!(matches!(err, OperationError::Duplicate { .. }));

    // Same id in the other collection is fine.
    insert_record(&conn, RecordKind::Devices, &snake()).unwrap();
}

#[test]
fn update_merges_patch_and_keeps_identity() {
    let conn = open_memory().unwrap();
    insert_record(&conn, RecordKind::Games, &snake()).unwrap();

    let patch = RecordPatch {
        name: Some("Snake II".to_string()),
        year: Some(String::new()),
        ..RecordPatch::default()
    };
    let updated = update_record(&conn, RecordKind::Games, "snake", &patch).unwrap();
    assert_eq!(updated.id, "snake");
    assert_eq!(updated.name, "Snake II");
    assert_eq!(updated.year, None);
    assert_eq!(updated.maker, "Nokia");
    assert_eq!(updated.images, vec!["b.png", "a.png"]);
    assert_eq!(updated.submitted_by.as_deref(), Some("alice"));
    assert_eq!(updated.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert!(updated.updated_at.is_some());

    let stored = find_record(&conn, RecordKind::Games, "snake").unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn update_missing_record_fails() {
    let conn = open_memory().unwrap();
    let err = update_record(&conn, RecordKind::Games, "ghost", &RecordPatch::default()).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn edits_keep_list_position() {
    let conn = open_memory().unwrap();
    for id in ["a", "b", "c"] {
        insert_record(&conn, RecordKind::Games, &Record::new(id, id)).unwrap();
    }
    set_record_status(&conn, RecordKind::Games, "a", RecordStatus::Archived).unwrap();

    let ids: Vec<String> = list_records(&conn, RecordKind::Games)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn upsert_reports_outcome() {
    let conn = open_memory().unwrap();
    let mut record = snake();
    assert_eq!(upsert_record(&conn, RecordKind::Games, &record).unwrap(), UpsertOutcome::Created);
    record.description = "Classic".to_string();
    assert_eq!(upsert_record(&conn, RecordKind::Games, &record).unwrap(), UpsertOutcome::Updated);
    assert_eq!(list_records(&conn, RecordKind::Games).unwrap().len(), 1);
}

#[test]
fn delete_record_by_id() {
    let conn = open_memory().unwrap();
    insert_record(&conn, RecordKind::Games, &snake()).unwrap();
    delete_record(&conn, RecordKind::Games, "snake").unwrap();
    assert!(list_records(&conn, RecordKind::Games).unwrap().is_empty());

    let err = delete_record(&conn, RecordKind::Games, "snake").unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn user_lifecycle() {
    let conn = open_memory().unwrap();
    insert_user(&conn, &user("alice", Role::Contributor)).unwrap();
    assert!(matches!(
        insert_user(&conn, &user("alice", Role::Admin)).unwrap_err(),
        OperationError::Duplicate { .. }
    ));

    set_user_role(&conn, "alice", Role::Researcher).unwrap();
    assert_eq!(find_user(&conn, "alice").unwrap().unwrap().role, Role::Researcher);

    delete_user(&conn, "alice").unwrap();
    assert!(find_user(&conn, "alice").unwrap().is_none());
    assert!(matches!(
        set_user_role(&conn, "alice", Role::Admin).unwrap_err(),
        OperationError::NotFound { .. }
    ));
}

#[test]
fn import_log_round_trip() {
    let conn = open_memory().unwrap();
    let log = ImportLog {
        id: 0,
        kind: RecordKind::Devices,
        source_name: "devices.yaml".to_string(),
        imported_at: now_timestamp(),
        records_created: 3,
        records_updated: 1,
        records_skipped: 0,
    };
    let id = insert_import_log(&conn, &log).unwrap();
    let logs = list_import_logs(&conn).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, id);
    assert_eq!(logs[0].kind, RecordKind::Devices);
    assert_eq!(logs[0].records_created, 3);
}
