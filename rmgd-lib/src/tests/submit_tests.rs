use super::*;
use rmgd_core::Role;

const NOW: &str = "2024-05-01T12:00:00Z";

fn actor(name: &str, role: Role) -> Actor {
    Actor {
        username: name.to_string(),
        role,
    }
}

fn draft(name: &str) -> RecordPatch {
    RecordPatch {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[test]
fn slugify_collapses_separators() {
    assert_eq!(slugify("Nokia 3310"), "nokia-3310");
    assert_eq!(slugify("  Snake II!!  "), "snake-ii");
    assert_eq!(slugify("Pokémon Mini"), "pok-mon-mini");
    assert_eq!(slugify("---"), "");
}

#[test]
fn contributor_submissions_are_pending() {
    let carol = actor("carol", Role::Contributor);
    let mut d = draft("Snake II");
    d.status = Some(RecordStatus::Active);
    let record = new_submission(RecordKind::Games, &carol, &d, NOW).unwrap();
    assert_eq!(record.status, RecordStatus::Pending);
    assert_eq!(record.submitted_by.as_deref(), Some("carol"));
    assert_eq!(record.created_at.as_deref(), Some(NOW));
    assert_eq!(record.updated_at.as_deref(), Some(NOW));
    assert!(record.id.starts_with("snake-ii-"));
    assert_eq!(record.category, "other");
}

#[test]
fn trusted_roles_publish_directly() {
    let rita = actor("rita", Role::Researcher);
    let record = new_submission(RecordKind::Devices, &rita, &draft("Nokia 3310"), NOW).unwrap();
    assert_eq!(record.status, RecordStatus::Active);

    let mut d = draft("Nokia 3310");
    d.status = Some(RecordStatus::OnLoan);
    let record = new_submission(RecordKind::Devices, &rita, &d, NOW).unwrap();
    assert_eq!(record.status, RecordStatus::OnLoan);
}

#[test]
fn device_only_status_is_rejected_for_games() {
    let admin = actor("root", Role::Admin);
    let mut d = draft("Snake");
    d.status = Some(RecordStatus::Damaged);
    assert!(matches!(
        new_submission(RecordKind::Games, &admin, &d, NOW).unwrap_err(),
        SubmitError::InvalidStatus { .. }
    ));
}

#[test]
fn name_is_required() {
    let admin = actor("root", Role::Admin);
    assert!(matches!(
        new_submission(RecordKind::Games, &admin, &draft("   "), NOW).unwrap_err(),
        SubmitError::MissingName
    ));
    assert!(matches!(
        new_submission(RecordKind::Games, &admin, &RecordPatch::default(), NOW).unwrap_err(),
        SubmitError::MissingName
    ));
}

#[test]
fn ids_are_stable_for_same_input() {
    let admin = actor("root", Role::Admin);
    let a = new_submission(RecordKind::Games, &admin, &draft("Tetris"), NOW).unwrap();
    let b = new_submission(RecordKind::Games, &admin, &draft("Tetris"), NOW).unwrap();
    let c = new_submission(RecordKind::Games, &admin, &draft("Tetris"), "2024-05-02T00:00:00Z")
        .unwrap();
    assert_eq!(a.id, b.id);
    assert_ne!(a.id, c.id);
}

#[test]
fn contributors_edit_only_their_own() {
    let carol = actor("carol", Role::Contributor);
    let mut record = Record::new("g1", "Snake");
    record.submitted_by = Some("carol".into());
    record.status = RecordStatus::Pending;

    let rename = draft("Snake II");
    check_edit(RecordKind::Games, &carol, &record, &rename).unwrap();

    record.submitted_by = Some("dave".into());
    assert!(matches!(
        check_edit(RecordKind::Games, &carol, &record, &rename).unwrap_err(),
        SubmitError::Forbidden { .. }
    ));
}

#[test]
fn contributors_cannot_change_status() {
    let carol = actor("carol", Role::Contributor);
    let mut record = Record::new("g1", "Snake");
    record.submitted_by = Some("carol".into());
    record.status = RecordStatus::Pending;

    let approve = RecordPatch {
        status: Some(RecordStatus::Approved),
        ..Default::default()
    };
    assert!(check_edit(RecordKind::Games, &carol, &record, &approve).is_err());

    let rita = actor("rita", Role::Researcher);
    check_edit(RecordKind::Games, &rita, &record, &approve).unwrap();
}
