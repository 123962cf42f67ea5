use rmgd_catalog::{filter, matches, normalize_all, FilterCriteria, Record};
use rmgd_core::RecordStatus;
use serde_json::json;

fn catalog() -> Vec<Record> {
    normalize_all(&[
        json!({"id": "g1", "name": "Snake", "category": "arcade", "maker": "Nokia", "year": "1997", "submittedBy": "alice"}),
        json!({"id": "g2", "name": "Space Impact", "category": "shooter", "maker": "Nokia", "year": "2000", "description": "Side-scrolling shooter"}),
        json!({"id": "g3", "name": "Tetris", "category": "puzzle", "maker": "Elorg", "year": "1989", "status": "pending", "submittedBy": "bob"}),
        json!({"id": "g4", "name": "Bounce", "category": "arcade", "maker": "Rovio", "year": "abc"}),
        json!({"id": "g5", "name": "Unknown Era", "category": "arcade"}),
    ])
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn empty_criteria_match_everything() {
    let records = catalog();
    let criteria = FilterCriteria::new();
    assert!(criteria.is_empty());
    assert_eq!(filter(&records, &criteria).len(), records.len());
}

#[test]
fn blank_criteria_are_ignored() {
    let records = catalog();
    let criteria = FilterCriteria::new().search("  ").category("").maker(" ");
    assert!(criteria.is_empty());
    assert_eq!(filter(&records, &criteria).len(), records.len());
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let records = catalog();
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().search("SNAKE"))), vec!["g1"]);
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().search("nokia"))), vec!["g1", "g2"]);
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().search("scrolling"))), vec!["g2"]);
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().search("G3"))), vec!["g3"]);
}

#[test]
fn category_and_maker_are_exact() {
    let records = catalog();
    assert_eq!(
        ids(&filter(&records, &FilterCriteria::new().category("arcade"))),
        vec!["g1", "g4", "g5"]
    );
    assert!(filter(&records, &FilterCriteria::new().category("Arcade")).is_empty());
    assert!(filter(&records, &FilterCriteria::new().maker("nok")).is_empty());
}

#[test]
fn decade_excludes_unknown_years() {
    let records = catalog();
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().decade(1990))), vec!["g1"]);
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().decade(1980))), vec!["g3"]);
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().decade(2000))), vec!["g2"]);
}

#[test]
fn decade_at_integer_extremes_matches_nothing() {
    let records = catalog();
    assert!(filter(&records, &FilterCriteria::new().decade(i32::MAX)).is_empty());
    assert!(filter(&records, &FilterCriteria::new().decade(i32::MAX - 5)).is_empty());
    assert!(filter(&records, &FilterCriteria::new().decade(i32::MIN)).is_empty());
}

#[test]
fn decade_scenario_over_four_records() {
    let records = normalize_all(&[
        json!({"year": "1997"}),
        json!({"year": "2001"}),
        json!({"year": "abc"}),
        json!({}),
    ]);
    let hits = filter(&records, &FilterCriteria::new().decade(1990));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].year.as_deref(), Some("1997"));
}

#[test]
fn criteria_are_anded() {
    let records = catalog();
    let criteria = FilterCriteria::new().category("arcade").maker("Nokia").decade(1990);
    assert_eq!(ids(&filter(&records, &criteria)), vec!["g1"]);

    let criteria = FilterCriteria::new().category("arcade").maker("Elorg");
    assert!(filter(&records, &criteria).is_empty());
}

#[test]
fn status_and_submitter_scope() {
    let records = catalog();
    assert_eq!(
        ids(&filter(&records, &FilterCriteria::new().status(RecordStatus::Pending))),
        vec!["g3"]
    );
    assert_eq!(ids(&filter(&records, &FilterCriteria::new().submitted_by("alice"))), vec!["g1"]);
}

#[test]
fn adding_a_constraint_never_grows_the_result() {
    let records = catalog();
    let steps = [
        FilterCriteria::new(),
        FilterCriteria::new().category("arcade"),
        FilterCriteria::new().category("arcade").search("a"),
        FilterCriteria::new().category("arcade").search("a").maker("Nokia"),
        FilterCriteria::new()
            .category("arcade")
            .search("a")
            .maker("Nokia")
            .decade(1990),
        FilterCriteria::new()
            .category("arcade")
            .search("a")
            .maker("Nokia")
            .decade(1990)
            .status(RecordStatus::Pending),
    ];
    let counts: Vec<usize> = steps.iter().map(|c| filter(&records, c).len()).collect();
    for pair in counts.windows(2) {
        assert!(pair[1] <= pair[0], "counts grew: {:?}", counts);
    }
}

#[test]
fn evaluation_order_does_not_matter() {
    let records = catalog();
    let a = FilterCriteria::new().maker("Nokia").search("snake");
    let b = FilterCriteria::new().search("snake").maker("Nokia");
    for record in &records {
        assert_eq!(matches(record, &a), matches(record, &b));
    }
}

#[test]
fn filtered_order_follows_input() {
    let mut records = catalog();
    records.reverse();
    assert_eq!(
        ids(&filter(&records, &FilterCriteria::new().category("arcade"))),
        vec!["g5", "g4", "g1"]
    );
}
