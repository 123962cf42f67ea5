use rmgd_catalog::{
    aggregate, count_by_field, decade_histogram, documentation_rate, normalize_all, top_n,
    vintage_ratio, GroupField, Record, UNKNOWN,
};
use serde_json::json;

fn year_fixture() -> Vec<Record> {
    normalize_all(&[
        json!({"year": "1997"}),
        json!({"year": "2001"}),
        json!({"year": "abc"}),
        json!({}),
    ])
}

fn with_images(total: usize, documented: usize) -> Vec<Record> {
    (0..total)
        .map(|i| {
            let mut record = Record::new(format!("r{i}"), format!("Record {i}"));
            if i < documented {
                record.images.push(format!("https://img.example/{i}.png"));
            }
            record
        })
        .collect()
}

#[test]
fn years_group_with_unknown_bucket() {
    let grouped = count_by_field(&year_fixture(), GroupField::Year);
    assert_eq!(grouped.get("1997"), 1);
    assert_eq!(grouped.get("2001"), 1);
    assert_eq!(grouped.get(UNKNOWN), 2);
    assert_eq!(grouped.len(), 3);
}

#[test]
fn out_of_era_years_are_unknown() {
    let records = normalize_all(&[json!({"year": "1970"}), json!({"year": "2015"})]);
    let grouped = count_by_field(&records, GroupField::Year);
    assert_eq!(grouped.get(UNKNOWN), 2);
    assert!(decade_histogram(&records).is_empty());
}

#[test]
fn every_record_lands_in_one_bucket() {
    let records = normalize_all(&[
        json!({"category": "arcade", "maker": "Nokia", "year": "1997", "submittedBy": "alice"}),
        json!({"category": "puzzle", "maker": "", "year": "1989"}),
        json!({"category": "arcade", "year": "nope", "status": "pending"}),
        json!({"maker": "Sony Ericsson"}),
        json!(null),
    ]);
    for field in [
        GroupField::Category,
        GroupField::Maker,
        GroupField::Year,
        GroupField::Status,
        GroupField::SubmittedBy,
    ] {
        let grouped = count_by_field(&records, field);
        assert_eq!(grouped.total(), records.len(), "{}", field.label());
    }
}

#[test]
fn blank_values_group_as_unknown() {
    let mut record = Record::new("x", "x");
    record.category = "   ".to_string();
    let grouped = count_by_field(&[record], GroupField::Category);
    assert_eq!(grouped.get(UNKNOWN), 1);
}

#[test]
fn empty_input_is_zero_guarded() {
    let result = aggregate(&[]);
    assert_eq!(result.total, 0);
    assert_eq!(result.documentation_rate, 0);
    assert_eq!(result.vintage_ratio, 0);
    assert!(result.by_category.is_empty());
    assert!(result.top_makers.is_empty());
    assert!(result.decades.is_empty());
    assert_eq!(documentation_rate(&[]), 0);
    assert_eq!(vintage_ratio(&[]), 0);
}

#[test]
fn documentation_rate_of_three_in_ten() {
    assert_eq!(documentation_rate(&with_images(10, 3)), 30);
}

#[test]
fn rates_round_half_up() {
    assert_eq!(documentation_rate(&with_images(3, 1)), 33);
    assert_eq!(documentation_rate(&with_images(3, 2)), 67);
    assert_eq!(documentation_rate(&with_images(8, 1)), 13);
    assert_eq!(documentation_rate(&with_images(4, 4)), 100);
}

#[test]
fn vintage_ratio_counts_known_pre_2000_years() {
    // 1997 is vintage; 2001, "abc" and missing are not.
    assert_eq!(vintage_ratio(&year_fixture()), 25);
}

#[test]
fn decades_are_sparse_and_ascending() {
    let records = normalize_all(&[
        json!({"year": "2003"}),
        json!({"year": "1979"}),
        json!({"year": "1997"}),
        json!({"year": "1991"}),
    ]);
    let histogram = decade_histogram(&records);
    let pairs: Vec<(i32, usize)> = histogram.into_iter().collect();
    assert_eq!(pairs, vec![(1970, 1), (1990, 2), (2000, 1)]);
}

#[test]
fn top_n_ties_follow_first_appearance() {
    let mut raws = Vec::new();
    for i in 0..5 {
        raws.push(json!({"id": format!("a{i}"), "category": "A"}));
        raws.push(json!({"id": format!("b{i}"), "category": "B"}));
    }
    let grouped = count_by_field(&normalize_all(&raws), GroupField::Category);
    assert_eq!(top_n(&grouped, 1), vec![("A".to_string(), 5)]);

    // B first in input order now.
    raws.rotate_left(1);
    let grouped = count_by_field(&normalize_all(&raws), GroupField::Category);
    assert_eq!(top_n(&grouped, 1), vec![("B".to_string(), 5)]);
}

#[test]
fn top_n_ranks_by_count() {
    let records = normalize_all(&[
        json!({"maker": "Nokia"}),
        json!({"maker": "Sony"}),
        json!({"maker": "Sony"}),
        json!({"maker": "Bandai"}),
        json!({"maker": "Sony"}),
        json!({"maker": "Nokia"}),
    ]);
    let grouped = count_by_field(&records, GroupField::Maker);
    let keys: Vec<String> = top_n(&grouped, 10).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["Sony", "Nokia", "Bandai"]);
    assert!(top_n(&grouped, 0).is_empty());
}

#[test]
fn aggregate_bundles_everything() {
    let records = normalize_all(&[
        json!({"category": "arcade", "maker": "Nokia", "year": "1997", "images": ["a"], "submittedBy": "alice"}),
        json!({"category": "arcade", "maker": "Nokia", "year": "2002", "submittedBy": "alice"}),
        json!({"category": "puzzle", "maker": "Elorg", "year": "x", "submittedBy": "bob"}),
        json!({"category": "rpg"}),
    ]);
    let result = aggregate(&records);
    assert_eq!(result.total, 4);
    assert_eq!(result.top_categories[0], ("arcade".to_string(), 2));
    assert_eq!(result.top_makers[0], ("Nokia".to_string(), 2));
    assert_eq!(result.top_contributors[0], ("alice".to_string(), 2));
    assert_eq!(result.unknown_year, 2);
    assert_eq!(result.with_images, 1);
    assert_eq!(result.documentation_rate, 25);
    assert_eq!(result.vintage_ratio, 25);
    assert_eq!(result.by_status.get("active"), 4);
}

#[test]
fn grouped_serializes_in_first_seen_order() {
    let grouped = count_by_field(&year_fixture(), GroupField::Year);
    let json = serde_json::to_string(&grouped).unwrap();
    assert_eq!(json, r#"{"1997":1,"2001":1,"Unknown":2}"#);
}
