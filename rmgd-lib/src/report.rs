//! CSV reports over records and aggregates.

use std::io::Write;

use rmgd_catalog::{AggregateResult, Record};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const RECORD_HEADER: [&str; 11] = [
    "id",
    "name",
    "category",
    "maker",
    "year",
    "status",
    "submitted_by",
    "images",
    "description",
    "created_at",
    "updated_at",
];

/// One row per record, in the given order. Image URLs are space-separated.
pub fn write_records_csv<W: Write>(records: &[Record], out: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(RECORD_HEADER)?;
    for r in records {
        let images = r.images.join(" ");
        writer.write_record([
            r.id.as_str(),
            r.name.as_str(),
            r.category.as_str(),
            r.maker.as_str(),
            r.year.as_deref().unwrap_or(""),
            r.status.as_str(),
            r.submitted_by.as_deref().unwrap_or(""),
            images.as_str(),
            r.description.as_str(),
            r.created_at.as_deref().unwrap_or(""),
            r.updated_at.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Long-format `metric,key,value` rows for every aggregate.
pub fn write_aggregates_csv<W: Write>(agg: &AggregateResult, out: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["metric", "key", "value"])?;

    let mut row = |metric: &str, key: &str, value: String| {
        writer.write_record([metric, key, value.as_str()])
    };

    row("total", "", agg.total.to_string())?;
    row("with_images", "", agg.with_images.to_string())?;
    row("unknown_year", "", agg.unknown_year.to_string())?;
    row("documentation_rate", "", agg.documentation_rate.to_string())?;
    row("vintage_ratio", "", agg.vintage_ratio.to_string())?;

    for (metric, grouped) in [
        ("category", &agg.by_category),
        ("maker", &agg.by_maker),
        ("year", &agg.by_year),
        ("status", &agg.by_status),
        ("contributor", &agg.by_contributor),
    ] {
        for (key, count) in grouped.iter() {
            row(metric, key, count.to_string())?;
        }
    }
    for (decade, count) in &agg.decades {
        row("decade", &format!("{decade}s"), count.to_string())?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmgd_catalog::aggregate;

    fn sample() -> Vec<Record> {
        let mut a = Record::new("g1", "Snake, the game");
        a.category = "puzzle".into();
        a.maker = "Nokia".into();
        a.year = Some("1998".into());
        a.images = vec!["http://x/a.png".into(), "http://x/b.png".into()];
        a.description = "Line one\nline \"two\"".into();
        let b = Record::new("g2", "Untitled");
        vec![a, b]
    }

    #[test]
    fn records_csv_quotes_and_joins() {
        let mut buf = Vec::new();
        write_records_csv(&sample(), &mut buf).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 11);
        assert_eq!(&headers[0], "id");

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Snake, the game");
        assert_eq!(&rows[0][7], "http://x/a.png http://x/b.png");
        assert_eq!(&rows[0][8], "Line one\nline \"two\"");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[1][5], "active");
    }

    #[test]
    fn aggregates_csv_lists_every_metric() {
        let agg = aggregate(&sample());
        let mut buf = Vec::new();
        write_aggregates_csv(&agg, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("metric,key,value\n"));
        assert!(text.contains("total,,2\n"));
        assert!(text.contains("documentation_rate,,50\n"));
        assert!(text.contains("vintage_ratio,,50\n"));
        assert!(text.contains("category,puzzle,1\n"));
        assert!(text.contains("category,other,1\n"));
        assert!(text.contains("year,Unknown,1\n"));
        assert!(text.contains("decade,1990s,1\n"));
    }
}
