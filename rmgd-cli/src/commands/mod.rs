pub(crate) mod config;
pub(crate) mod images;
pub(crate) mod import;
pub(crate) mod list;
pub(crate) mod nav;
pub(crate) mod overview;
pub(crate) mod records;
pub(crate) mod report;
pub(crate) mod users;

use std::io::Write;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_catalog::Record;
use rmgd_core::RecordStatus;

/// Truncate a string to a maximum width, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max).collect()
    }
}

/// Read one line from stdin after printing `prompt`.
pub(crate) fn prompt_line(prompt: &str) -> std::io::Result<String> {
    print!("{}: ", prompt);
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask a yes/no question; anything but "y" or "yes" is a no.
pub(crate) fn confirm(question: &str) -> std::io::Result<bool> {
    let answer = prompt_line(&format!("{} [y/N]", question))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn status_cell(status: RecordStatus) -> String {
    let text = format!("{:<11}", status.as_str());
    match status {
        RecordStatus::Pending => text.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        RecordStatus::Rejected | RecordStatus::Damaged | RecordStatus::Missing => {
            text.if_supports_color(Stdout, |t| t.red()).to_string()
        }
        RecordStatus::Unknown => text.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
        _ => text.if_supports_color(Stdout, |t| t.green()).to_string(),
    }
}

/// Print records as a fixed-width table.
pub(crate) fn print_records(records: &[Record]) {
    log::info!(
        "  {:<24} {:<32} {:<14} {:<18} {:<6} {:<11} {}",
        "ID".if_supports_color(Stdout, |t| t.bold()),
        "Name".if_supports_color(Stdout, |t| t.bold()),
        "Category".if_supports_color(Stdout, |t| t.bold()),
        "Maker".if_supports_color(Stdout, |t| t.bold()),
        "Year".if_supports_color(Stdout, |t| t.bold()),
        "Status".if_supports_color(Stdout, |t| t.bold()),
        "Img".if_supports_color(Stdout, |t| t.bold()),
    );
    for r in records {
        log::info!(
            "  {:<24} {:<32} {:<14} {:<18} {:<6} {} {}",
            truncate_str(&r.id, 24).if_supports_color(Stdout, |t| t.dimmed()),
            truncate_str(&r.name, 32),
            truncate_str(&r.category, 14),
            truncate_str(&r.maker, 18),
            r.year.as_deref().map(|y| truncate_str(y, 6)).unwrap_or_default(),
            status_cell(r.status),
            r.images.len(),
        );
    }
}

/// Print every field of one record.
pub(crate) fn print_record_detail(record: &Record) {
    log::info!(
        "{} {}",
        record.name.if_supports_color(Stdout, |t| t.bold()),
        format!("({})", record.id).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  Category:     {}", record.category);
    if !record.maker.is_empty() {
        log::info!("  Maker:        {}", record.maker);
    }
    if let Some(year) = &record.year {
        log::info!("  Year:         {}", year);
    }
    log::info!("  Status:       {}", status_cell(record.status));
    if let Some(who) = &record.submitted_by {
        log::info!("  Submitted by: {}", who);
    }
    for url in &record.images {
        log::info!("  Image:        {}", url.if_supports_color(Stdout, |t| t.cyan()));
    }
    if !record.description.is_empty() {
        log::info!("  {}", record.description);
    }
}
