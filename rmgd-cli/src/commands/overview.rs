use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_catalog::{AggregateResult, Grouped, TOP_N};
use rmgd_core::{RecordKind, View};

use crate::CliError;
use crate::context::Context;

fn top_line(entries: &[(String, usize)]) -> String {
    entries
        .iter()
        .map(|(key, count)| format!("{} ({})", key, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Headline numbers for both collections.
pub(crate) fn run_overview(ctx: &Context) -> Result<(), CliError> {
    let actor = ctx.require_view(View::Overview)?;

    log::info!(
        "{}",
        "Retro Mobile Gaming Database".if_supports_color(Stdout, |t| t.bold()),
    );
    if ctx.is_remote() {
        log::info!("  Source: {}", ctx.settings.api_url.as_deref().unwrap_or_default());
    } else {
        log::info!("  Database: {}", ctx.settings.database.display());
    }

    for &kind in RecordKind::all() {
        let state = ctx.load_state(kind, &actor)?;
        let agg = state.view().aggregates;

        crate::log_blank();
        log::info!("{}", kind.display_name().if_supports_color(Stdout, |t| t.bold()));
        log::info!("  Total:              {:>6}", agg.total);
        log::info!(
            "  Documented:         {:>6} ({}%)",
            agg.with_images,
            agg.documentation_rate
        );
        log::info!("  Pre-2000:           {:>5}%", agg.vintage_ratio);
        log::info!("  Pending review:     {:>6}", agg.by_status.get("pending"));
        let shown = agg.top_categories.len().min(3);
        log::info!("  Top categories:     {}", top_line(&agg.top_categories[..shown]));
    }

    if !ctx.is_remote() && actor.role.is_trusted() {
        let stats = rmgd_db::catalog_stats(ctx.conn()).map_err(rmgd_lib::SourceError::from)?;
        crate::log_blank();
        log::info!("  Accounts:           {:>6}", stats.users);
        log::info!("  Imports:            {:>6}", stats.imports);
    }
    Ok(())
}

fn print_grouped(title: &str, grouped: &Grouped) {
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    if grouped.is_empty() {
        log::info!("  (none)");
    }
    for (key, count) in grouped.iter() {
        log::info!("  {:<28} {:>6}", key, count);
    }
}

fn print_top(title: &str, entries: &[(String, usize)]) {
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
    for (rank, (key, count)) in entries.iter().enumerate() {
        log::info!("  {:>2}. {:<24} {:>6}", rank + 1, key, count);
    }
}

fn print_decades(agg: &AggregateResult) {
    log::info!("{}", "By decade".if_supports_color(Stdout, |t| t.bold()));
    let max = agg.decades.values().copied().max().unwrap_or(0).max(agg.unknown_year);
    let bar = |count: usize| {
        let width = if max == 0 { 0 } else { (count * 40).div_ceil(max) };
        "#".repeat(width)
    };
    for (decade, count) in &agg.decades {
        log::info!(
            "  {:<8} {:>6} {}",
            format!("{}s", decade),
            count,
            bar(*count).if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    log::info!(
        "  {:<8} {:>6} {}",
        "Unknown",
        agg.unknown_year,
        bar(agg.unknown_year).if_supports_color(Stdout, |t| t.dimmed()),
    );
}

/// Full analytics breakdown for one collection.
pub(crate) fn run_stats(ctx: &Context, kind: RecordKind) -> Result<(), CliError> {
    let actor = ctx.require_view(View::Analytics)?;
    let state = ctx.load_state(kind, &actor)?;
    let agg = state.view().aggregates;

    log::info!(
        "{}",
        format!("{} analytics", kind.display_name()).if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Total:               {:>6}", agg.total);
    log::info!("  With images:         {:>6}", agg.with_images);
    log::info!("  Documentation rate:  {:>5}%", agg.documentation_rate);
    log::info!("  Vintage (pre-2000):  {:>5}%", agg.vintage_ratio);
    crate::log_blank();

    print_grouped("By category", &agg.by_category);
    crate::log_blank();
    print_top(&format!("Top {} makers", TOP_N), &agg.top_makers);
    crate::log_blank();
    print_decades(&agg);
    crate::log_blank();
    print_grouped("By status", &agg.by_status);
    crate::log_blank();
    print_top(&format!("Top {} contributors", TOP_N), &agg.top_contributors);
    Ok(())
}
