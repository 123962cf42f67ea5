use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_catalog::FilterCriteria;
use rmgd_core::{Action, RecordKind, RecordStatus, View};

use crate::CliError;
use crate::cli_types::FilterArgs;
use crate::context::{Context, kind_view};

use super::print_records;

/// Filtered list of one collection.
pub(crate) fn run_list(
    ctx: &Context,
    kind: RecordKind,
    filters: &FilterArgs,
    limit: Option<usize>,
) -> Result<(), CliError> {
    let actor = ctx.require_view(kind_view(kind))?;
    if filters.mine && !actor.capabilities().can_view(View::MySubmissions) {
        return Err(CliError::forbidden(actor.role, "open My Submissions"));
    }

    let mut state = ctx.load_state(kind, &actor)?;
    state.set_criteria(filters.to_criteria(&actor.username));
    let view = state.view();

    log::info!(
        "{} {}",
        kind.display_name().if_supports_color(Stdout, |t| t.bold()),
        view.summary().if_supports_color(Stdout, |t| t.dimmed()),
    );
    if view.filtered.is_empty() {
        log::info!("  No records match.");
        return Ok(());
    }

    let shown = limit.unwrap_or(view.filtered.len()).min(view.filtered.len());
    print_records(&view.filtered[..shown]);
    if shown < view.filtered.len() {
        log::info!("  ... {} more (use --limit)", view.filtered.len() - shown);
    }
    Ok(())
}

/// Pending submissions awaiting review.
pub(crate) fn run_review_queue(ctx: &Context, kind: RecordKind) -> Result<(), CliError> {
    let actor = ctx.require_view(View::Review)?;
    if !actor.capabilities().can(Action::Review) {
        return Err(CliError::forbidden(actor.role, "review submissions"));
    }

    let mut state = ctx.load_state(kind, &actor)?;
    state.set_criteria(FilterCriteria::new().status(RecordStatus::Pending));
    let view = state.view();

    log::info!(
        "{} {}",
        format!("{} review queue", kind.display_name()).if_supports_color(Stdout, |t| t.bold()),
        format!("({} pending)", view.filtered_count).if_supports_color(Stdout, |t| t.dimmed()),
    );
    if view.filtered.is_empty() {
        log::info!("  Nothing to review.");
        return Ok(());
    }
    print_records(&view.filtered);
    crate::log_blank();
    log::info!(
        "Approve with 'rmgd review {} <id> approved' or reject with '... rejected'.",
        kind
    );
    Ok(())
}
