use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_core::{RecordKind, View};
use rmgd_lib::{write_aggregates_csv, write_records_csv};

use crate::CliError;
use crate::cli_types::FilterArgs;
use crate::context::Context;

/// Export the filtered records, or the aggregates, to CSV.
pub(crate) fn run_report(
    ctx: &Context,
    kind: RecordKind,
    filters: &FilterArgs,
    output: &Path,
    aggregates: bool,
) -> Result<(), CliError> {
    let actor = ctx.require_view(View::Reports)?;
    let mut state = ctx.load_state(kind, &actor)?;
    state.set_criteria(filters.to_criteria(&actor.username));
    let view = state.view();

    let out = BufWriter::new(File::create(output)?);
    if aggregates {
        // Aggregates always describe the whole collection.
        write_aggregates_csv(&view.aggregates, out)?;
        log::info!(
            "Wrote aggregates for {} {} to {}",
            view.total,
            kind,
            output.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    } else {
        write_records_csv(&view.filtered, out)?;
        log::info!(
            "Wrote {} of {} {} to {}",
            view.filtered_count,
            view.total,
            kind,
            output.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}
