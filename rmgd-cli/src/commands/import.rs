use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_catalog::{load_records_file, normalize_all};
use rmgd_core::{Action, RecordKind};
use rmgd_lib::{import_records, ImportProgress};

use crate::CliError;
use crate::context::Context;

/// Progress bar fed by the importer.
struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    fn new(total: usize) -> Self {
        let pb = if log::log_enabled!(log::Level::Info) {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) =
            ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        Self { pb }
    }
}

impl ImportProgress for BarProgress {
    fn on_record(&self, current: usize, total: usize, id: &str) {
        self.pb.set_length(total as u64);
        self.pb.set_position(current as u64);
        self.pb.set_message(id.to_string());
    }

    fn on_complete(&self, message: &str) {
        self.pb.finish_and_clear();
        log::info!("{}", message);
    }
}

/// Bulk-import a JSON or YAML file.
///
/// Locally the whole file goes in one transaction and is logged; against
/// the REST API each record is posted individually.
pub(crate) fn run_import(ctx: &Context, kind: RecordKind, file: &Path) -> Result<(), CliError> {
    let actor = ctx.require_action(Action::Create)?;
    if !actor.capabilities().can(Action::EditAny) {
        return Err(CliError::forbidden(actor.role, "bulk import"));
    }

    let raws = load_records_file(file).map_err(|e| CliError::Load {
        path: file.display().to_string(),
        source: e,
    })?;
    let source_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    log::info!(
        "Importing {} raw {} from {}",
        raws.len(),
        kind,
        source_name.if_supports_color(Stdout, |t| t.cyan()),
    );

    let progress = BarProgress::new(raws.len());

    if !ctx.is_remote() {
        import_records(ctx.conn(), kind, &raws, &source_name, Some(&progress))?;
        return Ok(());
    }

    let objects: Vec<_> = raws.into_iter().filter(|raw| raw.is_object()).collect();
    let records = normalize_all(&objects);
    let total = records.len();
    let mut failed = 0usize;
    for (i, record) in records.iter().enumerate() {
        if let Err(e) = ctx.store().create(kind, record) {
            progress.pb.suspend(|| log::warn!("{}: {}", record.id, e));
            failed += 1;
        }
        progress.on_record(i + 1, total, &record.id);
    }
    progress.on_complete(&format!(
        "Posted {} of {} {} ({} failed)",
        total - failed,
        total,
        kind,
        failed
    ));
    Ok(())
}
