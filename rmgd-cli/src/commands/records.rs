use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_catalog::RecordPatch;
use rmgd_core::{Action, RecordKind, RecordStatus};
use rmgd_lib::{check_edit, new_submission, ObjectStorage, StorageError};

use crate::CliError;
use crate::cli_types::RecordFields;
use crate::context::Context;

use super::{confirm, print_record_detail};

/// Submit a new record.
pub(crate) fn run_add(ctx: &Context, kind: RecordKind, fields: &RecordFields) -> Result<(), CliError> {
    let actor = ctx.require_action(Action::Create)?;
    let now = rmgd_db::now_timestamp();
    let record = new_submission(kind, &actor, &fields.to_patch(), &now)?;
    let stored = ctx.store().create(kind, &record)?;

    log::info!(
        "{} {} {}",
        "Created".if_supports_color(Stdout, |t| t.green()),
        kind,
        stored.id.if_supports_color(Stdout, |t| t.bold()),
    );
    print_record_detail(&stored);
    if stored.status == RecordStatus::Pending {
        log::info!("Your submission is waiting for review.");
    }
    Ok(())
}

/// Apply a partial update to one record.
pub(crate) fn run_edit(
    ctx: &Context,
    kind: RecordKind,
    id: &str,
    fields: &RecordFields,
) -> Result<(), CliError> {
    let actor = ctx.actor()?;
    let patch = fields.to_patch();
    if patch.is_empty() {
        return Err(CliError::other("Nothing to change; pass at least one field"));
    }
    let record = ctx.find_record(kind, &actor, id)?;
    check_edit(kind, &actor, &record, &patch)?;

    let updated = ctx.store().update(kind, id, &patch)?;
    log::info!(
        "{} {} {}",
        "Updated".if_supports_color(Stdout, |t| t.green()),
        kind,
        updated.id.if_supports_color(Stdout, |t| t.bold()),
    );
    print_record_detail(&updated);
    Ok(())
}

/// Delete a record, then its stored images.
pub(crate) fn run_delete(ctx: &Context, kind: RecordKind, id: &str, yes: bool) -> Result<(), CliError> {
    let actor = ctx.require_action(Action::Delete)?;
    let record = ctx.find_record(kind, &actor, id)?;

    if !yes && !confirm(&format!("Delete {} '{}' ({})?", kind, record.name, record.id))? {
        log::info!("Aborted.");
        return Ok(());
    }

    ctx.store().delete(kind, id)?;

    let storage = ctx.object_storage();
    for url in &record.images {
        match storage.delete(url) {
            Ok(()) => log::debug!("Deleted image {}", url),
            Err(StorageError::ForeignUrl(_)) => log::debug!("Leaving external image {}", url),
            Err(e) => log::warn!("Could not delete image {}: {}", url, e),
        }
    }

    log::info!(
        "{} {} {}",
        "Deleted".if_supports_color(Stdout, |t| t.red()),
        kind,
        record.id.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

/// Set the moderation status of one record.
pub(crate) fn run_review(
    ctx: &Context,
    kind: RecordKind,
    id: &str,
    status: RecordStatus,
) -> Result<(), CliError> {
    let actor = ctx.require_action(Action::Review)?;
    let record = ctx.find_record(kind, &actor, id)?;
    let patch = RecordPatch {
        status: Some(status),
        ..Default::default()
    };
    check_edit(kind, &actor, &record, &patch)?;

    let updated = ctx.store().update(kind, id, &patch)?;
    log::info!(
        "{} '{}': {} -> {}",
        kind,
        updated.name,
        record.status,
        updated.status.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}
