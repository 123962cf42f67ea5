use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_catalog::RecordPatch;
use rmgd_core::{Action, RecordKind};
use rmgd_lib::{check_edit, ObjectStorage, StorageError};

use crate::CliError;
use crate::context::Context;

/// Upload an image and append its URL to the record.
pub(crate) fn run_upload(ctx: &Context, kind: RecordKind, id: &str, file: &Path) -> Result<(), CliError> {
    let actor = ctx.require_action(Action::Upload)?;
    let record = ctx.find_record(kind, &actor, id)?;

    let mut images = record.images.clone();
    let touch = RecordPatch {
        images: Some(images.clone()),
        ..Default::default()
    };
    check_edit(kind, &actor, &record, &touch)?;

    let storage = ctx.object_storage();
    let url = storage.upload(kind.image_folder(), file)?;
    images.push(url.clone());
    let patch = RecordPatch {
        images: Some(images),
        ..Default::default()
    };

    if let Err(e) = ctx.store().update(kind, id, &patch) {
        // Do not leave an orphaned object behind.
        if let Err(cleanup) = storage.delete(&url) {
            log::warn!("Could not remove uploaded image {}: {}", url, cleanup);
        }
        return Err(e.into());
    }

    log::info!(
        "Attached {} to {} '{}'",
        url.if_supports_color(Stdout, |t| t.cyan()),
        kind,
        record.name,
    );
    Ok(())
}

/// Detach an image URL from a record and delete the stored object.
pub(crate) fn run_remove_image(
    ctx: &Context,
    kind: RecordKind,
    id: &str,
    url: &str,
) -> Result<(), CliError> {
    let actor = ctx.require_action(Action::Upload)?;
    let record = ctx.find_record(kind, &actor, id)?;
    if !record.images.iter().any(|u| u == url) {
        return Err(CliError::other(format!(
            "{} '{}' has no image {}",
            kind, record.id, url
        )));
    }

    let patch = RecordPatch {
        images: Some(record.images.iter().filter(|u| *u != url).cloned().collect()),
        ..Default::default()
    };
    check_edit(kind, &actor, &record, &patch)?;
    ctx.store().update(kind, id, &patch)?;

    match ctx.object_storage().delete(url) {
        Ok(()) => {}
        Err(StorageError::ForeignUrl(_)) => {
            log::info!("Image is hosted elsewhere; only the link was removed.");
        }
        Err(e) => log::warn!("Link removed, but the stored file could not be deleted: {}", e),
    }
    log::info!("Removed image from {} '{}'", kind, record.name);
    Ok(())
}
