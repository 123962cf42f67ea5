//! Building new submissions and checking edits against the actor's role.

use rmgd_catalog::{Record, RecordPatch};
use rmgd_core::{Action, RecordKind, RecordStatus};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::session::Actor;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("A name is required")]
    MissingName,
    #[error("Status '{status}' is not valid for {kind}")]
    InvalidStatus { kind: RecordKind, status: RecordStatus },
    #[error("Role '{role}' is not allowed to {action}")]
    Forbidden { role: String, action: &'static str },
}

/// Lowercase, hyphen-separated ASCII slug.
pub fn slugify(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_separator = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !result.is_empty() {
            result.push('-');
            last_was_separator = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

fn submission_id(name: &str, actor: &Actor, now: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(b"\0");
    hasher.update(actor.username.as_bytes());
    hasher.update(b"\0");
    hasher.update(now.as_bytes());
    let digest = hasher.finalize();
    let suffix: String = digest[..4].iter().map(|b| format!("{b:02x}")).collect();

    let mut slug = slugify(name);
    slug.truncate(48);
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        suffix
    } else {
        format!("{slug}-{suffix}")
    }
}

fn forbidden(actor: &Actor, action: &'static str) -> SubmitError {
    SubmitError::Forbidden {
        role: actor.role.as_str().to_string(),
        action,
    }
}

/// Build a new record from a draft.
///
/// Trusted roles publish directly (status defaults to `active`); anything a
/// contributor submits starts out `pending` for review.
pub fn new_submission(
    kind: RecordKind,
    actor: &Actor,
    draft: &RecordPatch,
    now: &str,
) -> Result<Record, SubmitError> {
    let caps = actor.capabilities();
    if !caps.can(Action::Create) {
        return Err(forbidden(actor, "create records"));
    }
    let name = draft
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(SubmitError::MissingName)?;

    let status = if actor.role.is_trusted() {
        draft.status.unwrap_or(RecordStatus::Active)
    } else {
        RecordStatus::Pending
    };
    if !status.is_allowed_for(kind) {
        return Err(SubmitError::InvalidStatus { kind, status });
    }

    let mut record = Record::new(submission_id(name, actor, now), name);
    let patch = RecordPatch {
        status: Some(status),
        ..draft.clone()
    };
    patch.apply(&mut record, now);
    record.submitted_by = Some(actor.username.clone());
    record.created_at = Some(now.to_string());
    Ok(record)
}

/// Check that `actor` may apply `patch` to `record`.
///
/// Contributors may edit their own submissions but not change status;
/// status changes go through review.
pub fn check_edit(
    kind: RecordKind,
    actor: &Actor,
    record: &Record,
    patch: &RecordPatch,
) -> Result<(), SubmitError> {
    let caps = actor.capabilities();
    if !caps.can_edit(&actor.username, record.submitted_by.as_deref()) {
        return Err(forbidden(actor, "edit this record"));
    }
    if let Some(status) = patch.status {
        if !caps.can(Action::Review) && status != record.status {
            return Err(forbidden(actor, "change record status"));
        }
        if !status.is_allowed_for(kind) {
            return Err(SubmitError::InvalidStatus { kind, status });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/submit_tests.rs"]
mod tests;
