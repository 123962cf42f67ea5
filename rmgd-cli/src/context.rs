//! Per-invocation context: resolved settings, the record store, the local
//! identity provider and the object storage.

use std::path::PathBuf;

use rmgd_catalog::Record;
use rmgd_core::{Action, RecordKind, View};
use rmgd_lib::{
    Actor, CatalogState, HttpRecordSource, IdentityProvider, LocalIdentity, LocalObjectStorage,
    RecordStore, Settings, SqliteStore,
};
use rusqlite::Connection;

use crate::CliError;

pub(crate) struct Context {
    pub settings: Settings,
    local: SqliteStore,
    remote: Option<HttpRecordSource>,
    session_file: PathBuf,
}

impl Context {
    /// Open the local database and, when configured, the REST API client.
    pub fn open(settings: Settings) -> Result<Self, CliError> {
        let local = SqliteStore::open(&settings.database)?;
        let remote = settings
            .api_url
            .as_deref()
            .map(HttpRecordSource::new)
            .transpose()?;
        log::debug!("Database: {}", settings.database.display());
        if let Some(url) = &settings.api_url {
            log::debug!("Records via API: {}", url);
        }
        Ok(Self {
            settings,
            local,
            remote,
            session_file: LocalIdentity::default_session_file(),
        })
    }

    /// Local database. Accounts, sessions and the import log always live here.
    pub fn conn(&self) -> &Connection {
        self.local.connection()
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Where records are read from and written to.
    pub fn store(&self) -> &dyn RecordStore {
        match &self.remote {
            Some(remote) => remote as &dyn RecordStore,
            None => &self.local,
        }
    }

    pub fn identity(&self) -> LocalIdentity<'_> {
        LocalIdentity::new(self.conn(), self.session_file.clone())
    }

    pub fn object_storage(&self) -> LocalObjectStorage {
        LocalObjectStorage::new(
            self.settings.storage_root.clone(),
            &self.settings.public_base_url,
        )
    }

    pub fn current_actor(&self) -> Result<Option<Actor>, CliError> {
        Ok(self.identity().current()?)
    }

    pub fn actor(&self) -> Result<Actor, CliError> {
        self.current_actor()?.ok_or(CliError::NotSignedIn)
    }

    pub fn require_view(&self, view: View) -> Result<Actor, CliError> {
        let actor = self.actor()?;
        if !actor.capabilities().can_view(view) {
            return Err(CliError::forbidden(
                actor.role,
                format!("open the {} view", view.label()),
            ));
        }
        Ok(actor)
    }

    pub fn require_action(&self, action: Action) -> Result<Actor, CliError> {
        let actor = self.actor()?;
        if !actor.capabilities().can(action) {
            return Err(CliError::forbidden(actor.role, format!("perform '{action}'")));
        }
        Ok(actor)
    }

    /// Fetch one kind wholesale, hiding records `actor` may not see.
    ///
    /// Contributors see public records plus their own submissions.
    pub fn load_state(&self, kind: RecordKind, actor: &Actor) -> Result<CatalogState, CliError> {
        let mut state = CatalogState::new(kind);
        state.refresh(self.store())?;
        if !actor.role.is_trusted() {
            state.retain(|r| {
                r.status.is_public() || r.submitted_by.as_deref() == Some(actor.username.as_str())
            });
        }
        Ok(state)
    }

    /// Look up one visible record.
    pub fn find_record(
        &self,
        kind: RecordKind,
        actor: &Actor,
        id: &str,
    ) -> Result<Record, CliError> {
        let state = self.load_state(kind, actor)?;
        state
            .find(id)
            .cloned()
            .ok_or_else(|| CliError::not_found(kind, id))
    }
}

/// The list view a kind is shown in.
pub(crate) fn kind_view(kind: RecordKind) -> View {
    match kind {
        RecordKind::Games => View::Games,
        RecordKind::Devices => View::Devices,
    }
}
