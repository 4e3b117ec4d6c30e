//! Session repository: load, save, import, export and reset.
//!
//! Failures never reach the caller. Unreadable or unparsable slots and
//! rejected schema versions load as `None`; failed writes are logged and
//! the in-memory state stays authoritative for the rest of the session.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::migration::{MigrationChain, MigrationError};
use super::store::{SessionStore, StoreError};
use crate::core::SessionState;

/// Internal failure taxonomy, logged and then mapped to `None`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed session JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("incompatible session record: {0}")]
    Migration(#[from] MigrationError),

    #[error("session storage failed: {0}")]
    Store(#[from] StoreError),
}

/// Parse, migrate and decode a session record.
pub fn decode_session(json: &str, migrations: &MigrationChain) -> Result<SessionState, SessionError> {
    let raw: Value = serde_json::from_str(json)?;
    let migrated = migrations.migrate(raw)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Compact JSON for the durable slot.
pub fn encode_session(state: &SessionState) -> Result<String, SessionError> {
    Ok(serde_json::to_string(state)?)
}

/// Pretty (2-space indented) JSON for export files.
pub fn export_session(state: &SessionState) -> Result<String, SessionError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Persistence front for one `SessionStore`.
///
/// ## Example
///
/// ```
/// use values_sort::core::SessionState;
/// use values_sort::persistence::{MemoryStore, SessionRepository};
///
/// let mut repo = SessionRepository::new(MemoryStore::new());
/// assert!(repo.load().is_none());
///
/// let mut state = SessionState::new();
/// state.selected_card_ids.push_back("honesty".into());
/// repo.save(&mut state);
///
/// assert_eq!(repo.load().unwrap().selected_card_ids, state.selected_card_ids);
/// ```
#[derive(Debug)]
pub struct SessionRepository<S> {
    store: S,
    migrations: MigrationChain,
}

impl<S: SessionStore> SessionRepository<S> {
    /// Create a repository using the built-in migration chain.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_migrations(store, MigrationChain::builtin())
    }

    /// Create a repository with a custom migration chain.
    #[must_use]
    pub fn with_migrations(store: S, migrations: MigrationChain) -> Self {
        Self { store, migrations }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The migration chain records pass through.
    #[must_use]
    pub fn migrations(&self) -> &MigrationChain {
        &self.migrations
    }

    /// Load the persisted session, or `None` if there is no usable record.
    pub fn load(&self) -> Option<SessionState> {
        let raw = match self.store.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted session");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "could not read session slot, starting fresh");
                return None;
            }
        };

        match decode_session(&raw, &self.migrations) {
            Ok(state) => {
                info!(
                    selected = state.selected_card_ids.len(),
                    groups = state.groups.len(),
                    "loaded persisted session"
                );
                Some(state)
            }
            Err(e) => {
                warn!(error = %e, "discarding persisted session");
                None
            }
        }
    }

    /// Stamp `updated_at` and write the full record.
    ///
    /// Returns whether the write reached the store. Failures are logged
    /// and otherwise ignored.
    pub fn save(&mut self, state: &mut SessionState) -> bool {
        state.touch();
        let written = encode_session(state)
            .and_then(|json| self.store.write(&json).map_err(SessionError::from));
        match written {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "session not persisted, keeping in-memory state");
                false
            }
        }
    }

    /// Remove the persisted record. Failures are logged and ignored.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not clear session slot");
        }
    }

    /// Fresh state, persisted over any previous record.
    pub fn reset(&mut self) -> SessionState {
        let mut state = SessionState::new();
        self.save(&mut state);
        info!("session reset");
        state
    }

    /// Parse user-supplied JSON through the same gate as `load`.
    ///
    /// On success `updated_at` is re-stamped. Nothing is persisted here;
    /// the caller replaces its state and saves.
    pub fn import(&self, json: &str) -> Option<SessionState> {
        match decode_session(json, &self.migrations) {
            Ok(mut state) => {
                state.touch();
                info!(groups = state.groups.len(), "session imported");
                Some(state)
            }
            Err(e) => {
                warn!(error = %e, "import rejected");
                None
            }
        }
    }

    /// Pretty JSON of the full record for download.
    pub fn export(&self, state: &SessionState) -> Result<String, SessionError> {
        export_session(state)
    }
}
