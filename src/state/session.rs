//! Session holder: at most one logged-in user, kept in the `session` document.

use chrono::Utc;

use super::credentials::CredentialStore;
use super::data::SessionRecord;
use super::store::{DocumentStore, SESSION_KEY};
use crate::error::Result;

pub struct SessionHolder {
    store: DocumentStore,
    current: Option<SessionRecord>,
}

impl SessionHolder {
    /// Restore the persisted session, if any.
    pub fn load(store: DocumentStore) -> Result<Self> {
        let current = store.load_typed(SESSION_KEY)?;
        Ok(Self { store, current })
    }

    /// Verify the pair and start a session. A failed login changes nothing.
    pub fn login(
        &mut self,
        credentials: &CredentialStore,
        username: &str,
        secret: &str,
    ) -> Result<&SessionRecord> {
        credentials.verify(username, secret)?;

        let record = SessionRecord {
            username: username.trim().to_string(),
            started_at: Utc::now(),
        };
        self.store.save_typed(SESSION_KEY, &record)?;

        tracing::info!("User {} logged in", record.username);
        Ok(self.current.insert(record))
    }

    /// End the session and drop the persisted document. Safe to call twice.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.current.take() {
            tracing::info!("User {} logged out", session.username);
        }
        self.store.delete_json(SESSION_KEY)
    }

    pub fn current(&self) -> Option<&SessionRecord> {
        self.current.as_ref()
    }
}
