//! Credential store: plaintext demo accounts kept in the `users` document.

use chrono::Utc;
use std::collections::BTreeMap;

use super::data::UserRecord;
use super::store::{DocumentStore, USERS_KEY};
use crate::error::{AppError, Result};

pub struct CredentialStore {
    store: DocumentStore,
    users: BTreeMap<String, UserRecord>,
}

impl CredentialStore {
    /// Load the users document, starting empty when there is none.
    pub fn load(store: DocumentStore) -> Result<Self> {
        let users = store.load_typed(USERS_KEY)?.unwrap_or_default();
        Ok(Self { store, users })
    }

    /// Create a user and persist the whole store.
    pub fn register(&mut self, username: &str, secret: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() || secret.is_empty() || self.users.contains_key(username) {
            return Err(AppError::DuplicateUser(username.to_string()));
        }

        let record = UserRecord {
            secret: secret.to_string(),
            created_at: Utc::now(),
        };
        self.users.insert(username.to_string(), record);

        if let Err(e) = self.persist() {
            self.users.remove(username);
            return Err(e);
        }

        tracing::info!("Registered user {}", username);
        Ok(())
    }

    /// Succeeds only for an existing user with exactly this secret.
    pub fn verify(&self, username: &str, secret: &str) -> Result<()> {
        match self.users.get(username.trim()) {
            Some(record) if secrets_match(&record.secret, secret) => Ok(()),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn persist(&self) -> Result<()> {
        self.store.save_typed(USERS_KEY, &self.users)
    }
}

/// Plaintext, case-sensitive comparison. Swap this for a real scheme.
fn secrets_match(stored: &str, offered: &str) -> bool {
    stored == offered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_store() -> (DocumentStore, CredentialStore) {
        let store = DocumentStore::open_in_memory().unwrap();
        let credentials = CredentialStore::load(store.clone()).unwrap();
        (store, credentials)
    }

    #[test]
    fn test_register_then_verify() {
        let (_, mut credentials) = empty_store();
        credentials.register("alice", "s3cret").unwrap();

        assert!(credentials.verify("alice", "s3cret").is_ok());
        assert!(matches!(
            credentials.verify("alice", "S3CRET"),
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            credentials.verify("bob", "s3cret"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_duplicate_keeps_original_record() {
        let (_, mut credentials) = empty_store();
        credentials.register("alice", "first").unwrap();
        let created_at = credentials.get("alice").unwrap().created_at;

        let err = credentials.register("alice", "second").unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser(ref name) if name == "alice"));
        assert_eq!(credentials.get("alice").unwrap().created_at, created_at);
        assert!(credentials.verify("alice", "first").is_ok());
    }

    #[test]
    fn test_empty_arguments_are_rejected() {
        let (_, mut credentials) = empty_store();
        assert!(matches!(
            credentials.register("   ", "secret"),
            Err(AppError::DuplicateUser(_))
        ));
        assert!(matches!(
            credentials.register("alice", ""),
            Err(AppError::DuplicateUser(_))
        ));
        assert_eq!(credentials.user_count(), 0);
    }

    #[test]
    fn test_username_is_trimmed() {
        let (_, mut credentials) = empty_store();
        credentials.register("  alice ", "pw").unwrap();

        assert!(credentials.get("alice").is_some());
        assert!(credentials.verify(" alice", "pw").is_ok());
    }

    #[test]
    fn test_users_persist_across_loads() {
        let (store, mut credentials) = empty_store();
        credentials.register("alice", "pw").unwrap();

        let reloaded = CredentialStore::load(store.clone()).unwrap();
        assert_eq!(reloaded.user_count(), 1);
        assert!(reloaded.verify("alice", "pw").is_ok());

        let raw = store.load_json(USERS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["alice"]["secret"], "pw");
        assert!(json["alice"]["createdAt"].is_string());
    }
}
