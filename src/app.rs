//! Top-level application context.
//!
//! `App` owns every piece of state and is the only entry point a UI layer
//! needs: accounts, the session, and the media registry.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::media::descriptor::FileDescriptor;
use crate::media::filter::ImportPolicy;
use crate::media::preview::PreviewBlob;
use crate::media::scan::scan_directory;
use crate::state::credentials::CredentialStore;
use crate::state::data::{FileEntry, Folder, SessionRecord};
use crate::state::projector::Projector;
use crate::state::registry::{ImportResult, MediaRegistry};
use crate::state::session::SessionHolder;
use crate::state::store::DocumentStore;

pub struct App {
    store: DocumentStore,
    credentials: CredentialStore,
    session: SessionHolder,
    registry: MediaRegistry,
}

impl App {
    /// Open the on-disk store named by the config and restore all state.
    pub fn open(config: &Config) -> Result<Self> {
        let store = DocumentStore::open(config.database_path())?;
        Self::with_store(store, ImportPolicy::from_config(config))
    }

    pub fn with_store(store: DocumentStore, policy: ImportPolicy) -> Result<Self> {
        let credentials = CredentialStore::load(store.clone())?;
        let session = SessionHolder::load(store.clone())?;
        let registry = MediaRegistry::load(Projector::new(store.clone()), policy)?;

        Ok(Self {
            store,
            credentials,
            session,
            registry,
        })
    }

    // ========== Accounts ==========

    pub fn register(&mut self, username: &str, secret: &str) -> Result<()> {
        self.credentials.register(username, secret)
    }

    pub fn login(&mut self, username: &str, secret: &str) -> Result<&SessionRecord> {
        self.session.login(&self.credentials, username, secret)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()
    }

    pub fn current_session(&self) -> Option<&SessionRecord> {
        self.session.current()
    }

    // ========== Media ==========

    pub async fn import_files(&mut self, descriptors: Vec<FileDescriptor>) -> ImportResult {
        self.registry.import_files(descriptors).await
    }

    /// Import every file under a directory on disk.
    pub async fn import_directory(&mut self, dir: &Path) -> ImportResult {
        let descriptors = scan_directory(dir);
        self.registry.import_files(descriptors).await
    }

    pub fn list_folders(&self, query: &str) -> Vec<&str> {
        self.registry.list_folders(query)
    }

    pub fn get_folder(&self, key: &str) -> Option<&Folder> {
        self.registry.get_folder(key)
    }

    pub fn open_file(
        &self,
        folder_key: &str,
        file_name: &str,
    ) -> Option<(&FileEntry, Option<&PreviewBlob>)> {
        self.registry.open_file(folder_key, file_name)
    }

    pub fn preview(&self, entry: &FileEntry) -> Option<&PreviewBlob> {
        self.registry.preview(entry)
    }

    pub fn export_file(
        &self,
        folder_key: &str,
        file_name: &str,
        dest_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        self.registry.export_file(folder_key, file_name, dest_dir)
    }

    /// Delete an entry. Confirmation is the caller's job.
    pub fn delete_file(&mut self, folder_key: &str, file_name: &str) -> Result<bool> {
        self.registry.delete_file(folder_key, file_name)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("store", &self.store)
            .field("users", &self.credentials.user_count())
            .field("session", &self.session.current())
            .field("folders", &self.registry.folders().len())
            .finish()
    }
}
