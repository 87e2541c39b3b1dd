//! Media registry: imported folders, their file entries and live previews.
//!
//! The registry is the only mutable copy of the gallery during a session.
//! Every mutation is followed by a full manifest snapshot through the
//! [`Projector`]; the snapshot never flows back into a live registry except
//! once, on [`MediaRegistry::load`].

use futures::stream::{FuturesUnordered, StreamExt};
use std::path::{Path, PathBuf};

use super::data::{FileEntry, Folder, FolderKey, Preview};
use super::projector::Projector;
use crate::error::{AppError, Result};
use crate::media::descriptor::FileDescriptor;
use crate::media::filter::ImportPolicy;
use crate::media::preview::{PreviewBlob, PreviewStore};

/// Outcome of one import call
#[derive(Debug, Default)]
pub struct ImportResult {
    pub imported_count: usize,
    /// Files that produced no entry, with the reason
    pub skipped: Vec<SkippedFile>,
    /// Manifest writes that failed; the next successful write covers them
    pub persist_failures: usize,
}

impl ImportResult {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

#[derive(Debug)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: AppError,
}

pub struct MediaRegistry {
    /// In key insertion order
    folders: Vec<Folder>,
    previews: PreviewStore,
    policy: ImportPolicy,
    projector: Projector,
}

impl MediaRegistry {
    /// Start from the persisted manifest; restored entries have no previews.
    pub fn load(projector: Projector, policy: ImportPolicy) -> Result<Self> {
        let folders = projector.load()?;
        Ok(Self {
            folders,
            previews: PreviewStore::new(),
            policy,
            projector,
        })
    }

    /// Import a batch of picked files.
    ///
    /// Non-images are skipped up front. The remaining byte reads run
    /// concurrently; each file is appended to its folder as its read
    /// completes, so append order is completion order, and the manifest is
    /// written after every single append.
    pub async fn import_files(&mut self, descriptors: Vec<FileDescriptor>) -> ImportResult {
        let mut result = ImportResult::default();
        let mut pending = FuturesUnordered::new();

        for descriptor in descriptors {
            let (info, bytes) = descriptor.into_parts();

            if !self.policy.accepts(info.name(), &info.media_type) {
                tracing::warn!("Skipping non-image file: {}", info.relative_path);
                result.skipped.push(SkippedFile {
                    reason: AppError::UnsupportedFileType(info.name().to_string()),
                    relative_path: info.relative_path,
                });
                continue;
            }

            let key = self.policy.folder_key(&info.relative_path);
            pending.push(async move { (key, info, bytes.await) });
        }

        while let Some((key, info, outcome)) = pending.next().await {
            let bytes = match outcome {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {}: {}", info.relative_path, e);
                    result.skipped.push(SkippedFile {
                        relative_path: info.relative_path,
                        reason: e.into(),
                    });
                    continue;
                }
            };

            let handle = self.previews.create(bytes, &info.media_type);
            let entry = FileEntry {
                name: info.name().to_string(),
                relative_path: info.relative_path,
                media_type: info.media_type,
                size_bytes: info.size,
                preview: Preview::Live(handle),
            };
            self.append(key, entry);
            result.imported_count += 1;

            if let Err(e) = self.projector.save(&self.folders) {
                tracing::error!("Failed to write media manifest: {}", e);
                result.persist_failures += 1;
            }
        }

        tracing::info!(
            "Import complete: {} new, {} skipped",
            result.imported_count,
            result.skipped_count()
        );
        result
    }

    fn append(&mut self, key: FolderKey, entry: FileEntry) {
        match self.position(&key) {
            Some(index) => self.folders[index].files.push(entry),
            None => {
                let mut folder = Folder::new(key);
                folder.files.push(entry);
                self.folders.push(folder);
            }
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.folders.iter().position(|f| f.key == key)
    }

    /// Keys whose text, or any file name inside, contains `query`
    /// (case-insensitive). An empty query matches everything.
    pub fn list_folders(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.folders
            .iter()
            .filter(|folder| {
                query.is_empty()
                    || folder.key.to_lowercase().contains(&query)
                    || folder
                        .files
                        .iter()
                        .any(|f| f.name.to_lowercase().contains(&query))
            })
            .map(|folder| folder.key.as_str())
            .collect()
    }

    pub fn get_folder(&self, key: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.key == key)
    }

    /// All folders in key insertion order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// First entry named `file_name` in the folder, with its preview bytes
    /// when they are still in memory.
    pub fn open_file(
        &self,
        folder_key: &str,
        file_name: &str,
    ) -> Option<(&FileEntry, Option<&PreviewBlob>)> {
        let entry = self.get_folder(folder_key)?.file(file_name)?;
        let blob = entry.preview_handle().and_then(|h| self.previews.get(h));
        Some((entry, blob))
    }

    /// Bytes behind a live preview handle.
    pub fn preview(&self, entry: &FileEntry) -> Option<&PreviewBlob> {
        self.previews.get(entry.preview_handle()?)
    }

    /// Number of previews currently held in memory.
    pub fn live_previews(&self) -> usize {
        self.previews.len()
    }

    /// Remove the first entry named `file_name` and release its preview.
    ///
    /// The folder goes away with its last file. Returns `false` without
    /// touching anything when the folder or file does not exist. If the
    /// manifest write fails, the entry is put back and its preview kept.
    pub fn delete_file(&mut self, folder_key: &str, file_name: &str) -> Result<bool> {
        let Some(index) = self.position(folder_key) else {
            tracing::debug!("Delete ignored, no folder {}", folder_key);
            return Ok(false);
        };

        let folder = &mut self.folders[index];
        let Some(file_index) = folder.files.iter().position(|f| f.name == file_name) else {
            tracing::debug!("Delete ignored, no file {} in {}", file_name, folder_key);
            return Ok(false);
        };

        let entry = folder.files.remove(file_index);
        let emptied = if folder.files.is_empty() {
            Some(self.folders.remove(index))
        } else {
            None
        };

        if let Err(e) = self.projector.save(&self.folders) {
            if let Some(folder) = emptied {
                self.folders.insert(index, folder);
            }
            self.folders[index].files.insert(file_index, entry);
            tracing::error!("Delete of {} from {} rolled back: {}", file_name, folder_key, e);
            return Err(e);
        }

        if let Some(handle) = entry.preview_handle() {
            self.previews.release(handle);
        }
        if emptied.is_some() {
            tracing::info!("Removed empty folder {}", folder_key);
        }
        tracing::info!("Deleted {} from {}", file_name, folder_key);
        Ok(true)
    }

    /// Write the preview bytes of an entry to `dest_dir/<name>`.
    ///
    /// Returns `None` when the folder or file does not exist.
    pub fn export_file(
        &self,
        folder_key: &str,
        file_name: &str,
        dest_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some((entry, blob)) = self.open_file(folder_key, file_name) else {
            return Ok(None);
        };
        let blob = blob.ok_or_else(|| AppError::PreviewUnavailable(entry.name.clone()))?;

        std::fs::create_dir_all(dest_dir)?;
        let target = dest_dir.join(&entry.name);
        std::fs::write(&target, &blob.bytes)?;

        tracing::info!("Exported {} to {}", entry.relative_path, target.display());
        Ok(Some(target))
    }
}
