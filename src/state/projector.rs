//! Writes the metadata-only projection of the media registry to the
//! `media-manifest` document, and reads it back on startup.

use super::data::{FileEntry, Folder, FolderMeta, Manifest};
use super::store::{DocumentStore, MANIFEST_KEY};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Projector {
    store: DocumentStore,
}

impl Projector {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Metadata-only deep copy of the live folders. Empty folders are left out.
    pub fn project(folders: &[Folder]) -> Manifest {
        Manifest {
            folders: folders
                .iter()
                .filter(|folder| !folder.files.is_empty())
                .map(|folder| FolderMeta {
                    key: folder.key.clone(),
                    files: folder.files.iter().map(FileEntry::metadata).collect(),
                    created_at: folder.created_at,
                })
                .collect(),
        }
    }

    /// Overwrite the manifest with a full snapshot of `folders`.
    pub fn save(&self, folders: &[Folder]) -> Result<()> {
        self.store.save_typed(MANIFEST_KEY, &Self::project(folders))
    }

    /// Rebuild folders from the manifest. Every preview comes back `Unavailable`.
    pub fn load(&self) -> Result<Vec<Folder>> {
        let manifest: Manifest = self.store.load_typed(MANIFEST_KEY)?.unwrap_or_default();

        let folders: Vec<Folder> = manifest
            .folders
            .into_iter()
            .filter(|meta| !meta.files.is_empty())
            .map(|meta| Folder {
                key: meta.key,
                files: meta.files.into_iter().map(FileEntry::from_metadata).collect(),
                created_at: meta.created_at,
            })
            .collect();

        tracing::debug!("Restored {} folders from manifest", folders.len());
        Ok(folders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Preview, PreviewHandle};

    fn entry(name: &str, dir: &str, size: u64) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            relative_path: format!("{}/{}", dir, name),
            media_type: "image/png".to_string(),
            size_bytes: size,
            preview: Preview::Live(PreviewHandle::new(size)),
        }
    }

    fn sample_folders() -> Vec<Folder> {
        let mut study_a = Folder::new("studyA".to_string());
        study_a.files.push(entry("scan1.png", "studyA", 10));
        study_a.files.push(entry("scan2.png", "studyA", 20));
        let mut study_b = Folder::new("studyB".to_string());
        study_b.files.push(entry("scan3.png", "studyB", 30));
        vec![study_a, study_b]
    }

    #[test]
    fn test_save_does_not_touch_live_folders() {
        let projector = Projector::new(DocumentStore::open_in_memory().unwrap());
        let folders = sample_folders();
        let before = folders.clone();

        projector.save(&folders).unwrap();
        assert_eq!(folders, before);
    }

    #[test]
    fn test_manifest_has_no_preview_handles() {
        let store = DocumentStore::open_in_memory().unwrap();
        let projector = Projector::new(store.clone());
        projector.save(&sample_folders()).unwrap();

        let raw = store.load_json(MANIFEST_KEY).unwrap().unwrap();
        assert!(!raw.contains("preview"));
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["folders"][0]["key"], "studyA");
        assert_eq!(json["folders"][0]["files"][1]["relativePath"], "studyA/scan2.png");
    }

    #[test]
    fn test_reload_restores_metadata_without_previews() {
        let projector = Projector::new(DocumentStore::open_in_memory().unwrap());
        let folders = sample_folders();
        projector.save(&folders).unwrap();

        let restored = projector.load().unwrap();
        assert_eq!(restored.len(), folders.len());
        for (live, back) in folders.iter().zip(&restored) {
            assert_eq!(live.key, back.key);
            assert_eq!(live.created_at, back.created_at);
            assert_eq!(live.files.len(), back.files.len());
            for (a, b) in live.files.iter().zip(&back.files) {
                assert_eq!(a.metadata(), b.metadata());
                assert_eq!(b.preview, Preview::Unavailable);
            }
        }
    }

    #[test]
    fn test_empty_folders_are_never_persisted() {
        let projector = Projector::new(DocumentStore::open_in_memory().unwrap());
        let mut folders = sample_folders();
        folders.push(Folder::new("empty".to_string()));

        let manifest = Projector::project(&folders);
        assert_eq!(manifest.folders.len(), 2);

        projector.save(&folders).unwrap();
        assert!(projector.load().unwrap().iter().all(|f| f.key != "empty"));
    }

    #[test]
    fn test_missing_manifest_loads_empty() {
        let projector = Projector::new(DocumentStore::open_in_memory().unwrap());
        assert!(projector.load().unwrap().is_empty());
    }
}
