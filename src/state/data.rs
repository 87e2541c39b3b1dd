/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the document store, the media registry and the UI layer.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grouping key of a folder: the directory part of a relative path,
/// or the root key for files without one.
pub type FolderKey = String;

/// A registered user. The username is the key of the users document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Plaintext secret (demo only, never hashed)
    pub secret: String,
    pub created_at: DateTime<Utc>,
}

/// The single logged-in user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub username: String,
    pub started_at: DateTime<Utc>,
}

/// Opaque reference to preview bytes held in memory for this session only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Preview state of a file entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    /// Bytes are in memory behind this handle
    Live(PreviewHandle),
    /// Restored from the manifest; render a placeholder
    Unavailable,
}

/// Represents a single imported image
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Filename only (e.g., "scan1.png")
    pub name: String,
    /// Path relative to the picked folder's parent (e.g., "studyA/scan1.png")
    pub relative_path: String,
    /// Best-effort media type, may be empty
    pub media_type: String,
    pub size_bytes: u64,
    pub preview: Preview,
}

impl FileEntry {
    /// Metadata-only copy, as written to the manifest
    pub fn metadata(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            relative_path: self.relative_path.clone(),
            size: self.size_bytes,
            media_type: self.media_type.clone(),
        }
    }

    /// Rebuild an entry from the manifest; its preview is gone
    pub fn from_metadata(meta: FileMeta) -> Self {
        Self {
            name: meta.name,
            relative_path: meta.relative_path,
            media_type: meta.media_type,
            size_bytes: meta.size,
            preview: Preview::Unavailable,
        }
    }

    pub fn preview_handle(&self) -> Option<PreviewHandle> {
        match self.preview {
            Preview::Live(handle) => Some(handle),
            Preview::Unavailable => None,
        }
    }
}

/// A group of files sharing a directory prefix
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub key: FolderKey,
    /// In append (import completion) order
    pub files: Vec<FileEntry>,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(key: FolderKey) -> Self {
        Self {
            key,
            files: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// First entry with this name
    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

// ========== Manifest (persisted projection) ==========

/// File entry without its preview handle
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub name: String,
    pub relative_path: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub media_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FolderMeta {
    pub key: FolderKey,
    pub files: Vec<FileMeta>,
    pub created_at: DateTime<Utc>,
}

/// Metadata-only copy of the whole media registry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    #[serde(default)]
    pub folders: Vec<FolderMeta>,
}
