//! Directory scanning
//!
//! Turns a folder on disk into import descriptors. Relative paths start with
//! the picked folder's own name (`studyA/scan1.png`), so the registry groups
//! files the same way it does for any other picker.
use std::path::Path;
use walkdir::WalkDir;

use super::descriptor::FileDescriptor;

/// Walk `folder_path` recursively and describe every regular file in it.
///
/// Unreadable directory entries are skipped. Bytes are not read here; each
/// descriptor reads its file when the import awaits it.
pub fn scan_directory(folder_path: &Path) -> Vec<FileDescriptor> {
    tracing::info!("Scanning folder: {}", folder_path.display());

    // `.` and `..` have no file name of their own
    let resolved = folder_path
        .canonicalize()
        .unwrap_or_else(|_| folder_path.to_path_buf());
    let prefix = resolved
        .file_name()
        .map(|name| name.to_string_lossy().to_string());

    let mut descriptors = Vec::new();

    for entry in WalkDir::new(folder_path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Ok(inner) = path.strip_prefix(folder_path) else {
            continue;
        };

        let mut segments: Vec<String> = prefix.iter().cloned().collect();
        segments.extend(
            inner
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string()),
        );
        let relative_path = segments.join("/");

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let media_type = guess_media_type(&relative_path);

        descriptors.push(FileDescriptor::from_path(
            relative_path,
            path.to_path_buf(),
            size,
            media_type,
        ));
    }

    tracing::debug!("Found {} files in {}", descriptors.len(), folder_path.display());
    descriptors
}

/// Media-type hint from the file extension, empty when unknown.
pub fn guess_media_type(name: &str) -> &'static str {
    mime_guess::from_path(name).first_raw().unwrap_or("")
}
