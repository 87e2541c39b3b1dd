//! Import policy: which files count as images, and which folder they land in.

use crate::config::Config;
use crate::state::data::FolderKey;

/// Folder key for files imported without a directory component.
pub const ROOT_FOLDER_KEY: &str = "root";

/// Extensions accepted even when the media-type hint is missing.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPolicy {
    extensions: Vec<String>,
    root_key: String,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_EXTENSIONS, ROOT_FOLDER_KEY)
    }
}

impl ImportPolicy {
    pub fn new<I, S>(extensions: I, root_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            root_key: root_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.image_extensions, config.root_folder_key.clone())
    }

    /// Everything before the last `/` segment, or the root key for bare names.
    pub fn folder_key(&self, relative_path: &str) -> FolderKey {
        match relative_path.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => self.root_key.clone(),
        }
    }

    /// An image media type, or an allow-listed extension (case-insensitive).
    pub fn accepts(&self, name: &str, media_type: &str) -> bool {
        if is_image_media_type(media_type) {
            return true;
        }

        match name.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }
}

fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}
