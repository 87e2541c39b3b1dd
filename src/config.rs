//! Gallery settings kept in `resoview.toml` under the user config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::media::filter::{DEFAULT_IMAGE_EXTENSIONS, ROOT_FOLDER_KEY};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the gallery database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Folder key used for files imported without a directory component.
    #[serde(default = "default_root_folder_key")]
    pub root_folder_key: String,
    /// File extensions accepted on import regardless of the media-type hint.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resoview")
}

fn default_root_folder_key() -> String {
    ROOT_FOLDER_KEY.to_string()
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            root_folder_key: default_root_folder_key(),
            image_extensions: default_image_extensions(),
        }
    }
}

impl Config {
    /// Settings for this run.
    ///
    /// An explicit `custom_path` must point at an existing file. Without one,
    /// the per-user `resoview.toml` is read, and written out with defaults
    /// on first start.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match custom_path {
            Some(path) if !path.exists() => {
                anyhow::bail!("No config file at {}", path.display());
            }
            Some(path) => path,
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    let config = Config::default();
                    config.save_to(&path)?;
                    tracing::info!("Wrote default settings to {}", path.display());
                    return Ok(config);
                }
                path
            }
        };

        let config = Self::load_from(&config_path)?;
        tracing::info!("Using settings from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Read and parse `path`; every missing key takes its default.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write these settings as TOML, creating missing directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path of the SQLite file holding the stored documents.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("resoview.db")
    }

    /// `<config dir>/resoview/resoview.toml`
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("resoview").join("resoview.toml"))
    }
}
