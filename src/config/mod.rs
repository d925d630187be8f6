//! Runtime settings.
//!
//! Settings come from a TOML file. Every field has a default, so a missing
//! file or a partial one is fine.

use crate::{
    database::Database,
    domain::{CatalogEntry, default_catalog},
};
use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const CONFIG_DIRECTORY: &str = "Cassette";
const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_ENV: &str = "CASSETTE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Song store location, defaults to the platform data directory
    pub database: Option<PathBuf>,
    /// Root that catalog and image paths are relative to
    pub assets_root: PathBuf,
    pub default_image: String,
    pub import_artist: String,
    pub catalog: Vec<CatalogEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database: None,
            assets_root: PathBuf::from("."),
            default_image: crate::domain::DEFAULT_IMAGE.to_string(),
            import_artist: String::from("Local File"),
            catalog: default_catalog(),
        }
    }
}

impl Settings {
    /// Load from `$CASSETTE_CONFIG` or the platform config directory.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.is_file() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_str = fs::read_to_string(path.as_ref())?;
        let settings = toml::from_str::<Settings>(&file_str)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (idx, entry) in self.catalog.iter().enumerate() {
            if entry.title.trim().is_empty() {
                return Err(anyhow!("catalog entry {idx} has an empty title"));
            }
            if entry.src.trim().is_empty() {
                return Err(anyhow!("catalog entry `{}` has no audio source", entry.title));
            }
        }
        if self.import_artist.trim().is_empty() {
            return Err(anyhow!("import_artist must not be empty"));
        }
        Ok(())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => crate::expand_tilde(path),
            None => Database::default_path()
                .ok_or_else(|| anyhow!("Could not determine a data directory for the song store")),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => Some(PathBuf::from(path)),
        None => dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join(CONFIG_FILENAME)),
    }
}
