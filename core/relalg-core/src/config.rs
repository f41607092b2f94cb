//! Engine configuration: index strategy and table storage settings.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. [`Default`]: no index, `store/<name>.dbf`, bincode, uncompressed
//! 2. JSON file via [`EngineConfig::load`]
//! 3. Environment variables via [`EngineConfig::apply_env`]

use crate::error::{RelError, RelResult};
use crate::index::IndexKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Default storage directory (relative to the working directory)
pub const DEFAULT_STORE_DIR: &str = "store";

/// Default table file extension
pub const DEFAULT_EXTENSION: &str = "dbf";

pub const ENV_INDEX: &str = "RELALG_INDEX";
pub const ENV_STORE_DIR: &str = "RELALG_STORE_DIR";
pub const ENV_STORE_EXT: &str = "RELALG_STORE_EXT";
pub const ENV_STORE_FORMAT: &str = "RELALG_STORE_FORMAT";
pub const ENV_COMPRESSION: &str = "RELALG_COMPRESSION";

/// Payload encoding of a saved table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StoreFormat {
    /// bincode
    #[default]
    Binary,
    /// serde_json
    Json,
}

impl StoreFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreFormat::Binary => "binary",
            StoreFormat::Json => "json",
        }
    }

    pub fn parse_format(s: &str) -> RelResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "bincode" => Ok(StoreFormat::Binary),
            "json" => Ok(StoreFormat::Json),
            other => Err(RelError::Config(format!("unknown store format: {other}"))),
        }
    }

    pub(crate) fn tag(self) -> u8 {
        match self {
            StoreFormat::Binary => 0,
            StoreFormat::Json => 1,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(StoreFormat::Binary),
            1 => Some(StoreFormat::Json),
            _ => None,
        }
    }
}

/// Where and how tables are saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage directory
    pub dir: PathBuf,
    /// File extension, without the dot
    pub extension: String,
    pub format: StoreFormat,
    /// zstd level; `None` stores the payload uncompressed
    pub compression_level: Option<i32>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_STORE_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            format: StoreFormat::default(),
            compression_level: None,
        }
    }
}

impl StoreConfig {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, level: i32) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// `<dir>/<name>.<extension>`
    ///
    /// `name` must be a plain file stem: a name that is empty, contains a
    /// path separator or NUL, or is `.`/`..` is a [`RelError::Persistence`]
    /// so no table file lands outside `dir`.
    pub fn path_for(&self, name: &str) -> RelResult<PathBuf> {
        let file = format!("{}.{}", name, self.extension);
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0'])
            && matches!(
                Path::new(&file).components().collect::<Vec<_>>().as_slice(),
                [Component::Normal(_)]
            );
        if !plain {
            return Err(RelError::Persistence {
                path: self.dir.join(&file).display().to_string(),
                message: format!("invalid table name '{name}'"),
            });
        }
        Ok(self.dir.join(file))
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Index strategy for tables created with this config
    pub index: IndexKind,
    pub store: StoreConfig,
}

impl EngineConfig {
    /// Defaults overridden by the `RELALG_*` environment variables
    pub fn from_env() -> RelResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from the `RELALG_*` environment variables
    pub fn apply_env(&mut self) -> RelResult<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Override fields from any variable source
    pub fn apply_vars<F>(&mut self, lookup: F) -> RelResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(index) = lookup(ENV_INDEX) {
            self.index = IndexKind::parse_kind(&index)?;
        }
        if let Some(dir) = lookup(ENV_STORE_DIR) {
            self.store.dir = PathBuf::from(dir);
        }
        if let Some(ext) = lookup(ENV_STORE_EXT) {
            self.store.extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(format) = lookup(ENV_STORE_FORMAT) {
            self.store.format = StoreFormat::parse_format(&format)?;
        }
        if let Some(level) = lookup(ENV_COMPRESSION) {
            self.store.compression_level = match level.as_str() {
                "" | "off" | "none" => None,
                raw => Some(raw.parse::<i32>().map_err(|_| {
                    RelError::Config(format!("invalid compression level: {raw}"))
                })?),
            };
        }
        Ok(())
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> RelResult<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write this config as pretty JSON
    pub fn save(&self, path: &Path) -> RelResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}
