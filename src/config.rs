// src/config.rs
//! Runtime configuration — loaded once at process start and passed by
//! parameter into every operation. No ambient global.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::consts::{DEFAULT_IMAGE_TYPES, DEFAULT_KEYFILE_NAME, DEFAULT_MAX_IMAGE_BYTES};
use crate::error::{QuillError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub identity: IdentityConfig,
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.quill.pub".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub keyfile: PathBuf,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            keyfile: default_keyfile_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_types: DEFAULT_IMAGE_TYPES
                .iter()
                .map(|(ext, _)| ext.to_string())
                .collect(),
        }
    }
}

fn default_keyfile_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quill")
        .join(DEFAULT_KEYFILE_NAME)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("quill.toml");
    if local.exists() {
        return Some(local);
    }
    let global = dirs::config_dir()?.join("quill").join("config.toml");
    global.exists().then_some(global)
}

/// Load configuration from `path`, falling back to `./quill.toml`,
/// then the platform config directory, then built-in defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let resolved = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };
    let Some(resolved) = resolved else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(&resolved).map_err(|e| {
        QuillError::Config(format!("cannot read {}: {e}", resolved.display()))
    })?;
    toml::from_str(&content)
        .map_err(|e| QuillError::Config(format!("invalid TOML in {}: {e}", resolved.display())))
}
