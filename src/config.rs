//! # Configuration Module
//!
//! This module resolves where the bot's flat files live and loads the
//! startup configuration: the bot token and config.json.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{Result, ShoraError};
use crate::labels::LabelSet;

// Default file locations, relative to the working directory
pub const DEFAULT_TOKEN_FILE: &str = ".token";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_PROVINCE_MAP: &str = "province_map.csv";
pub const DEFAULT_LISTS_DIR: &str = "lists";
pub const DEFAULT_ADS_MEDIA_DIR: &str = "ads/media";
pub const DEFAULT_ADS_TEXT_DIR: &str = "ads/texts";

/// Environment variable that takes precedence over the token file
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Locations of every file the bot reads at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// File holding the bot token
    pub token_file: PathBuf,
    /// JSON file with labels and promoted cities
    pub config_file: PathBuf,
    /// CSV relation file with `Province` and `City` columns
    pub province_map: PathBuf,
    /// Directory of `<city>.<ext>` list images
    pub lists_dir: PathBuf,
    /// Directory of `<ad>.<ext>` ad images
    pub ads_media_dir: PathBuf,
    /// Directory of `<ad>.<ext>` ad texts
    pub ads_text_dir: PathBuf,
}

impl Default for AppPaths {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            province_map: PathBuf::from(DEFAULT_PROVINCE_MAP),
            lists_dir: PathBuf::from(DEFAULT_LISTS_DIR),
            ads_media_dir: PathBuf::from(DEFAULT_ADS_MEDIA_DIR),
            ads_text_dir: PathBuf::from(DEFAULT_ADS_TEXT_DIR),
        }
    }
}

impl AppPaths {
    /// Resolve locations from `SHORA_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve locations through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, default: PathBuf| -> PathBuf {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
                _ => default,
            }
        };

        Self {
            token_file: pick("SHORA_TOKEN_FILE", defaults.token_file),
            config_file: pick("SHORA_CONFIG", defaults.config_file),
            province_map: pick("SHORA_PROVINCE_MAP", defaults.province_map),
            lists_dir: pick("SHORA_LISTS_DIR", defaults.lists_dir),
            ads_media_dir: pick("SHORA_ADS_MEDIA_DIR", defaults.ads_media_dir),
            ads_text_dir: pick("SHORA_ADS_TEXT_DIR", defaults.ads_text_dir),
        }
    }

    /// Resolve every location relative to `root`, keeping default names
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let defaults = Self::default();
        Self {
            token_file: root.join(defaults.token_file),
            config_file: root.join(defaults.config_file),
            province_map: root.join(defaults.province_map),
            lists_dir: root.join(defaults.lists_dir),
            ads_media_dir: root.join(defaults.ads_media_dir),
            ads_text_dir: root.join(defaults.ads_text_dir),
        }
    }
}

/// Parsed config.json
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotConfig {
    /// Menu labels and prompts
    pub msg: LabelSet,
    /// Cities shown directly on the main menu, in display order
    #[serde(rename = "promoted cities")]
    pub promoted_cities: Vec<String>,
}

impl BotConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading bot configuration");
        let content = fs::read_to_string(path).map_err(|e| {
            ShoraError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&content)?;
        debug!(
            promoted = config.promoted_cities.len(),
            "Bot configuration loaded"
        );
        Ok(config)
    }
}

/// Read the bot token: the environment variable wins, then the token file.
pub fn load_token(env_token: Option<String>, token_file: &Path) -> Result<String> {
    if let Some(token) = env_token.map(|t| t.trim().to_string()) {
        if !token.is_empty() {
            debug!("Using bot token from {}", TOKEN_ENV_VAR);
            return Ok(token);
        }
    }

    let token = fs::read_to_string(token_file)
        .map_err(|e| {
            ShoraError::config(format!("cannot read {}: {e}", token_file.display()))
        })?
        .trim()
        .to_string();

    if token.is_empty() {
        return Err(ShoraError::config(format!(
            "token file {} is empty",
            token_file.display()
        )));
    }
    Ok(token)
}
