use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tuidict_types::Language;

use self::cache::CacheConfig;
use self::dictionary::DictionaryConfig;
use self::network::NetworkConfig;
use self::russian::RussianConfig;
use self::ui::UiConfig;

pub mod cache;
pub mod dictionary;
pub mod network;
pub mod russian;
pub mod ui;

pub use dictionary::SourceConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn default_target() -> String {
    "target".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub cache: CacheConfig,
    pub ui: UiConfig,
    pub russian: RussianConfig,
    pub network: NetworkConfig,

    pub language: Language,
    /// Namespace for the cache database and output file
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: DictionaryConfig::default(),
            cache: CacheConfig::default(),
            ui: UiConfig::default(),
            russian: RussianConfig::default(),
            network: NetworkConfig::default(),
            language: Language::default(),
            target: default_target(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Load from a JSON file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, data).map_err(write_err)
    }

    pub fn apply_env(&mut self) {
        if let Ok(target) = env::var("TUIDICT_TARGET") {
            self.target = target;
        }

        if let Some(language) = env::var("TUIDICT_LANGUAGE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.language = language;
        }

        if let Ok(level) = env::var("TUIDICT_LOG") {
            self.log_level = level;
        }

        if let Some(timeout_ms) = env::var("TUIDICT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.dictionary.timeout_ms = timeout_ms;
        }

        if let Ok(dir) = env::var("TUIDICT_DATA_DIR") {
            self.cache.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Target name as used on disk: lowercased, spaces become dashes
    pub fn target_slug(&self) -> String {
        normalize_target(&self.target)
    }
}

pub fn normalize_target(target: &str) -> String {
    let slug = target.trim().to_lowercase().replace(' ', "-");
    if slug.is_empty() { default_target() } else { slug }
}
