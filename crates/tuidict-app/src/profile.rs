use std::path::{Path, PathBuf};

use anyhow::Context;
use tuidict_config::{Config, normalize_target};

use crate::cli::Cli;

const APP_DIR: &str = "tuidict";
const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "tuidict.log";

/// Platform data folder, falling back to the working directory
fn default_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

/// Where a run keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub log: PathBuf,
}

impl Paths {
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join(CONFIG_FILE),
            log: root.join(LOG_FILE),
            root,
        }
    }

    pub fn database(&self, config: &Config) -> PathBuf {
        config.cache.database_path(&self.root, &config.target_slug())
    }

    pub fn output(&self, config: &Config) -> PathBuf {
        config.cache.output_path(&self.root, &config.target_slug())
    }

    pub fn export(&self, config: &Config) -> PathBuf {
        config
            .cache
            .data_dir
            .as_deref()
            .unwrap_or(&self.root)
            .join(format!("{}-words.txt", config.target_slug()))
    }
}

/// Load the config at `path`, writing defaults there on first run
pub fn load_or_init(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        return Config::load(path).with_context(|| format!("loading {}", path.display()));
    }

    let mut config = Config::default();
    config
        .save(path)
        .with_context(|| format!("creating default config at {}", path.display()))?;
    tracing::info!("Created default config at {}", path.display());

    // Environment applies to this run only, never to the saved file
    config.apply_env();
    Ok(config)
}

/// Flags given on the command line win over the file and environment
pub fn apply_cli(config: &mut Config, cli: &Cli) {
    if let Some(target) = &cli.target {
        config.target = normalize_target(target);
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if cli.no_cache {
        config.cache.disabled = true;
    }
}

/// Resolve paths and the effective config for this run
pub fn resolve(cli: &Cli) -> anyhow::Result<(Paths, Config)> {
    let root = std::env::var_os("TUIDICT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(default_root);
    let mut paths = Paths::under(root);
    if let Some(config) = &cli.config {
        paths.config = config.clone();
    }

    let mut config = load_or_init(&paths.config)?;
    apply_cli(&mut config, cli);
    Ok((paths, config))
}
