use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Skip the persistent cache and keep results in memory only
    pub disabled: bool,
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn database_path(&self, root: &Path, target: &str) -> PathBuf {
        self.data_dir
            .as_deref()
            .unwrap_or(root)
            .join(format!("{target}.db"))
    }

    pub fn output_path(&self, root: &Path, target: &str) -> PathBuf {
        self.data_dir
            .as_deref()
            .unwrap_or(root)
            .join(format!("{target}.txt"))
    }
}
