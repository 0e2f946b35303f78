use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tuidict_core::cache::{CacheError, CacheGateway};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write every cached word, one per line, replacing the file's contents
pub fn export_words(cache: &dyn CacheGateway, path: &Path) -> Result<usize, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let words = cache.keys()?;
    tracing::info!("exporting {} word(s) to {}", words.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    for word in &words {
        writeln!(out, "{word}").map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    Ok(words.len())
}
