use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use tuidict_core::output::LineWriter;

pub type FileSink = LineWriter<File>;

/// Open the target's output file for appending, creating it if needed
pub fn open_output(path: &Path) -> io::Result<FileSink> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LineWriter::new(file))
}
