pub mod export;
pub mod output;
pub mod sqlite;

pub use export::{ExportError, export_words};
pub use output::{FileSink, open_output};
pub use sqlite::SqliteCache;
