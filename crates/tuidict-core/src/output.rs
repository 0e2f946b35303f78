use std::io::{self, Write};

use tuidict_types::DefinitionList;

/// Destination for saved word/definition selections
pub trait OutputSink: Send {
    fn append(&mut self, word: &str, definitions: &[String]) -> io::Result<()>;
}

/// `<word>\t<def_1>;<def_2>;...\n`
///
/// Neither tabs nor semicolons inside definitions are escaped.
pub fn format_line(word: &str, definitions: &[String]) -> String {
    format!("{word}\t{}\n", definitions.join(";"))
}

/// Sink over any writer; each append is a single write followed by a flush
pub struct LineWriter<W: Write + Send> {
    inner: W,
}

impl<W: Write + Send> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> OutputSink for LineWriter<W> {
    fn append(&mut self, word: &str, definitions: &[String]) -> io::Result<()> {
        let line = format_line(word, definitions);
        self.inner.write_all(line.as_bytes())?;
        self.inner.flush()
    }
}

/// Pick the selected definitions in ascending index order, skipping stale indices
pub fn selected_definitions<'a>(
    definitions: &DefinitionList,
    selected: impl IntoIterator<Item = &'a usize>,
) -> Vec<String> {
    selected
        .into_iter()
        .filter_map(|&i| definitions.get(i).map(str::to_string))
        .collect()
}
