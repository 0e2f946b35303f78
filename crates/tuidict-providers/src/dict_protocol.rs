//! Minimal RFC 2229 client: one connection per lookup, `DEFINE` then `QUIT`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tuidict_core::provider::{Provider, ProviderError};

const BANNER: u16 = 220;
const DEFINITIONS_FOLLOW: u16 = 150;
const DEFINITION: u16 = 151;
const NO_MATCH: u16 = 552;
const OK: u16 = 250;

pub struct DictProvider {
    name: String,
    addr: String,
    database: String,
    connect_timeout: Duration,
}

impl DictProvider {
    pub fn new(addr: &str, database: &str, connect_timeout: Duration) -> Self {
        Self {
            name: format!("dict:{database}"),
            addr: addr.to_string(),
            database: database.to_string(),
            connect_timeout,
        }
    }

    async fn connect(&self) -> Result<TcpStream, ProviderError> {
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProviderError::Network(format!("{}: {e}", self.addr))),
            Err(_) => Err(ProviderError::Timeout(self.connect_timeout)),
        }
    }
}

fn io_error(e: std::io::Error) -> ProviderError {
    ProviderError::Network(e.to_string())
}

/// Quote a word as a DICT string argument
fn quote(word: &str) -> String {
    let escaped = word.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn status_code(line: &str) -> Result<u16, ProviderError> {
    line.get(..3)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| ProviderError::Protocol(format!("malformed status line: {line:?}")))
}

async fn next_line<R>(lines: &mut Lines<R>) -> Result<String, ProviderError>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    lines
        .next_line()
        .await
        .map_err(io_error)?
        .ok_or_else(|| ProviderError::Protocol("connection closed by server".to_string()))
}

/// Read one dot-terminated text block, undoing dot-stuffing
async fn read_text_block<R>(lines: &mut Lines<R>) -> Result<String, ProviderError>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut body: Vec<String> = Vec::new();
    loop {
        let line = next_line(lines).await?;
        if line == "." {
            return Ok(body.join("\n"));
        }
        let line = line.strip_prefix('.').filter(|l| l.starts_with('.')).unwrap_or(&line);
        body.push(line.to_string());
    }
}

/// Run a `DEFINE` conversation over an already-open stream
pub async fn define<S>(stream: S, database: &str, word: &str) -> Result<Vec<String>, ProviderError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    let banner = next_line(&mut lines).await?;
    if status_code(&banner)? != BANNER {
        return Err(ProviderError::Protocol(format!("unexpected banner: {banner}")));
    }

    let command = format!("DEFINE {database} {}\r\n", quote(word));
    writer.write_all(command.as_bytes()).await.map_err(io_error)?;
    writer.flush().await.map_err(io_error)?;

    let status = next_line(&mut lines).await?;
    let result = match status_code(&status)? {
        DEFINITIONS_FOLLOW => {
            let mut definitions = Vec::new();
            loop {
                let line = next_line(&mut lines).await?;
                match status_code(&line)? {
                    DEFINITION => definitions.push(read_text_block(&mut lines).await?),
                    OK => break,
                    _ => return Err(ProviderError::Protocol(line)),
                }
            }
            Ok(definitions)
        }
        NO_MATCH => Err(ProviderError::NoDefinition),
        _ => Err(ProviderError::Protocol(status)),
    };

    // Best effort; the answer is already in hand
    if let Err(e) = writer.write_all(b"QUIT\r\n").await {
        tracing::debug!("DICT quit failed: {e}");
    }
    let _ = writer.shutdown().await;

    result
}

#[async_trait]
impl Provider for DictProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, term: &str) -> Result<Vec<String>, ProviderError> {
        let stream = self.connect().await?;
        define(stream, &self.database, term).await
    }
}
