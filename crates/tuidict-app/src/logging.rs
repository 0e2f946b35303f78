use std::fs;
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::profile::{LOG_FILE, Paths};

/// Flushes the file writer when the process exits
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `level` is the resolved config level; `RUST_LOG` is the last resort when it does not parse
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Background writer appending to `<root>/tuidict.log`
fn file_writer(paths: &Paths) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&paths.root).with_context(|| format!("creating {}", paths.root.display()))?;
    let appender = tracing_appender::rolling::never(&paths.root, LOG_FILE);
    Ok(tracing_appender::non_blocking(appender))
}

/// File logging always; stderr too when the terminal is not taken by the UI
pub fn init(paths: &Paths, level: &str, console: bool) -> anyhow::Result<()> {
    let (writer, guard) = file_writer(paths)?;
    let _ = LOG_GUARD.set(guard);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    let console_layer = console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        assert!(EnvFilter::try_new("tuidict=loud").is_err());
        // Either RUST_LOG or the info default, never a panic
        let _ = filter_for("tuidict=loud");
        let _ = filter_for("tuidict_core=debug,info");
    }

    #[test]
    fn file_writer_appends_under_root_and_flushes_on_guard_drop() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::under(dir.path().join("data"));

        let (mut writer, guard) = file_writer(&paths).unwrap();
        writer.write_all(b"search submitted\n").unwrap();
        drop(writer);
        drop(guard);

        let written = fs::read_to_string(&paths.log).unwrap();
        assert_eq!(written, "search submitted\n");
    }
}
