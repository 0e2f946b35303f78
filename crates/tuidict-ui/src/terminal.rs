use std::io;

use anyhow::{Context, bail};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use crossterm::execute;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub fn check_tui_support() -> anyhow::Result<()> {
    if !atty::is(atty::Stream::Stdout) {
        bail!("stdout is not a terminal");
    }
    if !atty::is(atty::Stream::Stdin) {
        bail!("stdin is not a terminal");
    }
    if !cfg!(windows) && std::env::var("TERM").is_err() {
        bail!("TERM environment variable not set");
    }
    Ok(())
}

pub fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed to create terminal")
}

pub fn restore_terminal(terminal: &mut Tui) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

/// Current terminal size as (width, height)
pub fn size() -> io::Result<(u16, u16)> {
    terminal::size()
}
