use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use tuidict_core::session::{Event, Key};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn key_from(key: KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char(c) => Some(Key::Ctrl(c)),
            _ => None,
        };
    }

    Some(match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        _ => return None,
    })
}

/// Map a terminal event onto a session event, dropping what the session ignores
pub fn translate(event: TermEvent) -> Option<Event> {
    match event {
        // Only presses; release/repeat would double characters on Windows
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => key_from(key).map(Event::Key),
        TermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

/// Dedicated thread forwarding keys and resizes into the session channel
pub struct InputReader {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl InputReader {
    pub fn start(tx: AsyncSender<Event>, cancel: CancellationToken) -> Self {
        let thread_cancel = cancel.clone();
        let handle = std::thread::spawn(move || {
            while !thread_cancel.is_cancelled() {
                match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        let _ = tx.try_send(Event::Fatal(format!("terminal input failed: {e}")));
                        break;
                    }
                }

                let event = match event::read() {
                    Ok(event) => event,
                    Err(e) => {
                        let _ = tx.try_send(Event::Fatal(format!("terminal input failed: {e}")));
                        break;
                    }
                };

                if let Some(event) = translate(event) {
                    tracing::trace!("input event: {:?}", event);
                    if tx.try_send(event).is_err() {
                        break;
                    }
                }
            }
            tracing::debug!("input reader stopped");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn translates_keys_and_resizes() {
        assert_eq!(
            translate(press(KeyCode::Char('й'), KeyModifiers::NONE)),
            Some(Event::Key(Key::Char('й')))
        );
        assert_eq!(
            translate(press(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Event::Key(Key::Char('A')))
        );
        assert_eq!(
            translate(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Key(Key::Ctrl('c')))
        );
        assert_eq!(
            translate(TermEvent::Resize(100, 30)),
            Some(Event::Resize {
                width: 100,
                height: 30
            })
        );
        assert_eq!(translate(press(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ignores_key_release() {
        let release = TermEvent::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(translate(release), None);
    }
}
