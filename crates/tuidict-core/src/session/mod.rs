//! Interactive session as a pure transition function.
//!
//! [`Session::update`] takes the current [`SessionState`] and one [`Event`]
//! and returns the next state plus the side effects the caller must run.
//! Nothing here touches the terminal, the network or the disk.

mod input;
mod page;


use std::collections::BTreeSet;
use std::sync::Arc;

use tuidict_types::{DefinitionList, Query, SearchId};

pub use input::InputLine;
pub use page::{FOOTER_LINES, HEADER_LINES, Page, page_capacity, page_window};

use crate::aggregate::AggregateResult;
use crate::language::Normalizer;
use crate::output::selected_definitions;
use crate::search::SearchOutcome;

pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub const SELECT_AT_LEAST_ONE: &str = "Please select at least one definition";

/// Keyboard input, already stripped of terminal-specific detail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Esc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(Key),
    Resize { width: u16, height: u16 },
    Tick,
    SearchCompleted {
        id: SearchId,
        query: Query,
        result: AggregateResult,
        cached: bool,
    },
    NormalizeFailed { id: SearchId, message: String },
    CacheFailed { id: SearchId, message: String },
    Fatal(String),
}

impl Event {
    /// Tag a finished pipeline run with the id of the search that started it
    pub fn from_outcome(id: SearchId, outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Completed {
                query,
                result,
                cached,
            } => Event::SearchCompleted {
                id,
                query,
                result,
                cached,
            },
            SearchOutcome::NormalizeFailed(message) => Event::NormalizeFailed { id, message },
            SearchOutcome::CacheFailed(message) => Event::CacheFailed { id, message },
        }
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search { id: SearchId, raw_input: String },
    StoreCache { key: String, definitions: DefinitionList },
    Flush { word: String, definitions: Vec<String> },
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    AwaitingInput,
    Searching,
    ReviewingResults,
    ViewingDetail,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub input: InputLine,
    pub query: Option<Query>,
    pub definitions: Option<DefinitionList>,
    pub cursor: usize,
    pub selected: BTreeSet<usize>,
    pub warning: Option<String>,
    pub viewport: Viewport,
    pub pending: Option<SearchId>,
    pub next_id: SearchId,
    pub spinner: usize,
    pub fatal: Option<String>,
}

impl SessionState {
    pub fn with_viewport(width: u16, height: u16) -> Self {
        Self {
            viewport: Viewport { width, height },
            ..Self::default()
        }
    }

    pub fn is_exited(&self) -> bool {
        self.phase == Phase::Exited
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.as_ref().map_or(0, DefinitionList::len)
    }

    pub fn current_definition(&self) -> Option<&str> {
        self.definitions.as_ref()?.get(self.cursor)
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner % SPINNER_FRAMES.len()]
    }

    pub fn page(&self) -> Option<Page> {
        page_window(self.definition_count(), self.cursor, self.viewport.height)
    }

    fn reset_search(&mut self) {
        self.query = None;
        self.definitions = None;
        self.cursor = 0;
        self.selected.clear();
        self.input.clear();
        self.pending = None;
        self.phase = Phase::AwaitingInput;
    }

    fn exit(&mut self, fatal: Option<String>) -> Vec<Command> {
        if fatal.is_some() {
            self.fatal = fatal;
        }
        self.pending = None;
        self.phase = Phase::Exited;
        vec![Command::Quit]
    }
}

/// Layout-independent meaning of a key in the list views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Up,
    Down,
    Toggle,
    Flush,
    Detail,
    Back,
    ClearWarning,
}

fn list_action(key: Key) -> Option<Action> {
    match key {
        Key::Up | Key::Char('w' | 'W' | 'ц' | 'Ц') => Some(Action::Up),
        Key::Down | Key::Char('s' | 'S' | 'ы' | 'Ы') => Some(Action::Down),
        Key::Enter | Key::Char(' ' | 'x' | 'X' | 'ч' | 'Ч') => Some(Action::Toggle),
        Key::Ctrl('s' | 'S' | 'ы') | Key::Char('f' | 'F' | 'а' | 'А') => Some(Action::Flush),
        Key::Tab => Some(Action::Detail),
        Key::Esc | Key::Char('q' | 'Q' | 'й' | 'Й') => Some(Action::Back),
        Key::Char('c' | 'C' | 'с' | 'С') => Some(Action::ClearWarning),
        _ => None,
    }
}

fn is_cancel(key: Key) -> bool {
    matches!(key, Key::Esc | Key::Char('q' | 'Q' | 'й' | 'Й'))
}

fn is_interrupt(key: Key) -> bool {
    matches!(key, Key::Ctrl('c' | 'C' | 'с' | 'С'))
}

/// Immutable session configuration plus the transition function
#[derive(Clone)]
pub struct Session {
    normalizer: Arc<dyn Normalizer>,
    target: String,
}

impl Session {
    pub fn new(normalizer: Arc<dyn Normalizer>, target: impl Into<String>) -> Self {
        Self {
            normalizer,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn update(&self, state: SessionState, event: Event) -> (SessionState, Vec<Command>) {
        let mut next = state;

        if next.is_exited() {
            return (next, Vec::new());
        }

        let commands = match event {
            Event::Key(key) if is_interrupt(key) => next.exit(None),
            Event::Key(key) => self.on_key(&mut next, key),
            Event::Resize { width, height } => {
                next.viewport = Viewport { width, height };
                Vec::new()
            }
            Event::Tick => {
                if next.phase == Phase::Searching {
                    next.spinner = (next.spinner + 1) % SPINNER_FRAMES.len();
                }
                Vec::new()
            }
            Event::SearchCompleted {
                id,
                query,
                result,
                cached,
            } => {
                if !Self::is_current(&next, id) {
                    tracing::debug!(%id, "discarding stale search result");
                    return (next, Vec::new());
                }
                Self::on_completed(&mut next, query, result, cached)
            }
            Event::NormalizeFailed { id, message } => {
                if !Self::is_current(&next, id) {
                    tracing::debug!(%id, "discarding stale normalization failure");
                    return (next, Vec::new());
                }
                next.warning = Some(message);
                next.reset_search();
                Vec::new()
            }
            Event::CacheFailed { id, message } => {
                if !Self::is_current(&next, id) {
                    tracing::debug!(%id, "discarding stale cache failure");
                    return (next, Vec::new());
                }
                next.exit(Some(format!("cache failure: {message}")))
            }
            Event::Fatal(message) => next.exit(Some(message)),
        };

        (next, commands)
    }

    fn is_current(state: &SessionState, id: SearchId) -> bool {
        state.phase == Phase::Searching && state.pending == Some(id)
    }

    fn on_key(&self, state: &mut SessionState, key: Key) -> Vec<Command> {
        match state.phase {
            Phase::AwaitingInput => self.on_input_key(state, key),
            Phase::Searching => {
                if is_cancel(key) {
                    tracing::debug!(id = ?state.pending, "search cancelled");
                    state.pending = None;
                    state.phase = Phase::AwaitingInput;
                }
                Vec::new()
            }
            Phase::ReviewingResults => Self::on_review_key(state, key),
            Phase::ViewingDetail => {
                match list_action(key) {
                    Some(Action::Toggle) => {
                        toggle(state);
                        state.phase = Phase::ReviewingResults;
                    }
                    Some(Action::Back | Action::Detail) => state.phase = Phase::ReviewingResults,
                    _ => {}
                }
                Vec::new()
            }
            Phase::Exited => Vec::new(),
        }
    }

    fn on_input_key(&self, state: &mut SessionState, key: Key) -> Vec<Command> {
        match key {
            Key::Enter => return self.submit(state),
            Key::Esc => return state.exit(None),
            Key::Char(c) if !c.is_control() => state.input.insert(c),
            Key::Backspace => state.input.backspace(),
            Key::Delete => state.input.delete(),
            Key::Left => state.input.left(),
            Key::Right => state.input.right(),
            Key::Home => state.input.home(),
            Key::End => state.input.end(),
            _ => {}
        }
        Vec::new()
    }

    fn submit(&self, state: &mut SessionState) -> Vec<Command> {
        let raw = state.input.text().to_string();

        if let Err(e) = self.normalizer.validate(&raw) {
            state.warning = Some(e.to_string());
            state.input.clear();
            return Vec::new();
        }

        let id = state.next_id;
        state.next_id = id.next();
        state.pending = Some(id);
        state.warning = None;
        state.spinner = 0;
        state.phase = Phase::Searching;

        tracing::info!(%id, input = %raw, target = %self.target, "search submitted");
        vec![Command::Search { id, raw_input: raw }]
    }

    fn on_completed(
        state: &mut SessionState,
        query: Query,
        result: AggregateResult,
        cached: bool,
    ) -> Vec<Command> {
        state.pending = None;

        match result {
            AggregateResult::Found(definitions) => {
                let mut commands = Vec::new();
                if !cached {
                    commands.push(Command::StoreCache {
                        key: query.canonical_key().to_string(),
                        definitions: definitions.clone(),
                    });
                }
                state.definitions = Some(definitions);
                state.query = Some(query);
                state.selected.clear();
                state.cursor = 0;
                state.phase = Phase::ReviewingResults;
                commands
            }
            AggregateResult::NotFound => {
                state.warning = Some(format!("no definition found for {}", query.canonical_key()));
                state.reset_search();
                Vec::new()
            }
            AggregateResult::Failed(e) => state.exit(Some(format!("search failed: {e}"))),
        }
    }

    fn on_review_key(state: &mut SessionState, key: Key) -> Vec<Command> {
        let len = state.definition_count();

        match list_action(key) {
            Some(Action::Up) if len > 0 => state.cursor = (state.cursor + len - 1) % len,
            Some(Action::Down) if len > 0 => state.cursor = (state.cursor + 1) % len,
            Some(Action::Toggle) => toggle(state),
            Some(Action::Flush) => return flush(state),
            Some(Action::Detail) => state.phase = Phase::ViewingDetail,
            Some(Action::Back) => {
                state.warning = None;
                state.reset_search();
            }
            Some(Action::ClearWarning) => state.warning = None,
            _ => {}
        }
        Vec::new()
    }
}

fn toggle(state: &mut SessionState) {
    if state.cursor >= state.definition_count() {
        return;
    }
    if !state.selected.remove(&state.cursor) {
        state.selected.insert(state.cursor);
    }
}

fn flush(state: &mut SessionState) -> Vec<Command> {
    if state.selected.is_empty() {
        state.warning = Some(SELECT_AT_LEAST_ONE.to_string());
        return Vec::new();
    }

    let (Some(query), Some(definitions)) = (&state.query, &state.definitions) else {
        return state.exit(Some("no results to flush".to_string()));
    };

    let command = Command::Flush {
        word: query.canonical_key().to_string(),
        definitions: selected_definitions(definitions, &state.selected),
    };

    state.warning = None;
    state.reset_search();
    vec![command]
}
