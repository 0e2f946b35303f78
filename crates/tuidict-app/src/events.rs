use std::collections::VecDeque;

use kanal::{AsyncReceiver, AsyncSender};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tuidict_core::output::OutputSink;
use tuidict_core::search::SearchPipeline;
use tuidict_core::session::{Command, Event, Session, SessionState};

/// Single consumer of session events; the only writer to the cache and the output file
pub struct SessionLoop<'a> {
    session: &'a Session,
    pipeline: SearchPipeline,
    sink: &'a mut dyn OutputSink,
    tx: AsyncSender<Event>,
    rx: AsyncReceiver<Event>,
    cancel: CancellationToken,
    searches: JoinSet<()>,
    /// Failures raised while executing commands, handled before the next channel event
    followups: VecDeque<Event>,
}

impl<'a> SessionLoop<'a> {
    pub fn new(
        session: &'a Session,
        pipeline: SearchPipeline,
        sink: &'a mut dyn OutputSink,
        channel: (AsyncSender<Event>, AsyncReceiver<Event>),
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = channel;
        Self {
            session,
            pipeline,
            sink,
            tx,
            rx,
            cancel,
            searches: JoinSet::new(),
            followups: VecDeque::new(),
        }
    }

    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>, initial: SessionState) -> SessionState {
        tracing::info!(target_name = self.session.target(), "[SESSION] Starting");
        let mut state = initial;
        self.redraw(terminal, &state);

        while !state.is_exited() {
            let Some(event) = self.next_event().await else {
                break;
            };

            let (next, commands) = self.session.update(state, event);
            state = next;

            for command in commands {
                self.execute(command);
            }
            self.reap_searches();
            self.redraw(terminal, &state);
        }

        self.searches.abort_all();
        tracing::info!(fatal = ?state.fatal, "[SESSION] Finished");
        state
    }

    async fn next_event(&mut self) -> Option<Event> {
        if let Some(event) = self.followups.pop_front() {
            return Some(event);
        }

        tokio::select! {
            _ = self.cancel.cancelled() => {
                tracing::debug!("[SESSION] Cancelled");
                None
            }
            received = self.rx.recv() => match received {
                Ok(event) => Some(event),
                Err(e) => Some(Event::Fatal(format!("event channel closed: {e}"))),
            },
        }
    }

    fn execute(&mut self, command: Command) {
        tracing::debug!("[SESSION] Executing {:?}", std::mem::discriminant(&command));

        let result = match command {
            Command::Search { id, raw_input } => {
                self.spawn_search(id, raw_input);
                Ok(())
            }
            Command::StoreCache { key, definitions } => self
                .pipeline
                .cache()
                .lock()
                .map_err(|_| "cache lock poisoned".to_string())
                .and_then(|mut cache| {
                    cache
                        .store(&key, &definitions)
                        .map_err(|e| format!("cache write failed: {e}"))
                }),
            Command::Flush { word, definitions } => {
                tracing::info!(%word, count = definitions.len(), "Saving selection");
                self.sink
                    .append(&word, &definitions)
                    .map_err(|e| format!("failed to write output: {e}"))
            }
            Command::Quit => {
                tracing::info!("[SESSION] Quit requested");
                Ok(())
            }
        };

        if let Err(message) = result {
            tracing::error!("{message}");
            self.followups.push_back(Event::Fatal(message));
        }
    }

    fn spawn_search(&mut self, id: tuidict_core::types::SearchId, raw_input: String) {
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        let cancel = self.cancel.child_token();

        self.searches.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(%id, "search task cancelled");
                }
                outcome = pipeline.run(&raw_input) => {
                    if tx.send(Event::from_outcome(id, outcome)).await.is_err() {
                        tracing::warn!(%id, "session gone before search finished");
                    }
                }
            }
        });
    }

    fn reap_searches(&mut self) {
        while let Some(joined) = self.searches.try_join_next() {
            if let Err(e) = joined {
                if e.is_panic() {
                    self.followups.push_back(Event::Fatal(format!("search task panicked: {e}")));
                }
            }
        }
    }

    fn redraw<B: Backend>(&mut self, terminal: &mut Terminal<B>, state: &SessionState) {
        let target = self.session.target();
        if let Err(e) = terminal.draw(|f| tuidict_ui::draw(f, state, target)) {
            tracing::error!("draw failed: {e}");
            self.followups.push_back(Event::Fatal(format!("terminal draw failed: {e}")));
        }
    }
}
