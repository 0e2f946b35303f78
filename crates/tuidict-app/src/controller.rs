use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kanal::{AsyncReceiver, AsyncSender};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tuidict_config::Config;
use tuidict_core::aggregate::Aggregator;
use tuidict_core::cache::{self, MemoryCache, SharedCache};
use tuidict_core::language::Normalizer;
use tuidict_core::output::OutputSink;
use tuidict_core::search::SearchPipeline;
use tuidict_core::session::{Event, Session, SessionState};
use tuidict_core::types::Language;
use tuidict_lang_english::EnglishNormalizer;
use tuidict_lang_russian::RussianNormalizer;
use tuidict_store::SqliteCache;

use crate::events::SessionLoop;
use crate::profile::Paths;

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<Event>, AsyncReceiver<Event>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            // Keys, ticks and search completions all land here
            events: kanal::unbounded_async(),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_normalizer(config: &Config) -> anyhow::Result<Arc<dyn Normalizer>> {
    let normalizer: Arc<dyn Normalizer> = match config.language {
        Language::English => Arc::new(EnglishNormalizer::new().context("compiling input pattern")?),
        Language::Russian => {
            let timeout = Duration::from_millis(config.dictionary.timeout_ms);
            Arc::new(
                RussianNormalizer::from_config(&config.russian, timeout)
                    .context("building stress service client")?,
            )
        }
    };
    Ok(normalizer)
}

/// SQLite per target, or an in-memory map when caching is off
pub fn open_cache(config: &Config, paths: &Paths) -> anyhow::Result<SharedCache> {
    if config.cache.disabled {
        tracing::info!("Persistent cache disabled, results kept in memory");
        return Ok(cache::shared(MemoryCache::new()));
    }

    let path = paths.database(config);
    let store = SqliteCache::open(&path).with_context(|| format!("opening cache {}", path.display()))?;
    tracing::info!("Cache opened at {}", path.display());
    Ok(cache::shared(store))
}

pub fn build_pipeline(
    config: &Config,
    normalizer: Arc<dyn Normalizer>,
    cache: SharedCache,
) -> anyhow::Result<SearchPipeline> {
    let providers = tuidict_providers::build_providers(config, config.language)
        .context("building dictionary providers")?;

    let aggregator = Aggregator::new(providers, Duration::from_millis(config.dictionary.timeout_ms))
        .with_cap(config.dictionary.result_cap);
    tracing::info!(
        language = %config.language,
        providers = ?aggregator.provider_names(),
        budget = ?aggregator.budget(),
        "Search pipeline ready"
    );

    Ok(SearchPipeline::new(normalizer, cache, Arc::new(aggregator)))
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
    session: Session,
    pipeline: SearchPipeline,
    tick: Duration,
}

impl AppController {
    pub fn new(session: Session, pipeline: SearchPipeline, tick: Duration) -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
            session,
            pipeline,
            tick,
        }
    }

    pub fn sender(&self) -> AsyncSender<Event> {
        self.channels.events.0.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Background producers feeding the session channel
    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Spinner ticks
        tasks.spawn(tick_loop(
            self.tick,
            self.cancel_token.child_token(),
            self.channels.events.0.clone(),
        ));

        tasks
    }

    /// Drive the session until it exits; returns the final state
    pub async fn run<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        sink: &mut dyn OutputSink,
        initial: SessionState,
    ) -> SessionState {
        SessionLoop::new(
            &self.session,
            self.pipeline.clone(),
            sink,
            self.channels.events.clone(),
            self.cancel_token.child_token(),
        )
        .run(terminal, initial)
        .await
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

pub(crate) async fn tick_loop(period: Duration, cancel: CancellationToken, tx: AsyncSender<Event>) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("tick loop stopped");
    Ok(())
}
