use std::io;
use std::time::Duration;

use kanal::AsyncSender;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tuidict_core::cache::{self, MemoryCache, SharedCache};
use tuidict_core::output::{LineWriter, OutputSink};
use tuidict_core::session::{Event, Key, Phase, Session, SessionState};

use super::support::{CannedProvider, english, pipeline};
use crate::controller::ChannelSet;
use crate::events::SessionLoop;

struct BrokenSink;

impl OutputSink for BrokenSink {
    fn append(&mut self, _word: &str, _definitions: &[String]) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

async fn type_word(tx: &AsyncSender<Event>, word: &str) {
    for c in word.chars() {
        tx.send(Event::Key(Key::Char(c))).await.unwrap();
    }
    tx.send(Event::Key(Key::Enter)).await.unwrap();
}

/// Results are on screen once the session has asked for them to be cached
async fn wait_for_cached(cache: &SharedCache, key: &str) {
    timeout(Duration::from_secs(2), async {
        loop {
            if cache.lock().unwrap().lookup(key).unwrap().is_some() {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("search never completed");
}

#[tokio::test]
async fn search_select_and_save() {
    let provider = CannedProvider::found("canned", &["a small feline", "a jazz musician"]);
    let cache = cache::shared(MemoryCache::new());
    let pipeline = pipeline(vec![provider.clone()], cache.clone());
    let session = Session::new(english(), "test");
    let channels = ChannelSet::new();
    let tx = channels.events.0.clone();

    let mut sink = LineWriter::new(Vec::new());
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

    let driver = async {
        type_word(&tx, "cats").await;
        wait_for_cached(&cache, "cat").await;
        for key in [Key::Down, Key::Char('x'), Key::Char('f'), Key::Esc] {
            tx.send(Event::Key(key)).await.unwrap();
        }
    };
    let session_loop = SessionLoop::new(
        &session,
        pipeline.clone(),
        &mut sink,
        channels.events.clone(),
        CancellationToken::new(),
    );

    let (state, ()) = timeout(
        Duration::from_secs(5),
        async { tokio::join!(session_loop.run(&mut terminal, SessionState::with_viewport(60, 20)), driver) },
    )
    .await
    .expect("session did not exit");

    assert_eq!(state.phase, Phase::Exited);
    assert_eq!(state.fatal, None);
    assert_eq!(provider.calls(), 1);
    assert_eq!(
        String::from_utf8(sink.into_inner()).unwrap(),
        "cat\ta jazz musician\n"
    );
}

#[tokio::test]
async fn output_failure_ends_session_with_fatal() {
    let provider = CannedProvider::found("canned", &["a small feline"]);
    let cache = cache::shared(MemoryCache::new());
    let pipeline = pipeline(vec![provider], cache.clone());
    let session = Session::new(english(), "test");
    let channels = ChannelSet::new();
    let tx = channels.events.0.clone();

    let mut sink = BrokenSink;
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

    let driver = async {
        type_word(&tx, "cat").await;
        wait_for_cached(&cache, "cat").await;
        tx.send(Event::Key(Key::Char('x'))).await.unwrap();
        tx.send(Event::Key(Key::Char('f'))).await.unwrap();
    };
    let session_loop = SessionLoop::new(
        &session,
        pipeline,
        &mut sink,
        channels.events.clone(),
        CancellationToken::new(),
    );

    let (state, ()) = timeout(
        Duration::from_secs(5),
        async { tokio::join!(session_loop.run(&mut terminal, SessionState::with_viewport(60, 20)), driver) },
    )
    .await
    .expect("session did not exit");

    assert!(state.is_exited());
    assert!(state.fatal.unwrap().contains("disk full"));
}

#[tokio::test]
async fn invalid_input_warns_without_searching() {
    let provider = CannedProvider::found("canned", &["unused"]);
    let pipeline = pipeline(vec![provider.clone()], cache::shared(MemoryCache::new()));
    let session = Session::new(english(), "test");
    let channels = ChannelSet::new();
    let tx = channels.events.0.clone();

    let mut sink = LineWriter::new(Vec::new());
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

    type_word(&tx, "c4t").await;
    tx.send(Event::Key(Key::Ctrl('c'))).await.unwrap();

    let state = timeout(
        Duration::from_secs(5),
        SessionLoop::new(&session, pipeline, &mut sink, channels.events.clone(), CancellationToken::new())
            .run(&mut terminal, SessionState::with_viewport(60, 20)),
    )
    .await
    .expect("session did not exit");

    assert!(state.is_exited());
    assert!(state.warning.unwrap().starts_with("wrong format of input"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn cancellation_stops_the_loop() {
    let pipeline = pipeline(Vec::new(), cache::shared(MemoryCache::new()));
    let session = Session::new(english(), "test");
    let channels = ChannelSet::new();
    let cancel = CancellationToken::new();

    let mut sink = LineWriter::new(Vec::new());
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    cancel.cancel();

    let state = timeout(
        Duration::from_secs(5),
        SessionLoop::new(&session, pipeline, &mut sink, channels.events.clone(), cancel)
            .run(&mut terminal, SessionState::with_viewport(60, 20)),
    )
    .await
    .expect("loop ignored cancellation");

    assert_eq!(state.phase, Phase::AwaitingInput);
}
