use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tuidict_config::Config;
use tuidict_core::aggregate::AggregateResult;
use tuidict_core::search::{SearchOutcome, SearchPipeline};
use tuidict_core::session::{Session, SessionState};

mod cli;
mod controller;
mod events;
mod logging;
mod profile;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Commands};
use self::controller::AppController;
use self::profile::Paths;

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("tuidict: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (paths, config) = profile::resolve(&cli)?;
    let interactive = matches!(cli.command, None | Some(Commands::Run));
    logging::init(&paths, &config.log_level, !interactive)?;
    tracing::info!(target_name = %config.target, language = %config.language, "tuidict starting");

    match cli.command {
        None | Some(Commands::Run) => run_session(&paths, &config).await,
        Some(Commands::Lookup { word }) => lookup(&paths, &config, &word).await,
        Some(Commands::Export { out }) => export(&paths, &config, out),
    }
}

async fn run_session(paths: &Paths, config: &Config) -> anyhow::Result<ExitCode> {
    tuidict_ui::check_tui_support().context("interactive mode needs a terminal")?;

    let normalizer = controller::build_normalizer(config)?;
    let cache = controller::open_cache(config, paths)?;
    let pipeline = controller::build_pipeline(config, normalizer.clone(), cache)?;
    let output_path = paths.output(config);
    let mut sink = tuidict_store::open_output(&output_path)
        .with_context(|| format!("opening output file {}", output_path.display()))?;

    let session = Session::new(normalizer, config.target_slug());
    let controller = AppController::new(session, pipeline, Duration::from_millis(config.ui.tick_ms));

    let (width, height) = tuidict_ui::terminal::size().context("reading terminal size")?;
    let mut terminal = tuidict_ui::setup_terminal()?;
    let input = tuidict_ui::InputReader::start(controller.sender(), controller.cancel_token());
    let mut tasks = controller.spawn_tasks();

    let final_state = tokio::select! {
        state = controller.run(&mut terminal, &mut sink, SessionState::with_viewport(width, height)) => Some(state),
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            None
        }
    };

    controller.shutdown();
    input.stop();
    tuidict_ui::restore_terminal(&mut terminal);
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("background task failed: {e:#}"),
            Err(e) => tracing::error!("background task panicked: {e}"),
        }
    }

    match final_state.and_then(|state| state.fatal) {
        Some(message) => {
            eprintln!("tuidict: {message}");
            Ok(ExitCode::from(EXIT_FAILURE))
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupStatus {
    Found,
    NotFound,
}

/// Run the pipeline once, cache a fresh `Found`, and print numbered definitions
async fn lookup_once(
    pipeline: &SearchPipeline,
    word: &str,
    out: &mut impl Write,
) -> anyhow::Result<LookupStatus> {
    match pipeline.run(word).await {
        SearchOutcome::Completed {
            query,
            result: AggregateResult::Found(definitions),
            cached,
        } => {
            if !cached {
                let mut cache = pipeline
                    .cache()
                    .lock()
                    .map_err(|_| anyhow::anyhow!("cache lock poisoned"))?;
                cache.store(query.canonical_key(), &definitions)?;
            }
            writeln!(out, "{}", query.canonical_key())?;
            for (i, definition) in definitions.iter().enumerate() {
                writeln!(out, "{:>3}. {definition}", i + 1)?;
            }
            Ok(LookupStatus::Found)
        }
        SearchOutcome::Completed {
            query,
            result: AggregateResult::NotFound,
            ..
        } => {
            tracing::info!(key = query.canonical_key(), "lookup found nothing");
            writeln!(out, "no definition found for {}", query.canonical_key())?;
            Ok(LookupStatus::NotFound)
        }
        SearchOutcome::Completed {
            result: AggregateResult::Failed(e),
            ..
        } => Err(anyhow::anyhow!("search failed: {e}")),
        SearchOutcome::NormalizeFailed(message) => Err(anyhow::anyhow!("{message}")),
        SearchOutcome::CacheFailed(message) => Err(anyhow::anyhow!("cache failure: {message}")),
    }
}

async fn lookup(paths: &Paths, config: &Config, word: &str) -> anyhow::Result<ExitCode> {
    let normalizer = controller::build_normalizer(config)?;
    normalizer.validate(word)?;

    let cache = controller::open_cache(config, paths)?;
    let pipeline = controller::build_pipeline(config, normalizer, cache)?;

    let mut printed = Vec::new();
    let status = lookup_once(&pipeline, word, &mut printed).await?;
    std::io::stdout().write_all(&printed)?;

    Ok(match status {
        LookupStatus::Found => ExitCode::SUCCESS,
        LookupStatus::NotFound => ExitCode::from(EXIT_NOT_FOUND),
    })
}

fn export(paths: &Paths, config: &Config, out: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let out = out.unwrap_or_else(|| paths.export(config));
    let cache = controller::open_cache(config, paths)?;
    let cache = cache.lock().map_err(|_| anyhow::anyhow!("cache lock poisoned"))?;

    let count = tuidict_store::export_words(&**cache, &out)
        .with_context(|| format!("exporting to {}", out.display()))?;
    println!("exported {count} word(s) to {}", out.display());
    Ok(ExitCode::SUCCESS)
}
