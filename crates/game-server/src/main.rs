mod config;
mod wiring;

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use api::{AppState, SaveStore};
use market_sim::SeededSource;
use runtime::{
    journal::{JournalSink, NewsJournalCsvWriter},
    spawn_game, BroadcastSink, GameEngine,
};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FEED_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = config::Config::from_env()?;
    let journal = initialize_news_journal(&config.journal_output_path)?;

    let (events_tx, _) = broadcast::channel(FEED_BUFFER);
    let sinks = (
        BroadcastSink::new(events_tx.clone()),
        JournalSink::new(journal),
    );
    let rng = match config.rng_seed {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::from_entropy(),
    };
    let engine = GameEngine::new(config.settings, rng, sinks)?;
    let (game, driver) = spawn_game(engine, config.tick);

    if let Some(initial_time) = config.autostart_seconds {
        game.start_round(initial_time).await?;
    }

    let state = AppState::new(game, events_tx, SaveStore::new(&config.save_path));
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, tick = ?config.tick, "game server listening");

    axum::serve(listener, wiring::build_app(state)).await?;
    driver.abort();
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_server=info,runtime=info,api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn initialize_news_journal(
    path: &str,
) -> Result<NewsJournalCsvWriter<BufWriter<File>>, std::io::Error> {
    let journal_path = Path::new(path);

    if let Some(parent) = journal_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    let journal_file = File::create(journal_path)?;
    let mut journal = NewsJournalCsvWriter::new(BufWriter::new(journal_file));
    journal.write_header()?;
    journal.flush()?;
    Ok(journal)
}
