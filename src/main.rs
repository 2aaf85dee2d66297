use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use roomdesk::config::AppConfig;
use roomdesk::models::RoomRegistry;
use roomdesk::services::ai::ollama::OllamaProvider;
use roomdesk::services::conversation::ChatSession;
use roomdesk::services::engine;
use roomdesk::services::reservations::CsvCacheSource;
use roomdesk::services::scraper::ScraperClient;
use roomdesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // Fail fast on a bad day window before any conversation starts.
    engine::build_slot_grid(config.day_start, config.day_end, config.slot_minutes)?;

    let registry = RoomRegistry::load(Path::new(&config.registry_path))?;
    tracing::info!(
        buildings = registry.buildings.len(),
        path = %config.registry_path,
        "room registry loaded"
    );

    std::fs::create_dir_all(&config.cache_dir)?;

    let llm = OllamaProvider::new(config.ollama_url.clone(), config.chat_model.clone());
    let embedder = OllamaProvider::new(config.ollama_url.clone(), config.embedding_model.clone());
    let source = CsvCacheSource::new(config.cache_dir.clone());
    let fetcher = ScraperClient::new(config.scraper_url.clone());

    let state = AppState {
        registry,
        llm: Box::new(llm),
        embedder: Box::new(embedder),
        source: Box::new(source),
        fetcher: Box::new(fetcher),
        config,
    };

    println!(
        "Hello, I'm your meeting-room assistant (model: {}). Which building and date \
         should I look up?",
        state.config.chat_model
    );

    let mut session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.to_lowercase().as_str() {
            "/exit" | "/quit" | "/bye" => break,
            "/reset" => {
                session.reset();
                println!("Session cleared. Which building and date should I look up?");
                continue;
            }
            _ => {}
        }

        match session.process_line(&state, line).await {
            Ok(reply) => println!("\n{reply}"),
            Err(err) => {
                tracing::error!(error = %err, "failed to process input");
                println!("\nSorry, something went wrong: {err}");
            }
        }
    }

    Ok(())
}
