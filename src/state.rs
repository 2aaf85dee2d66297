use crate::config::AppConfig;
use crate::models::RoomRegistry;
use crate::services::ai::{EmbeddingProvider, LlmProvider};
use crate::services::reservations::ReservationSource;
use crate::services::scraper::SnapshotFetcher;

pub struct AppState {
    pub config: AppConfig,
    pub registry: RoomRegistry,
    pub llm: Box<dyn LlmProvider>,
    pub embedder: Box<dyn EmbeddingProvider>,
    pub source: Box<dyn ReservationSource>,
    pub fetcher: Box<dyn SnapshotFetcher>,
}
