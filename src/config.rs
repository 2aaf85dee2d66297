use std::env;

use chrono::NaiveTime;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ollama_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub scraper_url: String,
    pub cache_dir: String,
    pub registry_path: String,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub slot_minutes: u32,
    pub retrieval_top_k: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gemma3:12b".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text:latest".to_string()),
            scraper_url: env::var("SCRAPER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8888".to_string()),
            cache_dir: env::var("CACHE_DIR").unwrap_or_else(|_| "rag-file".to_string()),
            registry_path: env::var("REGISTRY_PATH")
                .unwrap_or_else(|_| "registry.json".to_string()),
            day_start: time_var("DAY_START", "07:00"),
            day_end: time_var("DAY_END", "18:00"),
            slot_minutes: env::var("SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            retrieval_top_k: env::var("RETRIEVAL_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}

fn time_var(key: &str, default: &str) -> NaiveTime {
    env::var(key)
        .ok()
        .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
        .or_else(|| NaiveTime::parse_from_str(default, "%H:%M").ok())
        .unwrap_or(NaiveTime::MIN)
}
