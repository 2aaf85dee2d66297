//! The conversation session: collect a building and date, confirm, load the
//! day's snapshot, then answer questions over it.
//!
//! All query state lives in the session object; the caller owns its
//! lifecycle (one per conversation, reset on topic change).

use std::path::Path;

use chrono::Local;

use crate::models::{AvailabilityReport, PendingQuery, ReservationRecord, SessionPhase};
use crate::services::ai::Message;
use crate::services::memory::ConversationMemory;
use crate::services::retrieval::VectorIndex;
use crate::services::{engine, intent, reservations, retrieval};
use crate::state::AppState;

const SYSTEM_PROMPT: &str = "You are a meeting-room scheduling assistant. Every \
reservation covers one continuous time interval; a slot counts as reserved when \
it overlaps a reservation. Answer precisely from the provided reservation table \
and free-slot information.";

const RECENT_ROUNDS: usize = 3;

/// Everything derived from one loaded building-day snapshot.
pub struct LoadedDay {
    pub report: AvailabilityReport,
    pub records: Vec<ReservationRecord>,
    /// `None` when the embedding backend was unavailable; answering then
    /// falls back to the plain context blocks.
    pub index: Option<VectorIndex>,
}

pub struct ChatSession {
    phase: SessionPhase,
    query: PendingQuery,
    memory: ConversationMemory,
    loaded: Option<LoadedDay>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Collecting,
            query: PendingQuery::default(),
            memory: ConversationMemory::new(),
            loaded: None,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn loaded(&self) -> Option<&LoadedDay> {
        self.loaded.as_ref()
    }

    /// Drop the current topic entirely: query, loaded data and memory.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub async fn process_line(&mut self, state: &AppState, line: &str) -> anyhow::Result<String> {
        tracing::debug!(phase = self.phase.as_str(), "processing line");
        match self.phase {
            SessionPhase::Collecting => Ok(self.collect(state, line)),
            SessionPhase::Confirming => self.confirm(state, line).await,
            // Confirmed but not loaded yet: any input retries the load.
            SessionPhase::LoadPending => self.try_load(state).await,
            SessionPhase::Ready => self.answer(state, line).await,
        }
    }

    fn collect(&mut self, state: &AppState, line: &str) -> String {
        if let Some(building) = state.registry.match_building(line) {
            self.query.building = Some(building.to_string());
        }
        if let Some(date) = intent::extract_date(line, Local::now().date_naive()) {
            self.query.date = Some(date);
        }

        match (&self.query.building, &self.query.date) {
            (Some(building), Some(date)) => {
                self.phase = SessionPhase::Confirming;
                format!(
                    "Query details:\n- Building: {building}\n- Date: {}\nIs this correct? (y/n)",
                    date.format("%Y%m%d")
                )
            }
            _ => "Please provide a building name and a date (e.g. 2025/07/14 Riverside, \
                  or 20250714)."
                .to_string(),
        }
    }

    async fn confirm(&mut self, state: &AppState, line: &str) -> anyhow::Result<String> {
        if line.trim().eq_ignore_ascii_case("y") {
            self.phase = SessionPhase::LoadPending;
            self.try_load(state).await
        } else {
            self.phase = SessionPhase::Collecting;
            self.query = PendingQuery::default();
            Ok("Okay, let's start over. Which building and date should I look up?".to_string())
        }
    }

    async fn try_load(&mut self, state: &AppState) -> anyhow::Result<String> {
        let (building, date) = match (&self.query.building, self.query.date) {
            (Some(building), Some(date)) => (building.clone(), date),
            _ => {
                self.phase = SessionPhase::Collecting;
                return Ok("I lost the query details, let's start over. Which building \
                           and date?"
                    .to_string());
            }
        };
        let date_key = date.format("%Y%m%d").to_string();

        let mut records = state.source.latest_for(&date_key).await?;

        if records.is_none() {
            tracing::warn!(date = %date_key, "no cached snapshot, requesting a scrape");
            match state.registry.code_for(&building) {
                Ok(code) => {
                    let site_date = date.format("%Y/%m/%d").to_string();
                    match state.fetcher.fetch(&site_date, code).await {
                        Ok(()) => {
                            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                            records = state.source.latest_for(&date_key).await?;
                        }
                        Err(err) => tracing::error!(error = %err, "scrape request failed"),
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "cannot scrape without a building code")
                }
            }
        }

        let Some(records) = records else {
            return Ok(format!(
                "I couldn't get reservation data for {date_key}. Please try again in a moment."
            ));
        };

        let grid = engine::build_slot_grid(
            state.config.day_start,
            state.config.day_end,
            state.config.slot_minutes,
        )?;
        let registry_rooms = match state.registry.rooms_for(&building) {
            Ok(rooms) => Some(rooms),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "registry fallback: reporting reservation-derived rooms only"
                );
                None
            }
        };
        let report = engine::compute_availability(
            &building,
            &date_key,
            &records,
            &grid,
            registry_rooms.as_deref(),
        );
        for skip in &report.skipped {
            tracing::warn!(
                room = %skip.room,
                start = %skip.start_time,
                end = %skip.end_time,
                reason = %skip.reason,
                "skipped reservation record"
            );
        }

        if let Err(err) =
            reservations::write_schedule_log(Path::new(&state.config.cache_dir), &date_key, &records)
        {
            tracing::warn!(error = %err, "failed to write schedule log");
        }

        self.memory
            .update_context("reservation table", &reservations::render_csv(&records));
        self.memory
            .update_context("free slots", &report.free_slot_summary());

        let documents = retrieval::build_documents(&report, &records, &state.registry);
        let index = match VectorIndex::build(documents, state.embedder.as_ref()).await {
            Ok(index) => {
                tracing::info!(documents = index.len(), "retrieval index ready");
                Some(index)
            }
            Err(err) => {
                tracing::warn!(error = %err, "retrieval unavailable, using plain context");
                None
            }
        };

        let mut reply = format!(
            "Loaded {} reservation(s) for {building} on {date_key}.",
            records.len()
        );
        if !report.skipped.is_empty() {
            reply.push_str(&format!(
                " Skipped {} malformed record(s).",
                report.skipped.len()
            ));
        }
        reply.push_str(" You can now ask about reservations and free slots.");

        self.loaded = Some(LoadedDay {
            report,
            records,
            index,
        });
        self.phase = SessionPhase::Ready;
        Ok(reply)
    }

    async fn answer(&mut self, state: &AppState, line: &str) -> anyhow::Result<String> {
        self.memory.append("user", line);

        let reply = match self.retrieval_answer(state, line).await {
            Ok(Some(reply)) => reply,
            Ok(None) => self.plain_answer(state).await?,
            Err(err) => {
                tracing::warn!(error = %err, "retrieval failed, using plain context");
                self.plain_answer(state).await?
            }
        };

        self.memory.append("assistant", &reply);
        Ok(reply)
    }

    /// RAG path: retrieve the most relevant documents for the question and
    /// let the model answer from them. `Ok(None)` means no index is
    /// available and the caller should use the plain path.
    async fn retrieval_answer(
        &self,
        state: &AppState,
        line: &str,
    ) -> anyhow::Result<Option<String>> {
        let Some(index) = self.loaded.as_ref().and_then(|l| l.index.as_ref()) else {
            return Ok(None);
        };

        let documents = index
            .retrieve(line, state.embedder.as_ref(), state.config.retrieval_top_k)
            .await?;
        let retrieved = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n---\n");

        let prompt = format!(
            "User question: {line}\n\nRetrieved information:\n{retrieved}\n\n\
             Answer the question precisely based on the information above."
        );
        let mut messages = self.memory.recent(RECENT_ROUNDS).to_vec();
        messages.push(Message::new("user", &prompt));

        let reply = state.llm.chat(&self.system_prompt(), &messages).await?;
        Ok(Some(reply))
    }

    /// Plain path: context blocks plus the recent rounds.
    async fn plain_answer(&self, state: &AppState) -> anyhow::Result<String> {
        let mut messages = self.memory.context_messages();
        messages.extend(self.memory.recent(RECENT_ROUNDS).iter().cloned());
        state.llm.chat(&self.system_prompt(), &messages).await
    }

    fn system_prompt(&self) -> String {
        format!(
            "{SYSTEM_PROMPT} Today is {}.",
            Local::now().format("%Y-%m-%d")
        )
    }
}
