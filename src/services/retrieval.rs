//! Retrieval index over the loaded day: one document per reservation and one
//! per room's availability, embedded and ranked by cosine similarity.

use serde::Serialize;

use crate::models::{AvailabilityReport, ReservationRecord, RoomRegistry};
use crate::services::ai::EmbeddingProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Reserved,
    Availability,
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub room: String,
    pub content: String,
}

/// Build the day's documents: every reservation as a "reserved" card, every
/// room in the report as an "availability" card (floor and capacity filled in
/// from the registry when it knows the room).
pub fn build_documents(
    report: &AvailabilityReport,
    records: &[ReservationRecord],
    registry: &RoomRegistry,
) -> Vec<Document> {
    let mut documents = Vec::new();

    for record in records {
        documents.push(Document {
            kind: DocumentKind::Reserved,
            room: record.room.clone(),
            content: format!(
                "Room: {} {}\nDate: {}\nTime: {}-{}\nTopic: {}\nHost: {}\nStatus: reserved",
                record.building,
                record.room,
                record.date,
                record.start_time,
                record.end_time,
                record.topic,
                record.host
            ),
        });
    }

    for room in &report.rooms {
        let location = registry
            .room_location(&report.building, &room.room)
            .map(|(floor, capacity)| format!("\nFloor: {floor}\nCapacity: {capacity} people"))
            .unwrap_or_default();
        let free = if room.free.is_empty() {
            "none".to_string()
        } else {
            room.free
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let status = if room.is_fully_booked() {
            "fully booked"
        } else if room.is_fully_free() {
            "free all day"
        } else {
            "partially available"
        };
        documents.push(Document {
            kind: DocumentKind::Availability,
            room: room.room.clone(),
            content: format!(
                "Room: {} {}{}\nDate: {}\nFree slots: {}\nStatus: {}",
                report.building, room.room, location, report.date, free, status
            ),
        });
    }

    documents
}

/// In-memory vector index: documents paired with their embeddings.
pub struct VectorIndex {
    entries: Vec<(Document, Vec<f32>)>,
}

impl VectorIndex {
    /// Embed every document up front. Fails if any embedding call fails; the
    /// caller degrades to the plain-memory answer path in that case.
    pub async fn build(
        documents: Vec<Document>,
        embedder: &dyn EmbeddingProvider,
    ) -> anyhow::Result<Self> {
        let mut entries = Vec::with_capacity(documents.len());
        for doc in documents {
            let embedding = embedder.embed(&doc.content).await?;
            entries.push((doc, embedding));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k documents by cosine similarity to the query embedding.
    pub fn rank(&self, query: &[f32], k: usize) -> Vec<&Document> {
        let mut scored: Vec<(f32, &Document)> = self
            .entries
            .iter()
            .map(|(doc, embedding)| (cosine(query, embedding), doc))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().take(k).map(|(_, doc)| doc).collect()
    }

    /// Embed the query and return the top-k documents.
    pub async fn retrieve(
        &self,
        query: &str,
        embedder: &dyn EmbeddingProvider,
        k: usize,
    ) -> anyhow::Result<Vec<&Document>> {
        let embedding = embedder.embed(query).await?;
        Ok(self.rank(&embedding, k))
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
