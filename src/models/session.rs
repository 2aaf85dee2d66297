use chrono::NaiveDate;

/// Where a conversation currently stands.
///
/// The session owns all query state explicitly; nothing about the current
/// building/date/confirmation lives outside it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    /// Still collecting a building and a date from the user.
    Collecting,
    /// Both known, waiting for a y/n confirmation.
    Confirming,
    /// Confirmed but the snapshot is not loaded yet; each turn retries.
    LoadPending,
    /// Snapshot loaded and availability computed; answering questions.
    Ready,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Collecting => "collecting",
            SessionPhase::Confirming => "confirming",
            SessionPhase::LoadPending => "load_pending",
            SessionPhase::Ready => "ready",
        }
    }
}

/// The query parameters gathered so far during `Collecting`.
#[derive(Debug, Clone, Default)]
pub struct PendingQuery {
    pub building: Option<String>,
    pub date: Option<NaiveDate>,
}

impl PendingQuery {
    pub fn is_complete(&self) -> bool {
        self.building.is_some() && self.date.is_some()
    }
}
