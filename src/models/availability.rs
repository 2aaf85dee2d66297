use serde::Serialize;

use crate::models::TimeSlot;

/// Per-room partition of the day's slot grid for one building-day query.
///
/// Both lists preserve grid order. `reserved` and `free` are disjoint and
/// together cover the full grid; `free` may be empty for a fully booked room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomAvailability {
    pub room: String,
    pub reserved: Vec<TimeSlot>,
    pub free: Vec<TimeSlot>,
}

impl RoomAvailability {
    pub fn is_fully_free(&self) -> bool {
        self.reserved.is_empty()
    }

    pub fn is_fully_booked(&self) -> bool {
        self.free.is_empty()
    }
}

/// A reservation record the aggregator refused and skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub room: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

/// Engine output for one `(building, date)` query: availability per room,
/// sorted by room name, plus diagnostics for every record that was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub building: String,
    pub date: String,
    pub rooms: Vec<RoomAvailability>,
    pub skipped: Vec<SkippedRecord>,
}

impl AvailabilityReport {
    pub fn room(&self, name: &str) -> Option<&RoomAvailability> {
        self.rooms.iter().find(|r| r.room == name)
    }

    /// One line per room with free time, `- room: 08:00-08:30, ...`.
    pub fn free_slot_summary(&self) -> String {
        let mut lines = Vec::new();
        for room in &self.rooms {
            if room.free.is_empty() {
                continue;
            }
            let formatted = room
                .free
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("- {}: {}", room.room, formatted));
        }
        lines.join("\n")
    }
}
