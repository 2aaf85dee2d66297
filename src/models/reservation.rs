use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// One reservation row as produced by the reservation source.
///
/// Times are kept as raw strings so a single malformed row can be skipped
/// with a diagnostic instead of failing the whole snapshot. `date` is an
/// opaque `YYYYMMDD` grouping key; calendar validation is the source's
/// responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub building: String,
    pub room: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub host: String,
}

/// A validated reservation with parsed time-of-day endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub building: String,
    pub room: String,
    pub date: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub topic: String,
    pub host: String,
}

impl ReservationRecord {
    /// Parse the `HH:MM` time strings and enforce `start < end`.
    pub fn validate(&self) -> Result<Reservation, EngineError> {
        let start = parse_time(&self.room, &self.start_time)?;
        let end = parse_time(&self.room, &self.end_time)?;
        if start >= end {
            return Err(EngineError::InvalidReservation {
                room: self.room.clone(),
                reason: format!(
                    "start {} is not before end {}",
                    self.start_time, self.end_time
                ),
            });
        }
        Ok(Reservation {
            building: self.building.clone(),
            room: self.room.clone(),
            date: self.date.clone(),
            start,
            end,
            topic: self.topic.clone(),
            host: self.host.clone(),
        })
    }
}

fn parse_time(room: &str, s: &str) -> Result<NaiveTime, EngineError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| EngineError::InvalidReservation {
        room: room.to_string(),
        reason: format!("unparsable time {s:?} (expected HH:MM)"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: &str, end: &str) -> ReservationRecord {
        ReservationRecord {
            building: "Riverside".to_string(),
            room: "Room 1501".to_string(),
            date: "20250714".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            topic: "Weekly sync".to_string(),
            host: "Sales / Alice".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let res = record("09:00", "10:30").validate().unwrap();
        assert_eq!(res.start.to_string(), "09:00:00");
        assert_eq!(res.end.to_string(), "10:30:00");
        assert_eq!(res.room, "Room 1501");
    }

    #[test]
    fn test_validate_unparsable_time() {
        let err = record("9am", "10:30").validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidReservation { .. }));
        assert!(err.to_string().contains("unparsable time"));
    }

    #[test]
    fn test_validate_start_not_before_end() {
        let err = record("10:30", "10:30").validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidReservation { .. }));
        assert!(err.to_string().contains("not before"));
    }
}
