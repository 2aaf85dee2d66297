use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)` within a single day.
///
/// Two slots are equal iff both endpoints match exactly. Ordering is by
/// `(start, end)`, which matches grid order for slots produced by the grid
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Strict half-open interval overlap.
    ///
    /// A reservation ending exactly at this slot's start, or starting exactly
    /// at this slot's end, does NOT overlap. A naive "reservation endpoint
    /// falls within slot bounds" test undercounts partial overlaps.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start < end && start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn test_display() {
        let slot = TimeSlot::new(t("08:00"), t("08:30"));
        assert_eq!(slot.to_string(), "08:00-08:30");
    }

    #[test]
    fn test_overlap_strict_at_boundaries() {
        let slot = TimeSlot::new(t("10:00"), t("10:30"));
        // Reservation ending exactly at slot start does not overlap
        assert!(!slot.overlaps(t("09:00"), t("10:00")));
        // Reservation starting exactly at slot end does not overlap
        assert!(!slot.overlaps(t("10:30"), t("11:00")));
        // One minute into the slot does
        assert!(slot.overlaps(t("09:00"), t("10:01")));
        assert!(slot.overlaps(t("10:29"), t("11:00")));
    }

    #[test]
    fn test_overlap_contained_reservation() {
        let slot = TimeSlot::new(t("10:00"), t("10:30"));
        assert!(slot.overlaps(t("10:10"), t("10:20")));
    }

    #[test]
    fn test_ordering_matches_grid_order() {
        let a = TimeSlot::new(t("08:00"), t("08:30"));
        let b = TimeSlot::new(t("08:30"), t("09:00"));
        assert!(a < b);
    }
}
