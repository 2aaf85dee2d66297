//! Slot-availability engine.
//!
//! Turns a snapshot of reservation intervals for one building-day into a
//! per-room partition of a fixed slot grid into reserved and free slots.
//! Pure and stateless: no I/O, no caching, recomputed from scratch per query.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveTime};

use crate::errors::EngineError;
use crate::models::{AvailabilityReport, ReservationRecord, RoomAvailability, SkippedRecord, TimeSlot};

/// Generate the ordered sequence of contiguous, non-overlapping slots of
/// `slot_minutes` width covering `[start_of_day, end_of_day)`.
///
/// The window must divide evenly into slots; a remainder is rejected with
/// `InvalidConfiguration` rather than silently truncated.
pub fn build_slot_grid(
    start_of_day: NaiveTime,
    end_of_day: NaiveTime,
    slot_minutes: u32,
) -> Result<Vec<TimeSlot>, EngineError> {
    if slot_minutes == 0 {
        return Err(EngineError::InvalidConfiguration(
            "slot width must be positive".to_string(),
        ));
    }
    if start_of_day >= end_of_day {
        return Err(EngineError::InvalidConfiguration(format!(
            "day window start {} is not before end {}",
            start_of_day.format("%H:%M"),
            end_of_day.format("%H:%M")
        )));
    }

    let total = (end_of_day - start_of_day).num_minutes();
    let width = i64::from(slot_minutes);
    if total % width != 0 {
        return Err(EngineError::InvalidConfiguration(format!(
            "day window of {total} minutes does not divide evenly into {slot_minutes}-minute slots"
        )));
    }

    let grid = (0..total / width)
        .map(|i| {
            TimeSlot::new(
                start_of_day + Duration::minutes(i * width),
                start_of_day + Duration::minutes((i + 1) * width),
            )
        })
        .collect();
    Ok(grid)
}

/// The subsequence of grid slots a reservation interval overlaps, in grid
/// order. Overlap is strict half-open intersection (see [`TimeSlot::overlaps`]);
/// a reservation spanning several slots returns all of them, one shorter than
/// a slot returns the slot it falls within (or two when it straddles a
/// boundary).
pub fn overlapping_slots(grid: &[TimeSlot], start: NaiveTime, end: NaiveTime) -> Vec<TimeSlot> {
    grid.iter()
        .filter(|slot| slot.overlaps(start, end))
        .copied()
        .collect()
}

/// Aggregate a building-day's reservation records into per-room availability.
///
/// Reserved slots accumulate per room as a set union, so a slot covered by
/// two back-to-back or overlapping meetings is listed once. `free` is the
/// grid minus the reserved set, preserving grid order. Registry rooms with
/// no reservations come out fully free; rooms found only in the data are
/// kept as well. Records whose times fail to validate are skipped and
/// reported in the diagnostics, never dropped silently.
pub fn compute_availability(
    building: &str,
    date: &str,
    records: &[ReservationRecord],
    grid: &[TimeSlot],
    registry_rooms: Option<&[String]>,
) -> AvailabilityReport {
    let mut reserved: BTreeMap<String, BTreeSet<TimeSlot>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for record in records {
        match record.validate() {
            Ok(reservation) => {
                let hit = overlapping_slots(grid, reservation.start, reservation.end);
                reserved.entry(reservation.room).or_default().extend(hit);
            }
            Err(err) => skipped.push(SkippedRecord {
                room: record.room.clone(),
                start_time: record.start_time.clone(),
                end_time: record.end_time.clone(),
                reason: err.to_string(),
            }),
        }
    }

    // Rooms the registry knows but the snapshot never mentions are fully free.
    if let Some(rooms) = registry_rooms {
        for room in rooms {
            reserved.entry(room.clone()).or_default();
        }
    }

    let rooms = reserved
        .into_iter()
        .map(|(room, taken)| RoomAvailability {
            room,
            reserved: grid.iter().filter(|s| taken.contains(*s)).copied().collect(),
            free: grid.iter().filter(|s| !taken.contains(*s)).copied().collect(),
        })
        .collect();

    AvailabilityReport {
        building: building.to_string(),
        date: date.to_string(),
        rooms,
        skipped,
    }
}
