//! Property-based tests for the slot-availability engine.

use chrono::NaiveTime;
use proptest::prelude::*;

use roomdesk::models::{ReservationRecord, TimeSlot};
use roomdesk::services::engine::{build_slot_grid, compute_availability};

fn minutes(m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap()
}

fn hhmm(m: u32) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}

fn record(room: usize, start: u32, end: u32) -> ReservationRecord {
    ReservationRecord {
        building: "A".to_string(),
        room: format!("room-{room}"),
        date: "20250714".to_string(),
        start_time: hhmm(start),
        end_time: hhmm(end),
        topic: String::new(),
        host: String::new(),
    }
}

/// Day windows that divide evenly: (start minute, slot width, slot count).
fn window() -> impl Strategy<Value = (u32, u32, u32)> {
    (prop::sample::select(vec![5u32, 10, 15, 30, 60]), 1u32..=20).prop_flat_map(
        |(width, slots)| {
            let span = width * slots;
            (0..=(1380 - span)).prop_map(move |start| (start, width, slots))
        },
    )
}

/// Reservations inside an 08:00-18:00 day, `start < end` by construction.
fn reservations() -> impl Strategy<Value = Vec<(usize, u32, u32)>> {
    prop::collection::vec(
        (0usize..3, 480u32..1050, 5u32..300).prop_map(|(room, start, len)| {
            (room, start, (start + len).min(1080))
        }),
        0..10,
    )
}

proptest! {
    #[test]
    fn grid_covers_window_without_gaps((start, width, slots) in window()) {
        let grid = build_slot_grid(minutes(start), minutes(start + width * slots), width).unwrap();

        prop_assert_eq!(grid.len() as u32, slots);
        prop_assert_eq!(grid[0].start, minutes(start));
        prop_assert_eq!(grid[grid.len() - 1].end, minutes(start + width * slots));
        for pair in grid.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn grid_rejects_uneven_windows((start, width, slots) in window()) {
        // Push the window end off the slot boundary.
        prop_assume!(width > 1);
        let end = start + width * slots + 1;
        prop_assume!(end <= 1380);
        prop_assert!(build_slot_grid(minutes(start), minutes(end), width).is_err());
    }

    #[test]
    fn reserved_and_free_partition_the_grid(specs in reservations()) {
        let grid = build_slot_grid(minutes(480), minutes(1080), 30).unwrap();
        let records: Vec<ReservationRecord> = specs
            .iter()
            .map(|&(room, start, end)| record(room, start, end))
            .collect();

        let report = compute_availability("A", "20250714", &records, &grid, None);
        prop_assert!(report.skipped.is_empty());

        for room in &report.rooms {
            prop_assert_eq!(room.reserved.len() + room.free.len(), grid.len());
            let mut all: Vec<TimeSlot> =
                room.reserved.iter().chain(&room.free).copied().collect();
            all.sort();
            prop_assert_eq!(&all, &grid);
            for slot in &room.reserved {
                prop_assert!(!room.free.contains(slot));
            }
        }
    }

    #[test]
    fn duplicate_reservations_are_idempotent(specs in reservations()) {
        let grid = build_slot_grid(minutes(480), minutes(1080), 30).unwrap();
        let once: Vec<ReservationRecord> = specs
            .iter()
            .map(|&(room, start, end)| record(room, start, end))
            .collect();
        let twice: Vec<ReservationRecord> =
            once.iter().chain(once.iter()).cloned().collect();

        let report_once = compute_availability("A", "20250714", &once, &grid, None);
        let report_twice = compute_availability("A", "20250714", &twice, &grid, None);

        prop_assert_eq!(report_once.rooms.len(), report_twice.rooms.len());
        for (a, b) in report_once.rooms.iter().zip(&report_twice.rooms) {
            prop_assert_eq!(&a.room, &b.room);
            prop_assert_eq!(&a.reserved, &b.reserved);
            prop_assert_eq!(&a.free, &b.free);
        }
    }

    #[test]
    fn aligned_reservation_marks_exact_slot_count(
        slot_index in 0u32..18,
        span_slots in 1u32..3,
    ) {
        let grid = build_slot_grid(minutes(480), minutes(1080), 30).unwrap();
        let start = 480 + slot_index * 30;
        let end = start + span_slots * 30;
        let records = vec![record(0, start, end)];

        let report = compute_availability("A", "20250714", &records, &grid, None);
        let room = report.room("room-0").unwrap();
        prop_assert_eq!(room.reserved.len() as u32, span_slots);
        prop_assert_eq!(room.reserved[0].start, minutes(start));
        prop_assert_eq!(room.reserved[room.reserved.len() - 1].end, minutes(end));
    }
}
