use ulid::Ulid;

use super::*;
use crate::model::*;

const H: Minute = 60; // 1 hour in minutes

fn booking(resource: &str, start: Minute, end: Minute) -> ReservationInterval {
    ReservationInterval {
        id: Ulid::new(),
        resource_id: resource.into(),
        span: Span::new(start, end),
        title: None,
    }
}

/// Snapshot of `room-1` with the given bookings.
fn room(bookings: &[(Minute, Minute)]) -> Snapshot {
    Snapshot::ready(ResourceSchedule::from_intervals(
        "room-1",
        bookings.iter().map(|&(s, e)| booking("room-1", s, e)),
    ))
}

fn participant() -> Member {
    Member {
        id: "u1".into(),
        name: "Kim".into(),
        email: "kim@example.com".into(),
        teams: vec!["platform".into()],
        profile_image: String::new(),
    }
}

fn draft(start: &str, end: &str) -> ReservationDraft {
    ReservationDraft {
        title: "design review".into(),
        resource_id: "room-1".into(),
        start_time: start.into(),
        end_time: end.into(),
        participants: vec![participant()],
    }
}

fn issues(errors: &FieldErrors, field: Field) -> Vec<Issue> {
    errors.for_field(field).collect()
}

// ── Conflict predicate ───────────────────────────────────

#[test]
fn empty_schedule_never_conflicts() {
    let snapshot = room(&[]);
    for (s, e) in [(0, 1440), (600, 660), (0, 1), (1439, 1440)] {
        assert!(!has_time_conflict(&snapshot, s, e, "room-1"));
    }
}

#[test]
fn exact_overlap_conflicts_on_same_resource_only() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    assert!(has_time_conflict(&snapshot, 10 * H, 11 * H, "room-1"));
    assert!(!has_time_conflict(&snapshot, 10 * H, 11 * H, "room-2"));
}

#[test]
fn adjacent_intervals_do_not_conflict() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    assert!(!has_time_conflict(&snapshot, 11 * H, 12 * H, "room-1"));
    assert!(!has_time_conflict(&snapshot, 9 * H, 10 * H, "room-1"));
}

#[test]
fn one_minute_overlap_conflicts() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    assert!(has_time_conflict(&snapshot, 11 * H - 1, 12 * H, "room-1"));
    assert!(has_time_conflict(&snapshot, 9 * H, 10 * H + 1, "room-1"));
}

#[test]
fn candidate_swallowing_reservation_conflicts() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    assert!(has_time_conflict(&snapshot, 9 * H, 12 * H, "room-1"));
}

#[test]
fn instant_check_is_half_open() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    assert!(has_time_conflict(&snapshot, 10 * H, 10 * H, "room-1"));
    assert!(has_time_conflict(&snapshot, 10 * H + 30, 10 * H + 30, "room-1"));
    assert!(!has_time_conflict(&snapshot, 11 * H, 11 * H, "room-1"));
}

#[test]
fn loading_snapshot_fails_open() {
    let snapshot = Snapshot::Loading;
    assert!(!has_time_conflict(&snapshot, 0, 1440, "room-1"));
    assert!(!has_time_conflict(&snapshot, 600, 600, "room-1"));
}

#[test]
fn reversed_range_never_conflicts() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    assert!(!has_time_conflict(&snapshot, 11 * H, 10 * H, "room-1"));
}

#[test]
fn conflicting_lists_blocking_reservations() {
    let first = booking("room-1", 9 * H, 10 * H);
    let second = booking("room-1", 10 * H, 11 * H);
    let snapshot = Snapshot::ready(ResourceSchedule::from_intervals(
        "room-1",
        vec![first.clone(), second.clone(), booking("room-1", 13 * H, 14 * H)],
    ));
    let ids = conflicting(&snapshot, 9 * H + 30, 10 * H + 30, "room-1");
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(conflicting(&snapshot, 9 * H + 30, 10 * H + 30, "room-2").is_empty());
}

// ── Attribution ──────────────────────────────────────────

#[test]
fn start_inside_reservation_blames_start() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    let errors = validate(&draft("10:30", "11:30"), &snapshot).unwrap_err();
    assert_eq!(issues(&errors, Field::StartTime), vec![Issue::AlreadyReserved]);
    assert!(issues(&errors, Field::EndTime).is_empty());
}

#[test]
fn end_inside_reservation_blames_end() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    let errors = validate(&draft("09:30", "10:30"), &snapshot).unwrap_err();
    assert_eq!(issues(&errors, Field::EndTime), vec![Issue::AlreadyReserved]);
    assert!(issues(&errors, Field::StartTime).is_empty());
}

#[test]
fn swallowed_reservation_falls_back_to_end() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    let errors = validate(&draft("09:00", "12:00"), &snapshot).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(issues(&errors, Field::EndTime), vec![Issue::AlreadyReserved]);
}

#[test]
fn both_endpoints_inside_reservations_blame_both() {
    let snapshot = room(&[(9 * H, 10 * H), (11 * H, 12 * H)]);
    let errors = validate(&draft("09:30", "11:30"), &snapshot).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(issues(&errors, Field::StartTime), vec![Issue::AlreadyReserved]);
    assert_eq!(issues(&errors, Field::EndTime), vec![Issue::AlreadyReserved]);
}

#[test]
fn exact_duplicate_blames_start() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    let errors = validate(&draft("10:00", "11:00"), &snapshot).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(issues(&errors, Field::StartTime), vec![Issue::AlreadyReserved]);
}

// ── Ordering ─────────────────────────────────────────────

#[test]
fn end_not_after_start_is_single_end_error() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    for (start, end) in [("10:30", "10:30"), ("10:45", "10:15"), ("11:00", "09:00")] {
        let errors = validate(&draft(start, end), &snapshot).unwrap_err();
        assert_eq!(errors.len(), 1, "{start}-{end}");
        assert_eq!(issues(&errors, Field::EndTime), vec![Issue::InvalidTimeRange]);
    }
}

#[test]
fn ordering_not_reported_while_loading() {
    assert!(validate(&draft("12:00", "11:00"), &Snapshot::Loading).is_ok());

    let errors = validate(&draft("12:00", "11:00"), &room(&[])).unwrap_err();
    assert_eq!(issues(&errors, Field::EndTime), vec![Issue::InvalidTimeRange]);
}

#[test]
fn loading_snapshot_accepts_overlapping_draft() {
    assert!(validate(&draft("10:00", "11:00"), &Snapshot::Loading).is_ok());
}

#[test]
fn end_of_day_reservation() {
    let snapshot = room(&[(22 * H, 24 * H)]);
    assert!(validate(&draft("21:00", "22:00"), &snapshot).is_ok());
    let errors = validate(&draft("23:00", "24:00"), &snapshot).unwrap_err();
    assert_eq!(issues(&errors, Field::StartTime), vec![Issue::AlreadyReserved]);
}

// ── End to end ───────────────────────────────────────────

#[test]
fn room_scenario() {
    let snapshot = room(&[(10 * H, 11 * H)]);

    assert!(validate(&draft("10:30", "11:30"), &snapshot).is_err());

    let ok = validate(&draft("11:00", "12:00"), &snapshot).unwrap();
    assert_eq!(ok.resource_id, "room-1");
    assert_eq!(ok.span, Span::new(11 * H, 12 * H));
}

#[test]
fn other_resource_is_independent() {
    let snapshot = room(&[(10 * H, 11 * H)]);
    let mut d = draft("10:00", "11:00");
    d.resource_id = "room-2".into();
    // The snapshot belongs to room-1, so nothing is known about room-2
    assert!(validate(&d, &snapshot).is_ok());
}
