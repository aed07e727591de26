use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::conflict::{conflicting, has_time_conflict, Snapshot};
use super::error::{Field, FieldErrors, Issue};

/// A reservation as typed into the form: raw strings plus the picked participants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationDraft {
    pub title: String,
    pub resource_id: String,
    pub start_time: String,
    pub end_time: String,
    pub participants: Vec<Member>,
}

/// Fields that survived the structural pass. `None` means the field failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedDraft {
    pub title: Option<String>,
    pub resource_id: Option<String>,
    pub start: Option<Minute>,
    pub end: Option<Minute>,
    pub participants: Option<Vec<Member>>,
}

/// A draft that passed both passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReservation {
    pub title: String,
    pub resource_id: String,
    pub span: Span,
    pub participants: Vec<Member>,
}

impl ValidReservation {
    pub fn start_time(&self) -> String {
        format_time(self.span.start)
    }

    pub fn end_time(&self) -> String {
        format_time(self.span.end)
    }
}

fn check_title(raw: &str) -> Result<String, Issue> {
    if raw.is_empty() {
        return Err(Issue::Required);
    }
    // Length is counted before trimming.
    if raw.chars().count() > MAX_TITLE_LEN {
        return Err(Issue::too_long());
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Issue::Blank);
    }
    Ok(trimmed.to_string())
}

fn check_time(raw: &str, bound: TimeBound) -> Result<Minute, Issue> {
    if raw.is_empty() {
        return Err(Issue::Required);
    }
    parse_time(raw, bound).ok_or(Issue::InvalidFormat)
}

fn check_participants(participants: &[Member]) -> Result<Vec<Member>, Issue> {
    if participants.len() < MIN_PARTICIPANTS {
        return Err(Issue::too_few_participants());
    }
    if participants.len() > MAX_PARTICIPANTS {
        return Err(Issue::too_many_participants());
    }
    Ok(participants.to_vec())
}

fn record<T>(errors: &mut FieldErrors, field: Field, result: Result<T, Issue>) -> Option<T> {
    result.map_err(|issue| errors.push(field, issue)).ok()
}

/// Structural pass: required fields, formats and counts. Never looks at reservations.
pub fn check_structure(draft: &ReservationDraft) -> (CheckedDraft, FieldErrors) {
    let mut errors = FieldErrors::new();
    let checked = CheckedDraft {
        title: record(&mut errors, Field::Title, check_title(&draft.title)),
        resource_id: record(
            &mut errors,
            Field::ResourceId,
            if draft.resource_id.is_empty() {
                Err(Issue::Required)
            } else {
                Ok(draft.resource_id.clone())
            },
        ),
        start: record(
            &mut errors,
            Field::StartTime,
            check_time(&draft.start_time, TimeBound::Start),
        ),
        end: record(
            &mut errors,
            Field::EndTime,
            check_time(&draft.end_time, TimeBound::End),
        ),
        participants: record(
            &mut errors,
            Field::Participants,
            check_participants(&draft.participants),
        ),
    };
    (checked, errors)
}

/// Semantic pass: time ordering, then overlap with existing reservations.
///
/// Runs only when resource, start and end all passed the structural pass
/// and the snapshot has loaded. Nothing is reported while loading.
pub fn check_schedule(checked: &CheckedDraft, snapshot: &Snapshot, errors: &mut FieldErrors) {
    if snapshot.is_loading() {
        return;
    }
    let (Some(resource_id), Some(start), Some(end)) =
        (checked.resource_id.as_deref(), checked.start, checked.end)
    else {
        return;
    };

    if end <= start {
        errors.push(Field::EndTime, Issue::InvalidTimeRange);
        return;
    }

    if !has_time_conflict(snapshot, start, end, resource_id) {
        return;
    }

    debug!(
        resource_id,
        blocking = ?conflicting(snapshot, start, end, resource_id),
        "draft overlaps existing reservations"
    );

    let start_hit = has_time_conflict(snapshot, start, start, resource_id);
    let end_hit = has_time_conflict(snapshot, end, end, resource_id);

    if start_hit {
        already_reserved(errors, Field::StartTime);
    }
    if end_hit {
        already_reserved(errors, Field::EndTime);
    }
    // Neither endpoint lands inside a reservation: the draft spans one.
    if !start_hit && !end_hit {
        already_reserved(errors, Field::EndTime);
    }
}

fn already_reserved(errors: &mut FieldErrors, field: Field) {
    errors.push(field, Issue::AlreadyReserved);
    metrics::counter!(observability::CONFLICTS_TOTAL, "field" => field.as_str()).increment(1);
}

/// Both passes. All errors of both passes are reported together.
pub fn validate(draft: &ReservationDraft, snapshot: &Snapshot) -> Result<ValidReservation, FieldErrors> {
    let (checked, mut errors) = check_structure(draft);
    check_schedule(&checked, snapshot, &mut errors);

    let outcome = if errors.is_empty() { "accepted" } else { "rejected" };
    metrics::counter!(observability::VALIDATIONS_TOTAL, "outcome" => outcome).increment(1);

    if !errors.is_empty() {
        return Err(errors);
    }
    match checked {
        CheckedDraft {
            title: Some(title),
            resource_id: Some(resource_id),
            start: Some(start),
            end: Some(end),
            participants: Some(participants),
        } => Ok(ValidReservation {
            title,
            resource_id,
            span: Span::new(start, end),
            participants,
        }),
        // Every None above was recorded as an error.
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> Member {
        Member {
            id: id.into(),
            name: format!("member {id}"),
            email: format!("{id}@example.com"),
            teams: vec![],
            profile_image: String::new(),
        }
    }

    fn draft() -> ReservationDraft {
        ReservationDraft {
            title: "weekly sync".into(),
            resource_id: "room-1".into(),
            start_time: "10:00".into(),
            end_time: "11:00".into(),
            participants: vec![member("u1")],
        }
    }

    #[test]
    fn well_formed_draft_has_no_structural_errors() {
        let (checked, errors) = check_structure(&draft());
        assert!(errors.is_empty());
        assert_eq!(checked.start, Some(600));
        assert_eq!(checked.end, Some(660));
    }

    #[test]
    fn title_rules() {
        assert_eq!(check_title(""), Err(Issue::Required));
        assert_eq!(check_title("   "), Err(Issue::Blank));
        assert_eq!(check_title(&"x".repeat(MAX_TITLE_LEN)), Ok("x".repeat(MAX_TITLE_LEN)));
        assert_eq!(check_title(&"x".repeat(MAX_TITLE_LEN + 1)), Err(Issue::too_long()));
        assert_eq!(check_title("  retro  "), Ok("retro".into()));
    }

    #[test]
    fn title_length_counts_characters() {
        // 20 multi-byte characters are still within the limit
        assert!(check_title(&"회".repeat(MAX_TITLE_LEN)).is_ok());
    }

    #[test]
    fn title_length_checked_before_trim() {
        let padded = format!("{}ab", " ".repeat(MAX_TITLE_LEN));
        assert_eq!(check_title(&padded), Err(Issue::too_long()));
    }

    #[test]
    fn missing_fields_are_required() {
        let (checked, errors) = check_structure(&ReservationDraft::default());
        assert_eq!(checked, CheckedDraft::default());
        for field in [Field::Title, Field::ResourceId, Field::StartTime, Field::EndTime] {
            assert_eq!(errors.for_field(field).collect::<Vec<_>>(), vec![Issue::Required]);
        }
        assert_eq!(
            errors.for_field(Field::Participants).collect::<Vec<_>>(),
            vec![Issue::too_few_participants()]
        );
    }

    #[test]
    fn start_time_rejects_hour_24_but_end_time_accepts_it() {
        let mut d = draft();
        d.start_time = "24:00".into();
        d.end_time = "24:00".into();
        let (_, errors) = check_structure(&d);
        assert_eq!(errors.for_field(Field::StartTime).collect::<Vec<_>>(), vec![Issue::InvalidFormat]);
        assert!(!errors.has(Field::EndTime));
    }

    #[test]
    fn participant_bounds() {
        let mut d = draft();
        d.participants = (0..MAX_PARTICIPANTS).map(|i| member(&i.to_string())).collect();
        assert!(check_structure(&d).1.is_empty());

        d.participants.push(member("extra"));
        let (_, errors) = check_structure(&d);
        assert_eq!(
            errors.for_field(Field::Participants).collect::<Vec<_>>(),
            vec![Issue::too_many_participants()]
        );
    }

    #[test]
    fn semantic_pass_skipped_when_time_malformed() {
        let mut d = draft();
        d.start_time = "12:00".into();
        d.end_time = "1100".into();
        let (checked, mut errors) = check_structure(&d);
        check_schedule(&checked, &Snapshot::ready(ResourceSchedule::new("room-1")), &mut errors);
        // Only the format error, no ordering error on top
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.for_field(Field::EndTime).collect::<Vec<_>>(), vec![Issue::InvalidFormat]);
    }

    #[test]
    fn semantic_pass_runs_despite_title_error() {
        let mut d = draft();
        d.title = String::new();
        d.start_time = "12:00".into();
        d.end_time = "11:00".into();
        let errors = validate(&d, &Snapshot::ready(ResourceSchedule::new("room-1"))).unwrap_err();
        assert!(errors.has(Field::Title));
        assert_eq!(errors.for_field(Field::EndTime).collect::<Vec<_>>(), vec![Issue::InvalidTimeRange]);
    }

    #[test]
    fn valid_draft_is_trimmed_and_formatted() {
        let mut d = draft();
        d.title = " sync ".into();
        let valid = validate(&d, &Snapshot::ready(ResourceSchedule::new("room-1"))).unwrap();
        assert_eq!(valid.title, "sync");
        assert_eq!(valid.start_time(), "10:00");
        assert_eq!(valid.end_time(), "11:00");
        assert_eq!(valid.participants.len(), 1);
    }
}
