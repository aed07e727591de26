use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

use crate::limits::{MAX_END_HOUR, MAX_START_HOUR, MINUTES_PER_HOUR};

/// Minutes since local midnight. The only time type; reservations are same-day.
pub type Minute = u32;

/// Which side of a reservation a time string belongs to.
/// End times may use hour `24` to mean end of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    Start,
    End,
}

impl TimeBound {
    fn max_hour(self) -> u32 {
        match self {
            TimeBound::Start => MAX_START_HOUR,
            TimeBound::End => MAX_END_HOUR,
        }
    }
}

/// Parse a strict `HH:MM` 24-hour time. Returns `None` for anything else.
pub fn parse_time(s: &str, bound: TimeBound) -> Option<Minute> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |b: u8| b.is_ascii_digit().then(|| u32::from(b - b'0'));
    let hours = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minutes = digit(bytes[3])? * 10 + digit(bytes[4])?;
    if hours > bound.max_hour() || minutes >= MINUTES_PER_HOUR {
        return None;
    }
    Some(hours * MINUTES_PER_HOUR + minutes)
}

/// Render minutes since midnight back to `HH:MM`.
pub fn format_time(t: Minute) -> String {
    format!("{:02}:{:02}", t / MINUTES_PER_HOUR, t % MINUTES_PER_HOUR)
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Minute,
    pub end: Minute,
}

impl Span {
    pub fn new(start: Minute, end: Minute) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Minute) -> bool {
        self.start <= t && t < self.end
    }
}

/// One existing reservation, as read from the reservation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationInterval {
    pub id: Ulid,
    pub resource_id: String,
    pub span: Span,
    pub title: Option<String>,
}

/// Every reservation of a single resource, sorted by `span.start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchedule {
    resource_id: String,
    intervals: Vec<ReservationInterval>,
}

impl ResourceSchedule {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            intervals: Vec::new(),
        }
    }

    /// Build a schedule, dropping intervals that belong to other resources.
    pub fn from_intervals(
        resource_id: impl Into<String>,
        intervals: impl IntoIterator<Item = ReservationInterval>,
    ) -> Self {
        let mut schedule = Self::new(resource_id);
        for interval in intervals {
            schedule.insert(interval);
        }
        schedule
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn intervals(&self) -> &[ReservationInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Insert maintaining sort order by span.start.
    /// Returns false (and keeps nothing) for another resource's interval.
    pub fn insert(&mut self, interval: ReservationInterval) -> bool {
        if interval.resource_id != self.resource_id {
            return false;
        }
        let pos = self
            .intervals
            .binary_search_by_key(&interval.span.start, |i| i.span.start)
            .unwrap_or_else(|e| e);
        self.intervals.insert(pos, interval);
        true
    }

    /// Intervals whose span overlaps `query`.
    /// Binary search skips intervals starting at or after `query.end`.
    pub fn overlapping(&self, query: &Span) -> impl Iterator<Item = &ReservationInterval> {
        let right_bound = self
            .intervals
            .partition_point(|i| i.span.start < query.end);
        self.intervals[..right_bound]
            .iter()
            .filter(move |i| i.span.end > query.start)
    }

    /// Intervals containing the instant `t`.
    pub fn covering(&self, t: Minute) -> impl Iterator<Item = &ReservationInterval> {
        let right_bound = self.intervals.partition_point(|i| i.span.start <= t);
        self.intervals[..right_bound]
            .iter()
            .filter(move |i| i.span.contains_instant(t))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("reservation {id}: missing resource id")]
    MissingResource { id: Ulid },
    #[error("reservation {id}: invalid {field} {value:?}")]
    InvalidTime {
        id: Ulid,
        field: &'static str,
        value: String,
    },
    #[error("reservation {id}: end {end} is not after start {start}")]
    EmptySpan { id: Ulid, start: String, end: String },
}

/// A stored reservation as it appears on the wire (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    #[serde(default = "Ulid::new")]
    pub id: Ulid,
    pub resource_id: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl TryFrom<ReservationRecord> for ReservationInterval {
    type Error = RecordError;

    fn try_from(record: ReservationRecord) -> Result<Self, Self::Error> {
        let ReservationRecord {
            id,
            resource_id,
            start_time,
            end_time,
            title,
        } = record;
        if resource_id.is_empty() {
            return Err(RecordError::MissingResource { id });
        }
        let start = parse_time(&start_time, TimeBound::Start).ok_or_else(|| {
            RecordError::InvalidTime {
                id,
                field: "startTime",
                value: start_time.clone(),
            }
        })?;
        let end = parse_time(&end_time, TimeBound::End).ok_or_else(|| RecordError::InvalidTime {
            id,
            field: "endTime",
            value: end_time.clone(),
        })?;
        if end <= start {
            return Err(RecordError::EmptySpan {
                id,
                start: start_time,
                end: end_time,
            });
        }
        Ok(ReservationInterval {
            id,
            resource_id,
            span: Span::new(start, end),
            title,
        })
    }
}

/// A person who can take part in a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub profile_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}
