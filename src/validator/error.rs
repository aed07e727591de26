use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::limits::{MAX_PARTICIPANTS, MAX_TITLE_LEN, MIN_PARTICIPANTS};

/// Draft fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    ResourceId,
    StartTime,
    EndTime,
    Participants,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::ResourceId => "resourceId",
            Field::StartTime => "startTime",
            Field::EndTime => "endTime",
            Field::Participants => "participants",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is wrong with a field. Every issue is recoverable by editing the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Issue {
    #[error("this field is required")]
    Required,
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("cannot consist of whitespace only")]
    Blank,
    #[error("invalid time format, expected HH:MM")]
    InvalidFormat,
    #[error("at least {min} participant(s) required")]
    TooFewParticipants { min: usize },
    #[error("at most {max} participants allowed")]
    TooManyParticipants { max: usize },
    #[error("end time must be after start time")]
    InvalidTimeRange,
    #[error("this time is already reserved")]
    AlreadyReserved,
}

impl Issue {
    pub fn too_long() -> Self {
        Issue::TooLong { max: MAX_TITLE_LEN }
    }

    pub fn too_few_participants() -> Self {
        Issue::TooFewParticipants {
            min: MIN_PARTICIPANTS,
        }
    }

    pub fn too_many_participants() -> Self {
        Issue::TooManyParticipants {
            max: MAX_PARTICIPANTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub issue: Issue,
}

/// Field errors in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, issue: Issue) {
        self.0.push(FieldError { field, issue });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn for_field(&self, field: Field) -> impl Iterator<Item = Issue> + '_ {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.issue)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
