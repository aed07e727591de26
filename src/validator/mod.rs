//! Reservation validation.
//!
//! `conflict` holds the pure overlap predicate over a loaded snapshot;
//! `schema` runs the two-phase draft validation (structure first, then the
//! schedule lookups) and attributes conflicts to form fields.

mod conflict;
mod error;
mod schema;
#[cfg(test)]
mod tests;

pub use conflict::{conflicting, has_time_conflict, Snapshot};
pub use error::{Field, FieldError, FieldErrors, Issue};
pub use schema::{check_schedule, check_structure, validate, CheckedDraft, ReservationDraft, ValidReservation};
