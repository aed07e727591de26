use std::cmp::Ordering;
use std::sync::Arc;

use ulid::Ulid;

use crate::model::*;

/// What the validator can see of a resource's reservations.
#[derive(Debug, Clone)]
pub enum Snapshot {
    /// The first fetch has not completed yet.
    Loading,
    Ready(Arc<ResourceSchedule>),
}

impl Snapshot {
    pub fn ready(schedule: ResourceSchedule) -> Self {
        Snapshot::Ready(Arc::new(schedule))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Snapshot::Loading)
    }

    fn schedule_for(&self, resource_id: &str) -> Option<&ResourceSchedule> {
        match self {
            Snapshot::Ready(schedule) if schedule.resource_id() == resource_id => Some(schedule.as_ref()),
            _ => None,
        }
    }
}

/// Does `[start, end)` intersect an existing reservation of `resource_id`?
///
/// `start == end` checks the single instant `start`. Fails open: a loading
/// snapshot, a snapshot of another resource, or a reversed range never
/// conflicts.
pub fn has_time_conflict(snapshot: &Snapshot, start: Minute, end: Minute, resource_id: &str) -> bool {
    let Some(schedule) = snapshot.schedule_for(resource_id) else {
        return false;
    };
    match start.cmp(&end) {
        Ordering::Equal => schedule.covering(start).next().is_some(),
        Ordering::Less => schedule.overlapping(&Span::new(start, end)).next().is_some(),
        Ordering::Greater => false,
    }
}

/// Ids of the reservations blocking `[start, end)`, same rules as `has_time_conflict`.
pub fn conflicting(snapshot: &Snapshot, start: Minute, end: Minute, resource_id: &str) -> Vec<Ulid> {
    let Some(schedule) = snapshot.schedule_for(resource_id) else {
        return Vec::new();
    };
    match start.cmp(&end) {
        Ordering::Equal => schedule.covering(start).map(|i| i.id).collect(),
        Ordering::Less => schedule
            .overlapping(&Span::new(start, end))
            .map(|i| i.id)
            .collect(),
        Ordering::Greater => Vec::new(),
    }
}
