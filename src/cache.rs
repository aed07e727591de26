//! Reservation data source and the per-resource snapshot cache the validator reads.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::limits::MAX_PREFETCH_IDS;
use crate::model::*;
use crate::observability;
use crate::validator::Snapshot;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("reservation source unavailable: {0}")]
    Unavailable(String),
    #[error("too many resource ids: {0}")]
    TooManyIds(usize),
}

/// The external reservation store. Returns the current reservations of one resource.
#[async_trait]
pub trait ReservationSource: Send + Sync {
    async fn fetch(&self, resource_id: &str) -> Result<Vec<ReservationInterval>, SourceError>;
}

/// Reads a JSON array of [`ReservationRecord`]s from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReservationSource for JsonFileSource {
    async fn fetch(&self, resource_id: &str) -> Result<Vec<ReservationInterval>, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let records: Vec<ReservationRecord> =
            serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(records
            .into_iter()
            .filter(|r| r.resource_id == resource_id)
            .filter_map(|r| match ReservationInterval::try_from(r) {
                Ok(interval) => Some(interval),
                Err(e) => {
                    warn!("skipping malformed reservation: {e}");
                    None
                }
            })
            .collect())
    }
}

struct CacheEntry {
    schedule: Arc<ResourceSchedule>,
    fetched_at: Instant,
}

/// Outcome of one `refresh_stale` sweep.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub failed: Vec<(String, SourceError)>,
}

/// Per-resource cache of fetched schedules with a staleness window.
///
/// Stale entries are still served; refetching is up to the caller
/// (`refresh_stale`, `ensure_fresh`, or the background refresher).
pub struct ReservationCache<S> {
    source: S,
    entries: DashMap<String, CacheEntry>,
    stale_window: Duration,
}

impl<S: ReservationSource> ReservationCache<S> {
    pub fn new(source: S, stale_window: Duration) -> Self {
        Self {
            source,
            entries: DashMap::new(),
            stale_window,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stale_window(&self) -> Duration {
        self.stale_window
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Loading` until the first successful fetch for this resource.
    pub fn snapshot(&self, resource_id: &str) -> Snapshot {
        self.entries
            .get(resource_id)
            .map_or(Snapshot::Loading, |e| Snapshot::Ready(e.schedule.clone()))
    }

    /// Missing entries count as stale.
    pub fn is_stale(&self, resource_id: &str) -> bool {
        self.entries
            .get(resource_id)
            .is_none_or(|e| e.fetched_at.elapsed() >= self.stale_window)
    }

    /// Fetch from the source and replace the cached schedule.
    /// On failure the previous snapshot stays in place.
    pub async fn load(&self, resource_id: &str) -> Result<Snapshot, SourceError> {
        let started = Instant::now();
        let result = self.source.fetch(resource_id).await;
        metrics::histogram!(observability::SOURCE_FETCH_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        let intervals = match result {
            Ok(intervals) => {
                metrics::counter!(observability::SOURCE_FETCHES_TOTAL, "status" => "ok").increment(1);
                intervals
            }
            Err(e) => {
                metrics::counter!(observability::SOURCE_FETCHES_TOTAL, "status" => "error").increment(1);
                return Err(e);
            }
        };

        let schedule = Arc::new(ResourceSchedule::from_intervals(resource_id, intervals));
        debug!(resource_id, reservations = schedule.len(), "loaded reservations");
        self.entries.insert(
            resource_id.to_string(),
            CacheEntry {
                schedule: schedule.clone(),
                fetched_at: Instant::now(),
            },
        );
        metrics::gauge!(observability::CACHE_ENTRIES).set(self.entries.len() as f64);
        Ok(Snapshot::Ready(schedule))
    }

    /// Serve the cached snapshot, loading first if it is missing or stale.
    pub async fn ensure_fresh(&self, resource_id: &str) -> Result<Snapshot, SourceError> {
        if self.is_stale(resource_id) {
            self.load(resource_id).await
        } else {
            Ok(self.snapshot(resource_id))
        }
    }

    /// `ensure_fresh` that never fails: on a fetch error the last good
    /// snapshot is served, or `Loading` if there never was one.
    pub async fn snapshot_or_last(&self, resource_id: &str) -> Snapshot {
        match self.ensure_fresh(resource_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(resource_id, "serving last known reservations: {e}");
                self.snapshot(resource_id)
            }
        }
    }

    /// Load several resources concurrently. Returns the first error, if any.
    pub async fn prefetch(&self, resource_ids: &[String]) -> Result<(), SourceError> {
        if resource_ids.len() > MAX_PREFETCH_IDS {
            return Err(SourceError::TooManyIds(resource_ids.len()));
        }
        let results = futures::future::join_all(resource_ids.iter().map(|id| self.load(id))).await;
        for result in results {
            result?;
        }
        Ok(())
    }

    /// Refetch every cached resource whose entry has outlived the staleness window.
    pub async fn refresh_stale(&self) -> RefreshReport {
        // Collect keys first: no map guard may be held across the fetch.
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().fetched_at.elapsed() >= self.stale_window)
            .map(|e| e.key().clone())
            .collect();

        let mut report = RefreshReport::default();
        for resource_id in stale {
            match self.load(&resource_id).await {
                Ok(_) => report.refreshed += 1,
                Err(e) => report.failed.push((resource_id, e)),
            }
        }
        if report.refreshed > 0 {
            info!("refreshed {} stale reservation list(s)", report.refreshed);
        }
        report
    }

    /// Drop the cached schedule; the next snapshot is `Loading` again.
    pub fn invalidate(&self, resource_id: &str) {
        self.entries.remove(resource_id);
        metrics::gauge!(observability::CACHE_ENTRIES).set(self.entries.len() as f64);
    }
}
