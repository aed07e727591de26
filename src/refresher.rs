use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{ReservationCache, ReservationSource};

/// Background task that periodically refetches stale reservation lists.
pub async fn run_refresher<S: ReservationSource>(cache: Arc<ReservationCache<S>>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let report = cache.refresh_stale().await;
        debug!("refresh tick: {} refreshed", report.refreshed);
        for (resource_id, e) in report.failed {
            // The previous snapshot keeps being served
            warn!("refresh of {resource_id} failed: {e}");
        }
    }
}
