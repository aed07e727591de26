use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

// ── Validation ──────────────────────────────────────────────────

/// Counter: drafts validated. Labels: outcome (accepted|rejected).
pub const VALIDATIONS_TOTAL: &str = "reservo_validations_total";

/// Counter: conflict errors raised. Labels: field.
pub const CONFLICTS_TOTAL: &str = "reservo_conflicts_total";

// ── Reservation source ──────────────────────────────────────────

/// Counter: fetches from the reservation source. Labels: status (ok|error).
pub const SOURCE_FETCHES_TOTAL: &str = "reservo_source_fetches_total";

/// Histogram: fetch latency in seconds.
pub const SOURCE_FETCH_DURATION_SECONDS: &str = "reservo_source_fetch_duration_seconds";

/// Gauge: resources with a cached reservation list.
pub const CACHE_ENTRIES: &str = "reservo_cache_entries";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}
