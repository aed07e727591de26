use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::limits::{DEFAULT_REFRESH_SECS, DEFAULT_STALE_WINDOW_MS};

/// Runtime settings, read from `RESERVO_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding the stored reservations.
    pub reservations_path: PathBuf,
    pub stale_window: Duration,
    pub refresh_every: Duration,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|s| parse::<u64>(&s));
        Self {
            reservations_path: lookup("RESERVO_RESERVATIONS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./reservations.json")),
            stale_window: Duration::from_millis(
                parsed("RESERVO_STALE_MS").unwrap_or(DEFAULT_STALE_WINDOW_MS),
            ),
            refresh_every: Duration::from_secs(
                parsed("RESERVO_REFRESH_SECS")
                    .filter(|&s| s > 0)
                    .unwrap_or(DEFAULT_REFRESH_SECS),
            ),
            metrics_port: lookup("RESERVO_METRICS_PORT").and_then(|s| parse(&s)),
        }
    }
}

fn parse<T: FromStr>(raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("ignoring invalid config value {raw:?}");
            None
        }
    }
}
