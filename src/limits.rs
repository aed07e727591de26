use crate::model::Minute;

/// Longest accepted reservation title, counted in characters before trimming.
pub const MAX_TITLE_LEN: usize = 20;

pub const MIN_PARTICIPANTS: usize = 1;
pub const MAX_PARTICIPANTS: usize = 30;

/// Last hour accepted in a start time (`23:59`).
pub const MAX_START_HOUR: u32 = 23;
/// Last hour accepted in an end time; `24:00` marks end of day.
pub const MAX_END_HOUR: u32 = 24;

pub const MINUTES_PER_HOUR: Minute = 60;

/// How long a fetched reservation list is served before it counts as stale.
pub const DEFAULT_STALE_WINDOW_MS: u64 = 5 * 60 * 1000;

/// Tick of the background refresher.
pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Upper bound on resources loaded in one `prefetch` call.
pub const MAX_PREFETCH_IDS: usize = 256;
