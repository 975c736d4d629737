//! Parsing of range-query bounds and step durations.

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::remote::QueryRange;

pub const DEFAULT_START: &str = "1h";
pub const DEFAULT_END: &str = "now";
pub const DEFAULT_STEP: &str = "60s";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSpecError {
    #[error("invalid time '{0}': expected RFC 3339, unix seconds, 'now' or a duration like '1h'")]
    Time(String),
    #[error("invalid duration '{0}': expected a number followed by s, m, h, d or w")]
    Duration(String),
    #[error("range start {start} is after end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("step must be greater than zero")]
    ZeroStep,
}

/// Unresolved range settings. Relative bounds are resolved against the
/// current time each time a query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: String,
    pub end: String,
    pub step: String,
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
            step: DEFAULT_STEP.to_string(),
        }
    }
}

impl RangeSpec {
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<QueryRange, TimeSpecError> {
        let start = parse_time(&self.start, now)?;
        let end = parse_time(&self.end, now)?;
        if start > end {
            return Err(TimeSpecError::Inverted { start, end });
        }

        let step = parse_duration(&self.step)?;
        if step.is_zero() {
            return Err(TimeSpecError::ZeroStep);
        }

        Ok(QueryRange { start, end, step })
    }
}

/// Parse a point in time.
///
/// A bare duration means that long before `now`.
pub fn parse_time(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TimeSpecError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(secs) = input.parse::<f64>() {
        if secs.is_finite() {
            let millis = (secs * 1000.0).round() as i64;
            return DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| TimeSpecError::Time(input.to_string()));
        }
    }

    let ago = parse_duration(input).map_err(|_| TimeSpecError::Time(input.to_string()))?;
    TimeDelta::from_std(ago)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| TimeSpecError::Time(input.to_string()))
}

/// Parse a duration such as `30s`, `5m`, `1h`, `2d` or `1w`.
pub fn parse_duration(input: &str) -> Result<Duration, TimeSpecError> {
    let input = input.trim();
    let caps = duration_pattern()
        .captures(input)
        .ok_or_else(|| TimeSpecError::Duration(input.to_string()))?;

    let amount: u64 = caps[1]
        .parse()
        .map_err(|_| TimeSpecError::Duration(input.to_string()))?;
    let unit_secs = match &caps[2] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        _ => return Err(TimeSpecError::Duration(input.to_string())),
    };

    amount
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| TimeSpecError::Duration(input.to_string()))
}

fn duration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)([smhdw])$").expect("Invalid regex pattern"))
}
