//! Timestamp parsing for the index column of household logs.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive layouts tried in order when no explicit format is configured.
const AUTO_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Parses index-column strings into naive local timestamps.
///
/// Offsets in RFC 3339 input are kept as wall-clock time: the hour-of-day
/// grouping works on the local hour component, not on UTC.
#[derive(Debug, Clone, Default)]
pub struct TimestampParser {
    format: Option<String>,
}

impl TimestampParser {
    /// Parser that auto-detects among the common ISO-8601 style layouts.
    pub fn auto() -> Self {
        Self { format: None }
    }

    /// Parser bound to a single chrono format string.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    /// Parses one field. Returns `None` when no layout matches.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(fmt) = &self.format {
            return NaiveDateTime::parse_from_str(raw, fmt).ok();
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        AUTO_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}
