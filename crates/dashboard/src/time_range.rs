//! Search window validation and presets.
//!
//! Invariants:
//! - A valid window has `start <= end` and spans at most `MAX_RANGE_DAYS`
//!   days, where the span is rounded up to whole days.
//! - Everything here is a pure function of its inputs; callers pass `now`.

use chrono::{DateTime, Duration, Utc};
use sentinel_config::constants::{DEFAULT_RANGE_DAYS, MAX_RANGE_DAYS};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Check a `[start, end]` window.
pub fn validate(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }
    let days = span_days(start, end);
    if days > MAX_RANGE_DAYS {
        return Err(ValidationError::RangeTooLong {
            days,
            max: MAX_RANGE_DAYS,
        });
    }
    Ok(())
}

/// `ceil((end - start) / 1 day)`; 0 for an empty or inverted window.
pub fn span_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds().max(0);
    (ms + DAY_MS - 1) / DAY_MS
}

/// A concrete search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        validate(start, end)?;
        Ok(Self { start, end })
    }

    /// The window selected on startup: the last seven days.
    pub fn default_at(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(DEFAULT_RANGE_DAYS),
            end: now,
        }
    }

    /// Window of `span` ending at `now`.
    pub fn last(span: Duration, now: DateTime<Utc>) -> Self {
        Self {
            start: now - span,
            end: now,
        }
    }
}

/// Day-based quick ranges offered next to the date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickRange {
    Today,
    Last7Days,
    Last30Days,
    Last90Days,
    Last180Days,
}

impl QuickRange {
    pub const ALL: [QuickRange; 5] = [
        QuickRange::Today,
        QuickRange::Last7Days,
        QuickRange::Last30Days,
        QuickRange::Last90Days,
        QuickRange::Last180Days,
    ];

    pub const fn days(self) -> i64 {
        match self {
            QuickRange::Today => 1,
            QuickRange::Last7Days => 7,
            QuickRange::Last30Days => 30,
            QuickRange::Last90Days => 90,
            QuickRange::Last180Days => 180,
        }
    }

    /// `[now - N days, now]`.
    pub fn range_at(self, now: DateTime<Utc>) -> TimeRange {
        TimeRange::last(Duration::days(self.days()), now)
    }

    /// Like [`range_at`](Self::range_at) but with the end pushed past `now`
    /// by `margin`, for the live path.
    ///
    /// The margin is not counted against `MAX_RANGE_DAYS`, so the result is
    /// not a window [`validate`] accepts for the longest preset.
    pub fn live_range_at(self, now: DateTime<Utc>, margin: std::time::Duration) -> TimeRange {
        let margin = Duration::from_std(margin).unwrap_or_else(|_| Duration::days(1));
        TimeRange {
            start: now - Duration::days(self.days()),
            end: now + margin,
        }
    }
}

impl fmt::Display for QuickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuickRange::Today => f.write_str("today"),
            other => write!(f, "{}d", other.days()),
        }
    }
}

impl FromStr for QuickRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "1d" => Ok(QuickRange::Today),
            "7d" => Ok(QuickRange::Last7Days),
            "30d" => Ok(QuickRange::Last30Days),
            "90d" => Ok(QuickRange::Last90Days),
            "180d" => Ok(QuickRange::Last180Days),
            other => Err(format!("unknown quick range '{other}'")),
        }
    }
}

/// Minute-granularity "last N" presets from the log filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeRange {
    Minutes15,
    Minutes30,
    Hour1,
    Hours4,
    Hours12,
    Hours24,
    Days7,
    Days30,
}

impl RelativeRange {
    pub const ALL: [RelativeRange; 8] = [
        RelativeRange::Minutes15,
        RelativeRange::Minutes30,
        RelativeRange::Hour1,
        RelativeRange::Hours4,
        RelativeRange::Hours12,
        RelativeRange::Hours24,
        RelativeRange::Days7,
        RelativeRange::Days30,
    ];

    pub const fn minutes(self) -> i64 {
        match self {
            RelativeRange::Minutes15 => 15,
            RelativeRange::Minutes30 => 30,
            RelativeRange::Hour1 => 60,
            RelativeRange::Hours4 => 240,
            RelativeRange::Hours12 => 720,
            RelativeRange::Hours24 => 1440,
            RelativeRange::Days7 => 10_080,
            RelativeRange::Days30 => 43_200,
        }
    }

    pub fn range_at(self, now: DateTime<Utc>) -> TimeRange {
        TimeRange::last(Duration::minutes(self.minutes()), now)
    }
}

impl fmt::Display for RelativeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RelativeRange::Minutes15 => "15m",
            RelativeRange::Minutes30 => "30m",
            RelativeRange::Hour1 => "1h",
            RelativeRange::Hours4 => "4h",
            RelativeRange::Hours12 => "12h",
            RelativeRange::Hours24 => "24h",
            RelativeRange::Days7 => "7d",
            RelativeRange::Days30 => "30d",
        };
        f.write_str(label)
    }
}

impl FromStr for RelativeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RelativeRange::ALL
            .into_iter()
            .find(|r| r.to_string() == wanted)
            .ok_or_else(|| format!("unknown relative range '{wanted}'"))
    }
}
