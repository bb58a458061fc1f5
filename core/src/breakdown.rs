//! Elapsed-time decomposition.
//!
//! Total whole minutes are decomposed into a mixed-radix breakdown of
//! years, days, hours, and minutes. A year is a fixed 365 days; this is a
//! counter, not a calendar.

use chrono::{DateTime, Utc};

pub const MINUTES_PER_HOUR: u64 = 60;
pub const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;
pub const MINUTES_PER_YEAR: u64 = 365 * MINUTES_PER_DAY;

/// Non-overlapping breakdown of an elapsed duration.
///
/// Each unit holds the remainder after the next-coarser unit, so
/// `total_minutes` reconstructs the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedBreakdown {
    pub years: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl ElapsedBreakdown {
    #[must_use]
    pub fn from_minutes(total: u64) -> Self {
        let years = total / MINUTES_PER_YEAR;
        let rem = total % MINUTES_PER_YEAR;
        let days = rem / MINUTES_PER_DAY;
        let rem = rem % MINUTES_PER_DAY;
        let hours = rem / MINUTES_PER_HOUR;
        let minutes = rem % MINUTES_PER_HOUR;
        Self {
            years,
            days,
            hours,
            minutes,
        }
    }

    /// Breakdown of the time between `start` and `reference`.
    ///
    /// Sub-minute remainder is truncated, not rounded. A `reference` earlier
    /// than `start` is not a supported input and clamps to zero.
    #[must_use]
    pub fn between(start: DateTime<Utc>, reference: DateTime<Utc>) -> Self {
        let seconds = (reference - start).num_seconds().max(0) as u64;
        Self::from_minutes(seconds / 60)
    }

    #[must_use]
    pub fn total_minutes(&self) -> u64 {
        self.years * MINUTES_PER_YEAR
            + self.days * MINUTES_PER_DAY
            + self.hours * MINUTES_PER_HOUR
            + self.minutes
    }

    /// Human-readable rendering, e.g. `"11 years, 4 days, 1 hour, 0 minutes"`.
    ///
    /// Zero-valued years, days, and hours are omitted entirely; minutes are
    /// always emitted, even when zero. Any value other than 1 pluralizes.
    #[must_use]
    pub fn humanize(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.years > 0 {
            parts.push(pluralize(self.years, "year"));
        }
        if self.days > 0 {
            parts.push(pluralize(self.days, "day"));
        }
        if self.hours > 0 {
            parts.push(pluralize(self.hours, "hour"));
        }
        parts.push(pluralize(self.minutes, "minute"));
        parts.join(", ")
    }
}

fn pluralize(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
