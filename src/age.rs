//! Age specifications: `"2w"`, `"10mon"`, `"36h"` and friends.

use std::fmt;
use tracing::warn;

/// Threshold used when an age specification cannot be understood.
pub const DEFAULT_AGE_DAYS: f64 = 7.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    fn to_days(self, n: f64) -> f64 {
        match self {
            Unit::Years => n * 365.0,
            Unit::Months => n * 30.0,
            Unit::Weeks => n * 7.0,
            Unit::Days => n,
            Unit::Hours => n / 24.0,
            Unit::Minutes => (n / 24.0) / 60.0,
            Unit::Seconds => ((n / 24.0) / 60.0) / 60.0,
        }
    }
}

/// Unit suffixes, multi-character ones first so `"10mon"` is never read as
/// something ending in a shorter suffix.
const UNITS: &[(&str, Unit)] = &[
    ("mon", Unit::Months),
    ("min", Unit::Minutes),
    ("y", Unit::Years),
    ("w", Unit::Weeks),
    ("d", Unit::Days),
    ("h", Unit::Hours),
    ("s", Unit::Seconds),
];

/// Parse an age specification into a (possibly fractional) number of days.
///
/// Supports: y (years, 365d), mon (months, 30d), w (weeks), d (days),
/// h (hours), min (minutes), s (seconds).
/// Anything else falls back to [`DEFAULT_AGE_DAYS`] with a warning; a bad age
/// never stops a run.
pub fn parse_age(spec: &str) -> f64 {
    let spec = spec.trim();

    for (suffix, unit) in UNITS {
        if let Some(magnitude) = spec.strip_suffix(suffix) {
            return match magnitude.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => unit.to_days(n),
                _ => {
                    warn!(
                        "Invalid age magnitude in '{}', defaulting to {} days",
                        spec, DEFAULT_AGE_DAYS
                    );
                    DEFAULT_AGE_DAYS
                }
            };
        }
    }

    warn!(
        "Invalid age '{}': expected a number followed by y, mon, w, d, h, min or s; defaulting to {} days",
        spec, DEFAULT_AGE_DAYS
    );
    DEFAULT_AGE_DAYS
}

/// An age limit, fixed once per scan target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    days: f64,
}

impl Threshold {
    pub fn from_days(days: f64) -> Self {
        Threshold { days }
    }

    /// Build a threshold from an age specification (see [`parse_age`]).
    pub fn from_spec(spec: &str) -> Self {
        Threshold::from_days(parse_age(spec))
    }

    pub fn days(&self) -> f64 {
        self.days
    }

    pub fn seconds(&self) -> f64 {
        self.days * SECONDS_PER_DAY
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days)
    }
}
