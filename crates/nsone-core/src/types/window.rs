use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Ns1Error, Result};

/// Unit used to size a report time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Days,
    Seconds,
    Microseconds,
    Milliseconds,
    Minutes,
    #[default]
    Hours,
    Weeks,
}

impl TimeUnit {
    /// Every accepted unit name, in the order shown in help output
    pub const NAMES: [&'static str; 7] = [
        "days",
        "seconds",
        "microseconds",
        "milliseconds",
        "minutes",
        "hours",
        "weeks",
    ];

    /// Lowercase name of the unit
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Seconds => "seconds",
            Self::Microseconds => "microseconds",
            Self::Milliseconds => "milliseconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Weeks => "weeks",
        }
    }

    /// Length of `amount` units, or `None` if it does not fit in a [`TimeDelta`]
    #[must_use]
    pub fn span(self, amount: u64) -> Option<TimeDelta> {
        let amount = i64::try_from(amount).ok()?;
        match self {
            Self::Microseconds => Some(TimeDelta::microseconds(amount)),
            Self::Milliseconds => TimeDelta::try_milliseconds(amount),
            Self::Seconds => TimeDelta::try_seconds(amount),
            Self::Minutes => TimeDelta::try_minutes(amount),
            Self::Hours => TimeDelta::try_hours(amount),
            Self::Days => TimeDelta::try_days(amount),
            Self::Weeks => TimeDelta::try_weeks(amount),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = Ns1Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "days" => Ok(Self::Days),
            "seconds" => Ok(Self::Seconds),
            "microseconds" => Ok(Self::Microseconds),
            "milliseconds" => Ok(Self::Milliseconds),
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "weeks" => Ok(Self::Weeks),
            _ => Err(Ns1Error::InvalidUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute `[start, end]` range a report covers.
///
/// Always satisfies `start < end` and never starts before the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of `amount` units ending at the current time
    pub fn ending_now(unit: TimeUnit, amount: u64) -> Result<Self> {
        Self::ending_at(Utc::now(), unit, amount)
    }

    /// Window of `amount` units ending at `end`
    pub fn ending_at(end: DateTime<Utc>, unit: TimeUnit, amount: u64) -> Result<Self> {
        if amount == 0 {
            return Err(Ns1Error::InvalidWindow(
                "amount must be at least 1".to_string(),
            ));
        }

        let span = unit.span(amount).ok_or_else(|| {
            Ns1Error::InvalidWindow(format!("{amount} {unit} is out of range"))
        })?;

        let start = end
            .checked_sub_signed(span)
            .filter(|start| start.timestamp() >= 0)
            .ok_or_else(|| {
                Ns1Error::InvalidWindow(format!(
                    "{amount} {unit} before {end} is earlier than 1970-01-01"
                ))
            })?;

        Ok(Self { start, end })
    }

    /// Start of the window
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the window
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Start as whole Unix seconds, the granularity the API accepts
    #[must_use]
    pub fn start_timestamp(&self) -> i64 {
        self.start.timestamp()
    }

    /// End as whole Unix seconds
    #[must_use]
    pub fn end_timestamp(&self) -> i64 {
        self.end.timestamp()
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M:%S UTC"),
            self.end.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
