use crate::error::{BotResult, Error};
use chrono::{DateTime, Duration, Utc};

/// Half-open UTC interval `[time_min, time_max)` bounding a calendar query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
}

impl EventWindow {
    /// Create a window, rejecting empty and inverted intervals
    pub fn new(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> BotResult<Self> {
        if time_min >= time_max {
            return Err(Error::InvalidWindow {
                start: time_min,
                end: time_max,
            });
        }
        Ok(Self { time_min, time_max })
    }

    /// The next seven days starting at `now`
    pub fn weekly(now: DateTime<Utc>) -> Self {
        Self {
            time_min: now,
            time_max: now + Duration::days(7),
        }
    }

    /// The UTC calendar day containing `now`
    pub fn daily(now: DateTime<Utc>) -> Self {
        let start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        Self {
            time_min: start,
            time_max: start + Duration::days(1),
        }
    }

    pub fn time_min(&self) -> DateTime<Utc> {
        self.time_min
    }

    pub fn time_max(&self) -> DateTime<Utc> {
        self.time_max
    }
}
