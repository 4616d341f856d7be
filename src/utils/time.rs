use crate::error::{config_error, BotResult};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Format a wall-clock time the way prompts show it, e.g. `08:30 AM`
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

/// Parse an IANA timezone name such as `Europe/Helsinki`
pub fn parse_timezone(name: &str) -> BotResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| config_error(&format!("Invalid timezone: {}", name)))
}

/// Title date for a plan message, e.g. `Monday, October 19`
pub fn plan_title_date(now: DateTime<Utc>, timezone: &Tz) -> String {
    now.with_timezone(timezone).format("%A, %B %d").to_string()
}
