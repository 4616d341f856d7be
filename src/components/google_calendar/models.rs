use serde::{Deserialize, Serialize};

/// Start or end of a calendar event: a timestamp or a whole-day date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventTime {
    /// Timed boundary, e.g. `2024-05-06T10:00:00+02:00`
    pub fn date_time(value: &str) -> Self {
        Self {
            date_time: Some(value.to_string()),
            date: None,
        }
    }

    /// All-day boundary, e.g. `2024-05-06`
    pub fn date(value: &str) -> Self {
        Self {
            date_time: None,
            date: Some(value.to_string()),
        }
    }

    /// The value shown to users, preferring `dateTime` over `date`
    pub fn display(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

/// Calendar event as returned by the Calendar API `events.list` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
}

/// Body of an `events.list` response
#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// Digest text paired with the events it was rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDigest {
    pub text: String,
    pub events: Vec<CalendarEvent>,
}
