use super::models::{CalendarEvent, EventsResponse};
use super::time::EventWindow;
use super::token::Credential;
use crate::error::{calendar_unavailable, BotResult};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Parameters of a single `events.list` query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub calendar_id: String,
    pub window: EventWindow,
    /// Expand recurring events into individual instances
    pub single_events: bool,
    pub order_by: &'static str,
}

impl EventQuery {
    /// Expanded instances of `calendar_id` in `window`, ordered by start time
    pub fn new(calendar_id: &str, window: EventWindow) -> Self {
        Self {
            calendar_id: calendar_id.to_string(),
            window,
            single_events: true,
            order_by: "startTime",
        }
    }

    /// Query string pairs in the form the Calendar API expects
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "timeMin",
                self.window
                    .time_min()
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            (
                "timeMax",
                self.window
                    .time_max()
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("singleEvents", self.single_events.to_string()),
            ("orderBy", self.order_by.to_string()),
        ]
    }
}

/// Read-only calendar query service
#[async_trait]
pub trait CalendarQuery: Send + Sync {
    /// Events overlapping the query window, in the service's order
    async fn list_events(
        &self,
        credential: &Credential,
        query: &EventQuery,
    ) -> BotResult<Vec<CalendarEvent>>;
}

/// Google Calendar v3 REST client
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn events_url(&self, query: &EventQuery) -> BotResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| calendar_unavailable(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| calendar_unavailable("Calendar API base URL cannot have a path"))?
            .pop_if_empty()
            .extend(["calendars", query.calendar_id.as_str(), "events"]);

        for (key, value) in query.query_pairs() {
            url.query_pairs_mut().append_pair(key, &value);
        }

        Ok(url)
    }
}

#[async_trait]
impl CalendarQuery for GoogleCalendarClient {
    async fn list_events(
        &self,
        credential: &Credential,
        query: &EventQuery,
    ) -> BotResult<Vec<CalendarEvent>> {
        let url = self.events_url(query)?;
        debug!("Fetching calendar events from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(|e| calendar_unavailable(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(calendar_unavailable(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let body: EventsResponse = response.json().await.map_err(|e| {
            calendar_unavailable(&format!("Failed to parse events response: {}", e))
        })?;

        Ok(body.items)
    }
}
