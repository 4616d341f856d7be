use super::client::{CalendarQuery, EventQuery};
use super::digest::{render_digest, DigestOptions};
use super::models::EventDigest;
use super::time::EventWindow;
use super::token::SessionProvider;
use crate::error::{BotResult, Error};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Turns a time window into a readable digest of the events overlapping it
#[derive(Clone)]
pub struct CalendarWindowFetcher {
    sessions: Arc<dyn SessionProvider>,
    calendar: Arc<dyn CalendarQuery>,
    calendar_id: String,
}

impl CalendarWindowFetcher {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        calendar: Arc<dyn CalendarQuery>,
        calendar_id: &str,
    ) -> Self {
        Self {
            sessions,
            calendar,
            calendar_id: calendar_id.to_string(),
        }
    }

    /// Fetch and render events overlapping `[window_start, window_end)`
    pub async fn fetch_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        options: DigestOptions,
    ) -> BotResult<EventDigest> {
        let window = EventWindow::new(window_start, window_end)?;
        self.fetch_window(window, options).await
    }

    /// Fetch and render events overlapping an already validated window.
    ///
    /// Issues exactly one calendar query, and none without a valid session.
    pub async fn fetch_window(
        &self,
        window: EventWindow,
        options: DigestOptions,
    ) -> BotResult<EventDigest> {
        let credential = match self.sessions.current_session().await? {
            Some(credential) if credential.valid() => credential,
            Some(_) => {
                warn!("Stored calendar credential is no longer valid");
                return Err(Error::AuthenticationRequired);
            }
            None => return Err(Error::AuthenticationRequired),
        };

        let query = EventQuery::new(&self.calendar_id, window);
        let events = self.calendar.list_events(&credential, &query).await?;
        info!(
            "Fetched {} calendar events between {} and {}",
            events.len(),
            window.time_min(),
            window.time_max()
        );

        let text = render_digest(&events, options)?;
        Ok(EventDigest { text, events })
    }
}
