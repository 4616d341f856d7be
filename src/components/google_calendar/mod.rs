mod client;
mod digest;
mod fetcher;
pub mod models;
pub mod oauth;
mod time;
pub mod token;

pub use client::{CalendarQuery, EventQuery, GoogleCalendarClient};
pub use digest::{render_digest, render_event_line, DigestOptions, DigestScope, NO_TITLE};
pub use fetcher::CalendarWindowFetcher;
pub use models::{CalendarEvent, EventDigest, EventTime};
pub use time::EventWindow;
pub use token::{
    Credential, FileTokenStore, RedisTokenStore, SessionProvider, TokenManager, TokenStore,
};

use crate::config::Config;
use crate::error::BotResult;
use std::sync::Arc;

/// Build a fetcher wired to Google Calendar and the configured token store
pub fn fetcher_from_config(config: &Config) -> BotResult<CalendarWindowFetcher> {
    let sessions = Arc::new(TokenManager::from_config(config)?);
    let calendar = Arc::new(GoogleCalendarClient::new(&config.calendar_api_base));
    Ok(CalendarWindowFetcher::new(
        sessions,
        calendar,
        &config.google_calendar_id,
    ))
}
