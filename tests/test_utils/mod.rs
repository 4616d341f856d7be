#![allow(dead_code)]

use async_trait::async_trait;
use smart_scheduler::components::google_calendar::{
    CalendarEvent, CalendarQuery, CalendarWindowFetcher, Credential, EventQuery, EventTime,
    SessionProvider,
};
use smart_scheduler::components::notifier::ChatSink;
use smart_scheduler::components::planner::TextGenerator;
use smart_scheduler::error::{calendar_unavailable, BotResult, Error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Session provider returning a fixed credential
pub struct MockSessions {
    credential: Option<Credential>,
}

impl MockSessions {
    pub fn valid() -> Self {
        Self {
            credential: Some(Credential {
                access_token: "test_access_token".to_string(),
                refresh_token: Some("test_refresh".to_string()),
                expires_at: None,
            }),
        }
    }

    pub fn expired() -> Self {
        Self {
            credential: Some(Credential {
                access_token: "stale".to_string(),
                refresh_token: None,
                expires_at: Some(0),
            }),
        }
    }

    pub fn missing() -> Self {
        Self { credential: None }
    }
}

#[async_trait]
impl SessionProvider for MockSessions {
    async fn current_session(&self) -> BotResult<Option<Credential>> {
        Ok(self.credential.clone())
    }
}

/// Calendar returning canned events and recording every query it receives
#[derive(Default)]
pub struct MockCalendar {
    events: Vec<CalendarEvent>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<EventQuery>>,
}

impl MockCalendar {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<EventQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarQuery for MockCalendar {
    async fn list_events(
        &self,
        _credential: &Credential,
        query: &EventQuery,
    ) -> BotResult<Vec<CalendarEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(calendar_unavailable("Failed to fetch events: HTTP 503"));
        }
        Ok(self.events.clone())
    }
}

/// Text generator with a canned answer that remembers its prompts
#[derive(Default)]
pub struct MockGenerator {
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn answering(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> BotResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response
            .clone()
            .ok_or_else(|| Error::Llm("quota exceeded".to_string()))
    }
}

/// Chat sink that keeps sent messages in memory
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(u64, String)>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<(u64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn send(&self, channel_id: u64, content: &str) -> BotResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((channel_id, content.to_string()));
        Ok(())
    }
}

pub fn timed_event(id: &str, summary: Option<&str>, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: summary.map(str::to_string),
        start: EventTime::date_time(start),
        end: EventTime::date_time(end),
    }
}

pub fn fetcher(sessions: MockSessions, calendar: Arc<MockCalendar>) -> CalendarWindowFetcher {
    CalendarWindowFetcher::new(Arc::new(sessions), calendar, "primary")
}
