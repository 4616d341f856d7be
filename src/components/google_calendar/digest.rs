use super::models::CalendarEvent;
use crate::error::{BotResult, Error};
use tracing::warn;

/// Summary shown for events without a title
pub const NO_TITLE: &str = "No Title";

/// Which kind of digest is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestScope {
    /// The next seven days, used by the planner form
    Weekly,
    /// The current UTC day, used by the daily notifier
    Daily,
}

impl DigestScope {
    /// Text returned instead of a digest when the window has no events
    pub fn empty_sentinel(&self) -> &'static str {
        match self {
            DigestScope::Weekly => "No upcoming events found for the next 7 days.",
            DigestScope::Daily => "No upcoming events found for today.",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            DigestScope::Weekly => "Existing calendar events for the next 7 days:\n",
            DigestScope::Daily => "Existing calendar events for today:\n",
        }
    }
}

/// How a digest is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestOptions {
    pub scope: DigestScope,
    pub include_header: bool,
}

impl DigestOptions {
    /// Weekly digests carry a header line unless told otherwise
    pub fn weekly() -> Self {
        Self {
            scope: DigestScope::Weekly,
            include_header: true,
        }
    }

    /// Daily digests have no header unless told otherwise
    pub fn daily() -> Self {
        Self {
            scope: DigestScope::Daily,
            include_header: false,
        }
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }
}

/// Render one event as `- Event: {summary}, Start: {start}, End: {end}`.
///
/// A boundary with neither `date` nor `dateTime` is left out of the line.
/// If both are missing the event is rejected as malformed.
pub fn render_event_line(event: &CalendarEvent) -> BotResult<String> {
    let summary = event.summary.as_deref().unwrap_or(NO_TITLE);
    let start = event.start.display();
    let end = event.end.display();

    if start.is_none() && end.is_none() {
        return Err(Error::MalformedEventRecord(event.id.clone()));
    }

    let mut line = format!("- Event: {}", summary);
    match start {
        Some(start) => line.push_str(&format!(", Start: {}", start)),
        None => warn!("Event {} has no start date or dateTime", event.id),
    }
    match end {
        Some(end) => line.push_str(&format!(", End: {}", end)),
        None => warn!("Event {} has no end date or dateTime", event.id),
    }

    Ok(line)
}

/// Render the full digest for an ordered list of events
pub fn render_digest(events: &[CalendarEvent], options: DigestOptions) -> BotResult<String> {
    if events.is_empty() {
        return Ok(options.scope.empty_sentinel().to_string());
    }

    let lines = events
        .iter()
        .map(render_event_line)
        .collect::<BotResult<Vec<_>>>()?;

    let body = lines.join("\n");
    if options.include_header {
        Ok(format!("{}{}", options.scope.header(), body))
    } else {
        Ok(body)
    }
}
