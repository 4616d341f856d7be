mod sink;

pub use sink::{split_message, ChatSink, DiscordSink, DISCORD_MESSAGE_LIMIT};

use crate::components::google_calendar::{CalendarWindowFetcher, DigestOptions, EventWindow};
use crate::components::planner::{daily_prompt, TextGenerator, WorkHours};
use crate::error::BotResult;
use crate::utils::time::plan_title_date;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

/// Sent instead of a plan when the model cannot be reached
pub const GENERATION_FAILED_MESSAGE: &str = "I'm sorry, I couldn't generate a schedule for you today. The AI is experiencing some technical difficulties.";

/// What the daily plan is built from and where it goes
#[derive(Debug, Clone)]
pub struct DailyPlanSettings {
    pub channel_id: u64,
    pub hours: WorkHours,
    pub tasks: String,
    pub include_header: bool,
    pub timezone: Tz,
}

/// Full message posted to the channel
pub fn daily_plan_message(now: DateTime<Utc>, timezone: &Tz, plan: &str) -> String {
    format!(
        "📚 **Your Smart Study Buddy's Plan for {}**\n\n{}",
        plan_title_date(now, timezone),
        plan
    )
}

/// Fetch today's events, ask the model for a plan and post it.
///
/// Calendar errors abort before anything is generated or sent.
pub async fn send_daily_plan(
    fetcher: &CalendarWindowFetcher,
    generator: &dyn TextGenerator,
    sink: &dyn ChatSink,
    settings: &DailyPlanSettings,
    now: DateTime<Utc>,
) -> BotResult<()> {
    info!("Fetching today's schedule...");
    let digest = fetcher
        .fetch_window(
            EventWindow::daily(now),
            DigestOptions::daily().with_header(settings.include_header),
        )
        .await?;

    let prompt = daily_prompt(&settings.hours, &settings.tasks, &digest.text);
    let plan = match generator.generate(&prompt).await {
        Ok(plan) => plan,
        Err(e) => {
            error!("Error calling Gemini API: {}", e);
            GENERATION_FAILED_MESSAGE.to_string()
        }
    };

    let message = daily_plan_message(now, &settings.timezone, &plan);
    sink.send(settings.channel_id, &message).await?;
    info!("Daily plan sent to channel {}", settings.channel_id);

    Ok(())
}
