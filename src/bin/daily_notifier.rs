use chrono::Utc;
use smart_scheduler::components::google_calendar::fetcher_from_config;
use smart_scheduler::components::notifier::{send_daily_plan, DailyPlanSettings, DiscordSink};
use smart_scheduler::components::planner::{GeminiGenerator, WorkHours};
use smart_scheduler::error::env_error;
use smart_scheduler::startup;
use smart_scheduler::utils::time::parse_timezone;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;
    let config = startup::load_config()?;

    let discord_token = config
        .discord_token
        .as_deref()
        .ok_or_else(|| env_error("DISCORD_TOKEN"))?;
    let channel_id = config
        .plan_channel_id
        .ok_or_else(|| env_error("PLAN_CHANNEL_ID"))?;

    let settings = DailyPlanSettings {
        channel_id,
        hours: WorkHours {
            start: config.planner.work_start,
            end: config.planner.work_end,
            lunch_break: config.planner.lunch_break,
        },
        tasks: config.planner.tasks.clone(),
        include_header: config.planner.daily_digest_header,
        timezone: parse_timezone(&config.timezone)?,
    };

    let fetcher = fetcher_from_config(&config)?;
    let generator = GeminiGenerator::from_config(&config)?;
    let sink = DiscordSink::new(discord_token);

    send_daily_plan(&fetcher, &generator, &sink, &settings, Utc::now()).await?;

    info!("Daily notifier finished");
    Ok(())
}
