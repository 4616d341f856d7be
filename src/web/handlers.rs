use super::markdown::render_markdown;
use super::AppState;
use crate::components::google_calendar::{DigestOptions, EventDigest, EventWindow};
use crate::components::planner::{weekly_prompt, WorkHours};
use crate::error::BotResult;
use crate::utils::time::parse_time;
use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

const EMPTY_TASKS_WARNING: &str =
    "Please enter your weekly tasks and hours to generate a schedule!";
const RETRY_WARNING: &str = "Please check your inputs and try again.";

/// The planner page in all of its states
#[derive(Template, Debug, Default)]
#[template(path = "planner.html")]
struct PlannerPage {
    error: Option<String>,
    warning: Option<String>,
    show_form: bool,
    events_html: String,
    work_start: String,
    work_end: String,
    lunch_break: bool,
    tasks: String,
    extra_events: String,
    plan_html: Option<String>,
}

/// Fields submitted by the planner form
#[derive(Debug, Deserialize)]
pub struct PlanForm {
    pub work_start: String,
    pub work_end: String,
    /// Present only when the checkbox is ticked
    pub lunch_break: Option<String>,
    #[serde(default)]
    pub tasks: String,
    #[serde(default)]
    pub extra_events: String,
}

fn render(status: StatusCode, page: PlannerPage) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render planner page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Page shown when the calendar cannot be read; the form is withheld
fn calendar_error_page(message: String) -> Response {
    render(
        StatusCode::SERVICE_UNAVAILABLE,
        PlannerPage {
            error: Some(message),
            ..Default::default()
        },
    )
}

async fn fetch_week(state: &AppState) -> BotResult<EventDigest> {
    state
        .fetcher
        .fetch_window(
            EventWindow::weekly(Utc::now()),
            DigestOptions::weekly().with_header(state.planner.weekly_digest_header),
        )
        .await
}

/// Handler for the planner page
pub async fn index_handler(State(state): State<AppState>) -> Response {
    let digest = match fetch_week(&state).await {
        Ok(digest) => digest,
        Err(e) => {
            error!("Failed to fetch calendar events: {}", e);
            return calendar_error_page(e.to_string());
        }
    };

    let planner = &state.planner;
    render(
        StatusCode::OK,
        PlannerPage {
            show_form: true,
            events_html: render_markdown(&digest.text),
            work_start: planner.work_start.format("%H:%M").to_string(),
            work_end: planner.work_end.format("%H:%M").to_string(),
            lunch_break: planner.lunch_break,
            tasks: planner.tasks.clone(),
            ..Default::default()
        },
    )
}

/// Handler for plan generation
pub async fn plan_handler(State(state): State<AppState>, Form(form): Form<PlanForm>) -> Response {
    let digest = match fetch_week(&state).await {
        Ok(digest) => digest,
        Err(e) => {
            error!("Failed to fetch calendar events: {}", e);
            return calendar_error_page(e.to_string());
        }
    };

    let mut page = PlannerPage {
        show_form: true,
        events_html: render_markdown(&digest.text),
        work_start: form.work_start.clone(),
        work_end: form.work_end.clone(),
        lunch_break: form.lunch_break.is_some(),
        tasks: form.tasks.clone(),
        extra_events: form.extra_events.clone(),
        ..Default::default()
    };

    if form.tasks.trim().is_empty() {
        page.warning = Some(EMPTY_TASKS_WARNING.to_string());
        return render(StatusCode::OK, page);
    }

    let hours = match (parse_time(&form.work_start), parse_time(&form.work_end)) {
        (Some(start), Some(end)) if start < end => WorkHours {
            start,
            end,
            lunch_break: form.lunch_break.is_some(),
        },
        (Some(_), Some(_)) => {
            page.warning = Some("End time must be after start time.".to_string());
            return render(StatusCode::OK, page);
        }
        _ => {
            page.warning = Some("Please enter working hours as HH:MM.".to_string());
            return render(StatusCode::OK, page);
        }
    };

    let mut events = digest.text;
    if !form.extra_events.trim().is_empty() {
        events.push_str("\nAdditional events entered by the user:\n");
        events.push_str(form.extra_events.trim());
    }

    let prompt = weekly_prompt(&hours, &form.tasks, &events);
    match state.generator.generate(&prompt).await {
        Ok(plan) => {
            info!("Generated weekly plan");
            page.plan_html = Some(render_markdown(&plan));
            render(StatusCode::OK, page)
        }
        Err(e) => {
            error!("Failed to generate plan: {}", e);
            page.error = Some(format!("An error occurred: {}", e));
            page.warning = Some(RETRY_WARNING.to_string());
            render(StatusCode::BAD_GATEWAY, page)
        }
    }
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
