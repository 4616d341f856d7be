mod handlers;
mod markdown;

use crate::components::google_calendar::CalendarWindowFetcher;
use crate::components::planner::TextGenerator;
use crate::config::PlannerSettings;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use handlers::PlanForm;

#[derive(Clone)]
pub struct AppState {
    /// Calendar digest source
    pub fetcher: Arc<CalendarWindowFetcher>,
    /// Model that writes the plan
    pub generator: Arc<dyn TextGenerator>,
    /// Form defaults
    pub planner: PlannerSettings,
}

/// Routes of the planner web form
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/plan", post(handlers::plan_handler))
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
