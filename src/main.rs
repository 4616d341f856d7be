use smart_scheduler::components::google_calendar::fetcher_from_config;
use smart_scheduler::components::planner::GeminiGenerator;
use smart_scheduler::web::{router, AppState};
use smart_scheduler::{shutdown, startup};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting Smart Scheduler web planner");

    // Load configuration
    let config = startup::load_config()?;

    let state = AppState {
        fetcher: Arc::new(fetcher_from_config(&config)?),
        generator: Arc::new(GeminiGenerator::from_config(&config)?),
        planner: config.planner.clone(),
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(smart_scheduler::error::Error::from)?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(smart_scheduler::error::Error::from)?;

    info!("Web planner shut down");
    Ok(())
}
