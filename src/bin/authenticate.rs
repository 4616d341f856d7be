use smart_scheduler::components::google_calendar::oauth::{
    authorization_url, exchange_code, parse_callback, Callback,
};
use smart_scheduler::components::google_calendar::token::{token_store_from_config, TokenManager};
use smart_scheduler::error::{other_error, BotResult, Error};
use smart_scheduler::startup;
use tracing::warn;

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;
    let config = startup::load_config()?;

    let store = token_store_from_config(&config)?;
    let token_manager = TokenManager::from_config(&config)?;

    // Reuse or refresh a stored token before asking for consent again
    if let Some(credential) = store.load().await? {
        if credential.valid() {
            println!("Authentication successful! A valid token is already stored.");
            return Ok(());
        }
        if credential.expired() && credential.refresh_token.is_some() {
            match token_manager.refresh(&credential).await {
                Ok(_) => {
                    println!("Authentication successful! The stored token was refreshed.");
                    return Ok(());
                }
                Err(e) => warn!("Token refresh failed, starting consent flow: {}", e),
            }
        }
    }

    let oauth_client = config.require_oauth_client()?.clone();
    let redirect_uri = format!("http://localhost:{}", config.oauth_redirect_port);

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();
    let auth_url = authorization_url(&oauth_client, &redirect_uri, &state)?;

    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser. Visit this URL to continue:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(("127.0.0.1", config.oauth_redirect_port))
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    let (request, code) = wait_for_code(&server, &state)?;

    let http = reqwest::Client::new();
    let credential = exchange_code(
        &http,
        &config.token_url,
        &oauth_client,
        &code,
        &redirect_uri,
    )
    .await?;

    token_manager.set_token(&credential).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response).map_err(Error::from)?;

    println!("Authentication successful! The token has been stored.");
    println!("You can now run the planner.");

    Ok(())
}

/// Serve requests until one carries the authorization code
fn wait_for_code(server: &tiny_http::Server, state: &str) -> BotResult<(tiny_http::Request, String)> {
    loop {
        let request = server.recv()?;
        match parse_callback(request.url(), state) {
            Ok(Callback::Code(code)) => return Ok((request, code)),
            Ok(Callback::Ignored) => {
                let _ = request.respond(
                    tiny_http::Response::from_string("Not found").with_status_code(404),
                );
            }
            Err(e) => {
                let _ = request.respond(
                    tiny_http::Response::from_string(e.to_string()).with_status_code(400),
                );
                return Err(e);
            }
        }
    }
}
