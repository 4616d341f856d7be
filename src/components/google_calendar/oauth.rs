use super::token::{Credential, TokenResponse};
use crate::config::OAuthClient;
use crate::error::{other_error, BotResult};
use chrono::Utc;
use reqwest::Client;
use url::Url;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Read-only access to the user's calendars
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Consent URL asking for offline, read-only calendar access
pub fn authorization_url(client: &OAuthClient, redirect_uri: &str, state: &str) -> BotResult<Url> {
    Url::parse_with_params(
        AUTH_ENDPOINT,
        &[
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", CALENDAR_READONLY_SCOPE),
            ("state", state),
        ],
    )
    .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))
}

/// Outcome of one request hitting the local redirect listener
#[derive(Debug, PartialEq, Eq)]
pub enum Callback {
    /// Authorization code for our state
    Code(String),
    /// A request unrelated to the consent flow, e.g. `/favicon.ico`
    Ignored,
}

/// Extract the authorization code from a redirect request path such as `/?state=..&code=..`
pub fn parse_callback(request_path: &str, expected_state: &str) -> BotResult<Callback> {
    let url = Url::parse("http://localhost")
        .and_then(|base| base.join(request_path))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(other_error(&format!("Authorization was denied: {}", value)));
            }
            _ => {}
        }
    }

    let Some(code) = code else {
        return Ok(Callback::Ignored);
    };
    if state.as_deref() != Some(expected_state) {
        return Err(other_error("Authorization callback state does not match"));
    }

    Ok(Callback::Code(code))
}

/// Exchange an authorization code for a credential
pub async fn exchange_code(
    http: &Client,
    token_url: &str,
    client: &OAuthClient,
    code: &str,
    redirect_uri: &str,
) -> BotResult<Credential> {
    let response = http
        .post(token_url)
        .form(&[
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| other_error(&format!("Failed to reach token endpoint: {}", e)))?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| other_error(&format!("Failed to parse token response: {}", e)))?;

    Ok(token.into_credential(None, Utc::now().timestamp()))
}
