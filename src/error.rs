use chrono::{DateTime, Utc};
use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Authentication required. Please run the 'authenticate' binary first.")]
    #[diagnostic(
        code(smart_scheduler::authentication_required),
        help("run `cargo run --bin authenticate` to store a Google Calendar token")
    )]
    AuthenticationRequired,

    #[error("Calendar service unavailable: {0}")]
    #[diagnostic(code(smart_scheduler::collaborator_unavailable))]
    CollaboratorUnavailable(String),

    #[error("Malformed calendar event '{0}': neither start nor end has a date or dateTime")]
    #[diagnostic(code(smart_scheduler::malformed_event))]
    MalformedEventRecord(String),

    #[error("Invalid window: start {start} is not before end {end}")]
    #[diagnostic(code(smart_scheduler::invalid_window))]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Text generation failed: {0}")]
    #[diagnostic(code(smart_scheduler::llm))]
    Llm(String),

    #[error("Discord API error: {0}")]
    #[diagnostic(code(smart_scheduler::discord_api))]
    DiscordApi(#[from] serenity::Error),

    #[error("Token store error: {0}")]
    #[diagnostic(code(smart_scheduler::token_store))]
    TokenStore(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(smart_scheduler::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(smart_scheduler::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(smart_scheduler::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(smart_scheduler::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(smart_scheduler::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::TokenStore(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create calendar transport errors
pub fn calendar_unavailable(message: &str) -> Error {
    Error::CollaboratorUnavailable(message.to_string())
}

/// Helper to create token store errors
pub fn token_store_error(message: &str) -> Error {
    Error::TokenStore(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
