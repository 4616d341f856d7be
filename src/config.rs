use crate::error::{config_error, env_error, BotResult};
use crate::utils::time::parse_time;
use chrono::NaiveTime;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use toml;

/// Default Gemini model used for planning
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default Google Calendar API base URL
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default Google OAuth token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default redis key for the stored Google token
pub const DEFAULT_REDIS_TOKEN_KEY: &str = "smart_scheduler:google_token";

/// Optional overrides file for planner defaults
pub const PLANNER_CONFIG_PATH: &str = "config/scheduler.toml";

/// Sample task list shown in the form and used by the daily notifier
pub const DEFAULT_TASKS: &str = "Finish Python Project: 8 hours: High: Deep Work
Write history essay: 5 hours: High: Deep Work
Study for Physics exam: 6 hours: Medium: Review
Review lecture notes: 3 hours: Low: Review";

/// Google OAuth client credentials
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
}

/// Client secrets file as downloaded from the Google Cloud Console
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<OAuthClient>,
    web: Option<OAuthClient>,
}

impl OAuthClient {
    /// Read client credentials from a Google `credentials.json` file
    pub fn from_credentials_file(path: &Path) -> BotResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_credentials_json(&content)
    }

    /// Parse client credentials from the contents of a `credentials.json` file
    pub fn from_credentials_json(content: &str) -> BotResult<Self> {
        let secrets: ClientSecretsFile = serde_json::from_str(content)?;
        secrets
            .installed
            .or(secrets.web)
            .ok_or_else(|| config_error("credentials file has neither 'installed' nor 'web' section"))
    }
}

/// Where the Google OAuth token is kept between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStoreConfig {
    File(PathBuf),
    Redis { url: String, key: String },
}

/// Defaults for the planner, overridable through `config/scheduler.toml`
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub lunch_break: bool,
    pub tasks: String,
    /// Prefix the weekly digest with a header line
    pub weekly_digest_header: bool,
    /// Prefix the daily digest with a header line
    pub daily_digest_header: bool,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(8, 30, 0).unwrap_or_default(),
            work_end: NaiveTime::from_hms_opt(17, 30, 0).unwrap_or_default(),
            lunch_break: true,
            tasks: DEFAULT_TASKS.to_string(),
            weekly_digest_header: true,
            daily_digest_header: false,
        }
    }
}

/// Raw contents of `config/scheduler.toml`
#[derive(Debug, Default, Deserialize)]
struct PlannerFile {
    work_start: Option<String>,
    work_end: Option<String>,
    lunch_break: Option<bool>,
    tasks: Option<String>,
    weekly_digest_header: Option<bool>,
    daily_digest_header: Option<bool>,
}

impl PlannerSettings {
    /// Apply overrides from TOML text on top of the defaults
    pub fn from_toml(content: &str) -> BotResult<Self> {
        let file: PlannerFile = toml::from_str(content)?;
        let mut settings = Self::default();

        if let Some(start) = file.work_start {
            settings.work_start = parse_time(&start)
                .ok_or_else(|| config_error(&format!("Invalid work_start: {}", start)))?;
        }
        if let Some(end) = file.work_end {
            settings.work_end = parse_time(&end)
                .ok_or_else(|| config_error(&format!("Invalid work_end: {}", end)))?;
        }
        if let Some(lunch_break) = file.lunch_break {
            settings.lunch_break = lunch_break;
        }
        if let Some(tasks) = file.tasks {
            settings.tasks = tasks.trim().to_string();
        }
        if let Some(header) = file.weekly_digest_header {
            settings.weekly_digest_header = header;
        }
        if let Some(header) = file.daily_digest_header {
            settings.daily_digest_header = header;
        }

        Ok(settings)
    }
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub google_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Google Calendar ID to read
    pub google_calendar_id: String,
    /// Base URL of the Google Calendar API
    pub calendar_api_base: String,
    /// OAuth client used for consent and token refresh
    pub oauth_client: Option<OAuthClient>,
    /// OAuth token endpoint
    pub token_url: String,
    /// Storage for the OAuth token
    pub token_store: TokenStoreConfig,
    /// Local port for the OAuth consent callback
    pub oauth_redirect_port: u16,
    /// Discord bot token for the daily notifier
    pub discord_token: Option<String>,
    /// Discord channel that receives the daily plan
    pub plan_channel_id: Option<u64>,
    /// Timezone for message titles
    pub timezone: String,
    /// Web server port
    pub port: u16,
    /// Planner defaults
    pub planner: PlannerSettings,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let google_api_key = env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let gemini_model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));
        let calendar_api_base = env::var("GOOGLE_CALENDAR_API_BASE")
            .unwrap_or_else(|_| DEFAULT_CALENDAR_API_BASE.to_string());
        let token_url =
            env::var("GOOGLE_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string());

        let oauth_client = Self::load_oauth_client()?;

        let token_store = match env::var("TOKEN_STORE").as_deref() {
            Ok("redis") => TokenStoreConfig::Redis {
                url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| String::from("redis://127.0.0.1:6379")),
                key: env::var("REDIS_TOKEN_KEY")
                    .unwrap_or_else(|_| DEFAULT_REDIS_TOKEN_KEY.to_string()),
            },
            Ok("file") | Err(_) => TokenStoreConfig::File(PathBuf::from(
                env::var("TOKEN_FILE").unwrap_or_else(|_| String::from("token.json")),
            )),
            Ok(other) => {
                return Err(config_error(&format!(
                    "Unknown TOKEN_STORE '{}', expected 'file' or 'redis'",
                    other
                )))
            }
        };

        let oauth_redirect_port = parse_env_or("OAUTH_REDIRECT_PORT", 8080u16)?;
        let port = parse_env_or("PORT", 3000u16)?;

        let discord_token = env::var("DISCORD_TOKEN").ok().filter(|t| !t.is_empty());
        let plan_channel_id = match env::var("PLAN_CHANNEL_ID") {
            Ok(value) => Some(
                value
                    .parse::<u64>()
                    .map_err(|_| config_error("Invalid PLAN_CHANNEL_ID format"))?,
            ),
            Err(_) => None,
        };

        // Default timezone
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));

        let planner = match fs::read_to_string(PLANNER_CONFIG_PATH) {
            Ok(content) => PlannerSettings::from_toml(&content)?,
            Err(_) => PlannerSettings::default(),
        };

        Ok(Config {
            google_api_key,
            gemini_model,
            google_calendar_id,
            calendar_api_base,
            oauth_client,
            token_url,
            token_store,
            oauth_redirect_port,
            discord_token,
            plan_channel_id,
            timezone,
            port,
            planner,
        })
    }

    /// OAuth client from the environment, falling back to the credentials file
    fn load_oauth_client() -> BotResult<Option<OAuthClient>> {
        if let (Ok(client_id), Ok(client_secret)) =
            (env::var("GOOGLE_CLIENT_ID"), env::var("GOOGLE_CLIENT_SECRET"))
        {
            return Ok(Some(OAuthClient {
                client_id,
                client_secret,
            }));
        }

        let path = env::var("GOOGLE_CREDENTIALS_FILE")
            .unwrap_or_else(|_| String::from("credentials.json"));
        let path = Path::new(&path);
        if path.exists() {
            Ok(Some(OAuthClient::from_credentials_file(path)?))
        } else {
            Ok(None)
        }
    }

    /// The Gemini API key, required by anything that generates plans
    pub fn require_api_key(&self) -> BotResult<&str> {
        self.google_api_key
            .as_deref()
            .ok_or_else(|| env_error("GOOGLE_API_KEY"))
    }

    /// The OAuth client, required for consent and token refresh
    pub fn require_oauth_client(&self) -> BotResult<&OAuthClient> {
        self.oauth_client.as_ref().ok_or_else(|| {
            config_error(
                "Google OAuth client not configured. Set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET or provide credentials.json",
            )
        })
    }
}

/// Parse an environment variable, using `default` when it is unset
fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> BotResult<T> {
    match env::var(var) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| config_error(&format!("Invalid {} format", var))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_defaults_match_the_form() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.work_start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(settings.work_end, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert!(settings.lunch_break);
        assert!(settings.weekly_digest_header);
        assert!(!settings.daily_digest_header);
        assert_eq!(settings.tasks.lines().count(), 4);
    }

    #[test]
    fn planner_overrides_from_toml() {
        let settings = PlannerSettings::from_toml(
            r#"
work_start = "09:00"
lunch_break = false
daily_digest_header = true
tasks = """
Read chapter 4: 2 hours: High: Deep Work
"""
"#,
        )
        .unwrap();

        assert_eq!(settings.work_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(settings.work_end, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert!(!settings.lunch_break);
        assert!(settings.daily_digest_header);
        assert_eq!(settings.tasks, "Read chapter 4: 2 hours: High: Deep Work");
    }

    #[test]
    fn planner_rejects_bad_time() {
        assert!(PlannerSettings::from_toml("work_end = \"25:00\"").is_err());
    }

    #[test]
    fn oauth_client_from_installed_section() {
        let client = OAuthClient::from_credentials_json(
            r#"{"installed": {"client_id": "id.apps.googleusercontent.com", "client_secret": "shh", "redirect_uris": ["http://localhost"]}}"#,
        )
        .unwrap();
        assert_eq!(client.client_id, "id.apps.googleusercontent.com");
        assert_eq!(client.client_secret, "shh");
    }

    #[test]
    fn oauth_client_requires_a_section() {
        assert!(OAuthClient::from_credentials_json(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn malformed_env_value_is_a_config_error() {
        env::set_var("SMART_SCHEDULER_TEST_PORT", "eighty");
        let result = parse_env_or("SMART_SCHEDULER_TEST_PORT", 3000u16);
        env::remove_var("SMART_SCHEDULER_TEST_PORT");

        match result {
            Err(crate::error::Error::Config(message)) => {
                assert_eq!(message, "Invalid SMART_SCHEDULER_TEST_PORT format")
            }
            other => panic!("expected a config error, got {:?}", other),
        }
        assert_eq!(parse_env_or("SMART_SCHEDULER_TEST_UNSET", 3000u16).unwrap(), 3000);
    }
}
