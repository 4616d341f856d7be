use crate::config::{Config, OAuthClient, TokenStoreConfig};
use crate::error::{token_store_error, BotResult};
use async_trait::async_trait;
use chrono::Utc;
use redis::{AsyncCommands, Client as RedisClient};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// OAuth credential for the Calendar API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is no longer accepted
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Credential {
    pub fn expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    pub fn valid_at(&self, now: i64) -> bool {
        !self.access_token.is_empty() && !self.expired_at(now)
    }

    pub fn expired(&self) -> bool {
        self.expired_at(Utc::now().timestamp())
    }

    pub fn valid(&self) -> bool {
        self.valid_at(Utc::now().timestamp())
    }
}

/// Supplies the credential the calendar fetcher authenticates with.
///
/// Refreshing is the provider's job; callers only check `valid()`.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> BotResult<Option<Credential>>;
}

/// Persistent storage for a single credential
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> BotResult<Option<Credential>>;
    async fn save(&self, credential: &Credential) -> BotResult<()>;
}

/// Credential kept as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> BotResult<Option<Credential>> {
        if !fs::try_exists(&self.path).await? {
            debug!("No token file at {}", self.path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).await?;
        let credential = serde_json::from_str(&content).map_err(|e| {
            token_store_error(&format!(
                "Failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(credential))
    }

    async fn save(&self, credential: &Credential) -> BotResult<()> {
        let content = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

/// Credential kept under a single redis key
#[derive(Debug, Clone)]
pub struct RedisTokenStore {
    client: RedisClient,
    key: String,
}

impl RedisTokenStore {
    pub fn new(url: &str, key: &str) -> BotResult<Self> {
        let client = RedisClient::open(url)?;
        Ok(Self {
            client,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn load(&self) -> BotResult<Option<Credential>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(&self.key).await?;
        match stored {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, credential: &Credential) -> BotResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(credential)?;
        let _: () = conn.set(&self.key, json).await?;
        Ok(())
    }
}

/// Build the token store selected by the configuration
pub fn token_store_from_config(config: &Config) -> BotResult<Arc<dyn TokenStore>> {
    match &config.token_store {
        TokenStoreConfig::File(path) => Ok(Arc::new(FileTokenStore::new(path.clone()))),
        TokenStoreConfig::Redis { url, key } => Ok(Arc::new(RedisTokenStore::new(url, key)?)),
    }
}

/// Response of the OAuth token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert to a credential, keeping `fallback_refresh` when Google omits one
    pub fn into_credential(self, fallback_refresh: Option<String>, now: i64) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(fallback_refresh),
            expires_at: Some(now + self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN)),
        }
    }
}

/// Session provider backed by a token store, refreshing expired tokens
#[derive(Clone)]
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    oauth_client: Option<OAuthClient>,
    token_url: String,
    client: Client,
}

impl TokenManager {
    pub fn new(
        store: Arc<dyn TokenStore>,
        oauth_client: Option<OAuthClient>,
        token_url: &str,
    ) -> Self {
        Self {
            store,
            oauth_client,
            token_url: token_url.to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> BotResult<Self> {
        Ok(Self::new(
            token_store_from_config(config)?,
            config.oauth_client.clone(),
            &config.token_url,
        ))
    }

    /// Store a credential obtained elsewhere, e.g. from the consent flow
    pub async fn set_token(&self, credential: &Credential) -> BotResult<()> {
        self.store.save(credential).await
    }

    /// Exchange the refresh token for a new access token and persist it
    pub async fn refresh(&self, credential: &Credential) -> BotResult<Credential> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| token_store_error("No refresh token in token data"))?;
        let oauth = self
            .oauth_client
            .as_ref()
            .ok_or_else(|| token_store_error("No OAuth client configured for token refresh"))?;

        let params = [
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| token_store_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(token_store_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| token_store_error(&format!("Failed to parse token response: {}", e)))?;

        let refreshed =
            token.into_credential(Some(refresh_token.to_string()), Utc::now().timestamp());
        self.store.save(&refreshed).await?;
        info!("Refreshed Google Calendar access token");

        Ok(refreshed)
    }
}

#[async_trait]
impl SessionProvider for TokenManager {
    async fn current_session(&self) -> BotResult<Option<Credential>> {
        let credential = match self.store.load().await {
            Ok(Some(credential)) => credential,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Could not read stored token: {}", e);
                return Ok(None);
            }
        };

        if !credential.expired() || credential.refresh_token.is_none() {
            return Ok(Some(credential));
        }

        match self.refresh(&credential).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(e) => {
                warn!("Could not refresh expired token: {}", e);
                Ok(Some(credential))
            }
        }
    }
}
