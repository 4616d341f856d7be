use crate::config::Config;
use crate::error::{BotResult, Error};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use tracing::info;

/// Text-generation service the planner forwards prompts to
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> BotResult<String>;
}

/// Google Gemini through rig
pub struct GeminiGenerator {
    client: GeminiClient,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> BotResult<Self> {
        let api_key = config.require_api_key()?;
        info!("Using Gemini model: {}", config.gemini_model);
        Ok(Self::new(api_key, &config.gemini_model))
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> BotResult<String> {
        let agent = self.client.agent(&self.model).build();

        let response = agent
            .chat(prompt.to_string(), Vec::<Message>::new())
            .await
            .map_err(|e| Error::Llm(format!("Gemini request failed: {}", e)))?;

        info!("Received response from Gemini ({} chars)", response.len());
        Ok(response)
    }
}
