use crate::error::BotResult;
use async_trait::async_trait;
use serenity::all::{ChannelId, CreateMessage, Http};
use std::sync::Arc;
use tracing::debug;

/// Discord rejects messages longer than this many characters
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Destination for plan messages
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send(&self, channel_id: u64, content: &str) -> BotResult<()>;
}

/// Posts messages to a Discord channel over the REST API
#[derive(Clone)]
pub struct DiscordSink {
    http: Arc<Http>,
}

impl DiscordSink {
    pub fn new(token: &str) -> Self {
        Self {
            http: Arc::new(Http::new(token)),
        }
    }
}

#[async_trait]
impl ChatSink for DiscordSink {
    async fn send(&self, channel_id: u64, content: &str) -> BotResult<()> {
        let channel_id = ChannelId::new(channel_id);
        let chunks = split_message(content, DISCORD_MESSAGE_LIMIT);
        debug!("Sending {} message chunk(s) to channel {}", chunks.len(), channel_id);

        for chunk in chunks {
            channel_id
                .send_message(&self.http, CreateMessage::new().content(chunk))
                .await?;
        }

        Ok(())
    }
}

/// Split `content` into pieces of at most `limit` characters.
///
/// Pieces break after a newline when one is available so Markdown lines stay whole.
pub fn split_message(content: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = content;

    while rest.chars().count() > limit {
        let hard_end = rest
            .char_indices()
            .nth(limit)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let end = match rest[..hard_end].rfind('\n') {
            Some(newline) if newline > 0 => newline + 1,
            _ => hard_end,
        };
        chunks.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}
