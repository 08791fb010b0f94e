use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

use crate::chat::{Chat, IncomingMessage};
use crate::config::Config;

const BASE_URL: &str = "https://api.telegram.org";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    update_id: i64,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    chat: RawChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: i64,
}

/// Telegram Bot API client using long polling. Tracks the update offset so
/// each message is delivered once.
pub struct TelegramClient {
    client: Client,
    token: String,
    poll_timeout_secs: u64,
    offset: i64,
    last_request: Option<Instant>,
}

impl TelegramClient {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            token: cfg.telegram_token.clone(),
            poll_timeout_secs: cfg.poll_timeout_secs,
            offset: 0,
            last_request: None,
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", BASE_URL, self.token, method)
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

#[async_trait]
impl Chat for TelegramClient {
    async fn poll(&mut self) -> Result<Vec<IncomingMessage>> {
        self.rate_limit().await;

        let response: ApiResponse<Vec<RawUpdate>> = self
            .client
            .get(self.url("getUpdates"))
            .query(&[
                ("offset", self.offset.to_string()),
                ("timeout", self.poll_timeout_secs.to_string()),
            ])
            .timeout(Duration::from_secs(self.poll_timeout_secs + 10))
            .send()
            .await
            .context("getUpdates request failed")?
            .json()
            .await
            .context("getUpdates returned malformed JSON")?;

        if !response.ok {
            anyhow::bail!(
                "getUpdates rejected: {}",
                response.description.unwrap_or_default()
            );
        }

        let updates = response.result.unwrap_or_default();
        let mut messages = Vec::new();
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            if let Some(message) = update.message {
                if let Some(text) = message.text {
                    messages.push(IncomingMessage {
                        chat_id: message.chat.id,
                        text,
                    });
                }
            }
        }
        Ok(messages)
    }

    async fn send(&mut self, chat_id: i64, text: &str) -> Result<()> {
        self.rate_limit().await;

        let response: ApiResponse<serde_json::Value> = self
            .client
            .post(self.url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .context("sendMessage request failed")?
            .json()
            .await
            .context("sendMessage returned malformed JSON")?;

        if !response.ok {
            anyhow::bail!(
                "sendMessage rejected: {}",
                response.description.unwrap_or_default()
            );
        }
        Ok(())
    }
}
