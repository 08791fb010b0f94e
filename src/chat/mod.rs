pub mod telegram;

pub use telegram::TelegramClient;

use anyhow::Result;
use async_trait::async_trait;

/// One inbound chat message, stripped down to what the dialogue needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Opaque messaging collaborator. The bot only ever polls for messages and
/// sends replies; everything else about the transport stays behind this
/// trait.
#[async_trait]
pub trait Chat: Send + Sync {
    async fn poll(&mut self) -> Result<Vec<IncomingMessage>>;
    async fn send(&mut self, chat_id: i64, text: &str) -> Result<()>;
}
