use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;

use fx_signal_bot::chat::{Chat, IncomingMessage};

/// A scripted chat transport: hands out one inbound message per poll and
/// records everything the bot sends back.
pub struct MockChat {
    inbound: VecDeque<IncomingMessage>,
    pub sent: Vec<(i64, String)>,
}

impl MockChat {
    pub fn new(script: &[(i64, &str)]) -> Self {
        Self {
            inbound: script
                .iter()
                .map(|&(chat_id, text)| IncomingMessage {
                    chat_id,
                    text: text.to_string(),
                })
                .collect(),
            sent: Vec::new(),
        }
    }

    pub fn replies_to(&self, chat_id: i64) -> Vec<&str> {
        self.sent
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

#[async_trait]
impl Chat for MockChat {
    async fn poll(&mut self) -> Result<Vec<IncomingMessage>> {
        Ok(self.inbound.pop_front().into_iter().collect())
    }

    async fn send(&mut self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.push((chat_id, text.to_string()));
        Ok(())
    }
}
