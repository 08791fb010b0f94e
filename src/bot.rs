use anyhow::Result;
use std::collections::HashMap;
use tracing::{error, info, warn};

use fx_signal_bot::chat::{Chat, IncomingMessage};
use fx_signal_bot::config::Config;
use fx_signal_bot::dialogue::Dialogue;

/// Binds the chat transport to per-conversation dialogues. One dialogue per
/// chat id; each poll batch is handled sequentially, so a conversation never
/// has two mutations in flight.
pub struct SignalBot {
    config: Config,
    chat: Box<dyn Chat>,
    dialogues: HashMap<i64, Dialogue>,
}

impl SignalBot {
    pub fn new(config: Config, chat: Box<dyn Chat>) -> Self {
        info!("{}", "=".repeat(60));
        info!("FX Signal Bot starting up");
        info!("Symbols in allowlist: {}", config.symbols.len());
        info!(
            "Defaults: balance={} risk={:.0}% entry_offset={}",
            config.account_balance,
            config.risk_factor * 100.0,
            config.entry_offset
        );
        info!("{}", "=".repeat(60));

        Self {
            config,
            chat,
            dialogues: HashMap::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Bot is now running. Press Ctrl+C to stop.");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down ({} active conversations)", self.dialogues.len());
                    return Ok(());
                }
                result = self.chat.poll() => {
                    match result {
                        Ok(messages) => self.dispatch(messages).await,
                        Err(err) => {
                            // Transport hiccups are retried on the next poll.
                            error!(%err, "poll failed");
                            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                        }
                    }
                }
            }
        }
    }

    async fn dispatch(&mut self, messages: Vec<IncomingMessage>) {
        for message in messages {
            let dialogue = self
                .dialogues
                .entry(message.chat_id)
                .or_insert_with(|| Dialogue::new(&self.config));

            let replies = dialogue.handle(&self.config, &message.text);
            for reply in replies {
                if let Err(err) = self.chat.send(message.chat_id, &reply).await {
                    warn!(chat_id = message.chat_id, %err, "reply not delivered");
                }
            }
        }
    }
}
