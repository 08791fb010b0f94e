mod bot;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use fx_signal_bot::chat::TelegramClient;
use fx_signal_bot::config::Config;

use crate::bot::SignalBot;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    if cfg.telegram_token.is_empty() {
        anyhow::bail!("TELEGRAM_TOKEN is not set");
    }

    let chat = Box::new(TelegramClient::new(&cfg));

    let mut bot = SignalBot::new(cfg, chat);
    bot.run().await?;

    Ok(())
}
