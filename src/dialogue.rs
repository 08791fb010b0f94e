use tracing::{debug, info};

use crate::config::Config;
use crate::core::{compute_sizing, parse_signal};
use crate::report::render_table;
use crate::session::Session;

const HELP: &str = "Welcome to the Trading Signal Bot! Use the following commands:\n\n\
/set_language <language> - set your preferred language\n\
/set_currency <currency> - set your preferred currency\n\
/set_risk <fraction> - set your risk per trade (e.g. 0.01)\n\
/trade - provide a trade signal\n\
/cancel - abandon the current signal\n\n\
You can change language, currency and risk at any time.";

const SIGNAL_PROMPT: &str = "Please provide the trade signal in the following format:\n\n\
LONG EURUSD\n\
TP 1 : 1.12845\n\
TP 2 : 1.13345\n\
SL : 1.11845";

/// Where a conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// Waiting for a command.
    Decision,
    /// /trade was issued; the next free-text message is parsed as a signal.
    AwaitingSignal,
    /// A report was shown; /finish confirms it.
    AwaitingConfirmation,
}

/// One inbound message, already split into command and argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    SetLanguage(String),
    SetCurrency(String),
    SetRisk(String),
    Trade,
    Finish,
    Cancel,
    Text(String),
}

impl Command {
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if !text.starts_with('/') {
            return Command::Text(text.to_string());
        }
        let mut parts = text.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or("").trim().to_string();
        match command {
            "/start" => Command::Start,
            "/set_language" => Command::SetLanguage(arg),
            "/set_currency" => Command::SetCurrency(arg),
            "/set_risk" => Command::SetRisk(arg),
            "/trade" => Command::Trade,
            "/finish" => Command::Finish,
            "/cancel" => Command::Cancel,
            _ => Command::Text(text.to_string()),
        }
    }
}

/// The per-conversation dialogue: a session plus the state machine driving
/// it. All transitions go through [`Dialogue::handle`], keyed on
/// (state, command), so the flow is testable without any chat transport.
#[derive(Debug, Clone)]
pub struct Dialogue {
    pub state: DialogueState,
    pub session: Session,
}

impl Dialogue {
    pub fn new(cfg: &Config) -> Self {
        Self {
            state: DialogueState::Decision,
            session: Session::new(cfg),
        }
    }

    pub fn handle(&mut self, cfg: &Config, text: &str) -> Vec<String> {
        let command = Command::from_text(text);
        debug!(state = ?self.state, ?command, "dialogue input");

        match (self.state, command) {
            // /start resets the whole conversation from any state.
            (_, Command::Start) => {
                self.session = Session::new(cfg);
                self.state = DialogueState::Decision;
                vec![HELP.to_string()]
            }
            (_, Command::SetLanguage(arg)) => self.set_language(arg),
            (_, Command::SetCurrency(arg)) => self.set_currency(arg),
            (_, Command::SetRisk(arg)) => self.set_risk(arg),
            (DialogueState::Decision, Command::Trade)
            | (DialogueState::AwaitingSignal, Command::Trade) => {
                self.state = DialogueState::AwaitingSignal;
                vec![SIGNAL_PROMPT.to_string()]
            }
            (DialogueState::AwaitingSignal, Command::Text(text)) => self.calculate(cfg, &text),
            (DialogueState::AwaitingConfirmation, Command::Finish) => self.finish(cfg),
            (DialogueState::AwaitingSignal, Command::Cancel)
            | (DialogueState::AwaitingConfirmation, Command::Cancel) => {
                self.session.clear_pending();
                self.state = DialogueState::Decision;
                vec!["Signal abandoned. Send /trade to start over.".to_string()]
            }
            (DialogueState::Decision, _) => {
                vec!["Send /trade to size a signal, or /start for help.".to_string()]
            }
            (DialogueState::AwaitingSignal, _) => {
                vec!["Expecting a trade signal. Paste one or send /cancel.".to_string()]
            }
            (DialogueState::AwaitingConfirmation, _) => {
                vec!["Send /finish to confirm the trade or /cancel to drop it.".to_string()]
            }
        }
    }

    fn set_language(&mut self, arg: String) -> Vec<String> {
        if arg.is_empty() {
            return vec!["Usage: /set_language <language>".to_string()];
        }
        self.session.language = arg;
        vec![format!(
            "Your preferred language is set to {}!",
            self.session.language
        )]
    }

    fn set_currency(&mut self, arg: String) -> Vec<String> {
        if arg.is_empty() {
            return vec!["Usage: /set_currency <currency>".to_string()];
        }
        self.session.currency = arg;
        vec![format!(
            "Your preferred currency is set to {}!",
            self.session.currency
        )]
    }

    fn set_risk(&mut self, arg: String) -> Vec<String> {
        let accepted = arg
            .parse::<f64>()
            .ok()
            .is_some_and(|risk| self.session.set_risk_factor(risk));
        if accepted {
            vec![format!(
                "Your risk per trade is set to {:.0}%!",
                self.session.risk_factor * 100.0
            )]
        } else {
            vec!["Invalid risk factor. Provide a fraction above 0 and up to 1.".to_string()]
        }
    }

    fn calculate(&mut self, cfg: &Config, text: &str) -> Vec<String> {
        let signal = match parse_signal(text, &cfg.symbols) {
            Ok(signal) => signal,
            Err(err) => {
                info!(%err, "signal rejected");
                return vec![
                    "Invalid trade signal. Please use the specified format.".to_string(),
                ];
            }
        };

        let report = match compute_sizing(
            &signal,
            &cfg.symbols,
            self.session.balance,
            self.session.risk_factor,
            cfg.entry_offset,
        ) {
            Ok(report) => report,
            Err(err) => {
                info!(%err, "signal not sizable");
                return vec![format!("Cannot size this signal: {err}. Please adjust it.")];
            }
        };

        info!(
            symbol = %signal.symbol,
            size = report.position_size,
            "signal sized"
        );
        self.session.pending_signal = Some(signal);
        self.state = DialogueState::AwaitingConfirmation;
        vec![format!(
            "Trade information:\n{}\n\nSend /finish to confirm or /cancel to drop it.",
            render_table(&report, &self.session.currency)
        )]
    }

    fn finish(&mut self, cfg: &Config) -> Vec<String> {
        let Some(signal) = self.session.pending_signal.clone() else {
            self.state = DialogueState::Decision;
            return vec!["No pending trade. Send /trade to start.".to_string()];
        };

        // Same inputs as the preview, so the redisplay is identical.
        let reply = match compute_sizing(
            &signal,
            &cfg.symbols,
            self.session.balance,
            self.session.risk_factor,
            cfg.entry_offset,
        ) {
            Ok(report) => format!(
                "Trade confirmed! Here are the details:\n{}",
                render_table(&report, &self.session.currency)
            ),
            Err(err) => format!("Cannot size this signal anymore: {err}."),
        };

        self.session.clear_pending();
        self.state = DialogueState::Decision;
        vec![reply]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNAL: &str = "LONG EURUSD\nTP 1 : 1.12845\nTP 2 : 1.13345\nSL : 1.11845";

    fn started() -> (Config, Dialogue) {
        let cfg = Config::default();
        let mut dialogue = Dialogue::new(&cfg);
        dialogue.handle(&cfg, "/start");
        (cfg, dialogue)
    }

    #[test]
    fn command_splitting() {
        assert_eq!(Command::from_text("/start"), Command::Start);
        assert_eq!(
            Command::from_text("/set_risk 0.02"),
            Command::SetRisk("0.02".to_string())
        );
        assert_eq!(
            Command::from_text("LONG EURUSD"),
            Command::Text("LONG EURUSD".to_string())
        );
    }

    #[test]
    fn start_shows_help_and_resets() {
        let cfg = Config::default();
        let mut dialogue = Dialogue::new(&cfg);
        let replies = dialogue.handle(&cfg, "/start");
        assert!(replies[0].contains("/trade"));
        assert_eq!(dialogue.state, DialogueState::Decision);
    }

    #[test]
    fn trade_moves_to_awaiting_signal() {
        let (cfg, mut dialogue) = started();
        let replies = dialogue.handle(&cfg, "/trade");
        assert!(replies[0].contains("LONG EURUSD"));
        assert_eq!(dialogue.state, DialogueState::AwaitingSignal);
    }

    #[test]
    fn bad_signal_reprompts_without_losing_session() {
        let (cfg, mut dialogue) = started();
        dialogue.handle(&cfg, "/set_risk 0.02");
        dialogue.handle(&cfg, "/trade");
        let replies = dialogue.handle(&cfg, "BUY SOMETHING");
        assert!(replies[0].contains("Invalid trade signal"));
        assert_eq!(dialogue.state, DialogueState::AwaitingSignal);
        assert_eq!(dialogue.session.risk_factor, 0.02);
    }

    #[test]
    fn good_signal_produces_report_and_awaits_confirmation() {
        let (cfg, mut dialogue) = started();
        dialogue.handle(&cfg, "/trade");
        let replies = dialogue.handle(&cfg, SIGNAL);
        assert!(replies[0].contains("Trade Information"));
        assert!(replies[0].contains("(Split)"));
        assert_eq!(dialogue.state, DialogueState::AwaitingConfirmation);
        assert!(dialogue.session.pending_signal.is_some());
    }

    #[test]
    fn finish_redisplays_and_clears_pending() {
        let (cfg, mut dialogue) = started();
        dialogue.handle(&cfg, "/trade");
        let preview = dialogue.handle(&cfg, SIGNAL);
        let confirmed = dialogue.handle(&cfg, "/finish");
        assert!(confirmed[0].contains("Trade confirmed!"));
        // The confirmation embeds the same table as the preview.
        let table = preview[0]
            .lines()
            .skip(1)
            .take_while(|l| l.starts_with('+') || l.starts_with('|'))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(confirmed[0].contains(&table));
        assert_eq!(dialogue.state, DialogueState::Decision);
        assert!(dialogue.session.pending_signal.is_none());
    }

    #[test]
    fn cancel_drops_pending_work() {
        let (cfg, mut dialogue) = started();
        dialogue.handle(&cfg, "/trade");
        dialogue.handle(&cfg, SIGNAL);
        dialogue.handle(&cfg, "/cancel");
        assert_eq!(dialogue.state, DialogueState::Decision);
        assert!(dialogue.session.pending_signal.is_none());
    }

    #[test]
    fn invalid_risk_value_is_rejected() {
        let (cfg, mut dialogue) = started();
        let replies = dialogue.handle(&cfg, "/set_risk 1.5");
        assert!(replies[0].contains("Invalid risk factor"));
        assert_eq!(dialogue.session.risk_factor, 0.01);
        let replies = dialogue.handle(&cfg, "/set_risk abc");
        assert!(replies[0].contains("Invalid risk factor"));
    }

    #[test]
    fn settings_change_in_any_state() {
        let (cfg, mut dialogue) = started();
        dialogue.handle(&cfg, "/trade");
        dialogue.handle(&cfg, "/set_currency EUR");
        assert_eq!(dialogue.session.currency, "EUR");
        assert_eq!(dialogue.state, DialogueState::AwaitingSignal);
    }

    #[test]
    fn finish_without_pending_trade_is_harmless() {
        let (cfg, mut dialogue) = started();
        dialogue.handle(&cfg, "/trade");
        dialogue.handle(&cfg, SIGNAL);
        dialogue.handle(&cfg, "/cancel");
        let replies = dialogue.handle(&cfg, "/finish");
        assert!(replies[0].contains("Send /trade"));
    }
}
