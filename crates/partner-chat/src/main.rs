//! Runs a discussion-partner chat in the terminal, with the terminal playing
//! the survey platform.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use partner_chat::core::config::{
    INCIDENT_KEY, PARTICIPANT_NAME_KEY, PARTNER_ID_KEY, PARTNER_KIND_KEY,
};
use partner_chat::core::{ChatConfig, Session, SessionBuilder, SessionStage};
use partner_chat::{HostEvent, TerminalHost, format_bubble};
use partner_chat_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use tokio::io::{self, AsyncBufReadExt};
use tokio::sync::mpsc;

const NEXT_COMMAND: &str = "/next";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };
    let mut openai_config = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        openai_config = openai_config.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        openai_config = openai_config.with_model(model);
    }
    let model_provider = OpenAIProvider::new(openai_config.build());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut host = TerminalHost::new(event_tx);
    for (var, key) in [
        ("CHATBOT_NAME", PARTNER_ID_KEY),
        ("CHATBOT_TYPE", PARTNER_KIND_KEY),
        ("USER_PREFERRED_NAME", PARTICIPANT_NAME_KEY),
        ("USER_RECALL_INCIDENT", INCIDENT_KEY),
    ] {
        if let Ok(value) = env::var(var) {
            host = host.with_embedded_data(key, value);
        }
    }
    let host = Arc::new(host);

    let config = chat_config();
    let transcript_key = config.transcript_key().to_owned();
    let session = SessionBuilder::with_model_provider(model_provider)
        .with_config(config)
        .on_idle(host.idle_callback())
        .build(host.clone(), host.clone());

    let mut screen = Screen::new();
    if session.start().is_ok() {
        while screen.pump(&session, &mut event_rx).await {
            print!("> ");
            std::io::stdout().flush().ok();

            let Some(line) = read_line().await else {
                break;
            };
            let line = line.trim();
            if line == NEXT_COMMAND {
                if screen.next_visible {
                    break;
                }
                println!("{}", "The Next button is not available yet.".dimmed());
                continue;
            }
            if session.send_message(line).is_err() {
                break;
            }
        }
    }

    session.stop().ok();
    session.closed().await;
    while let Ok(event) = event_rx.try_recv() {
        screen.handle(event);
    }
    screen.clear_typing();
    debug!(
        "persisted transcript: {:?}",
        host.embedded(&transcript_key).unwrap_or_default()
    );
}

/// What the terminal currently shows.
struct Screen {
    printed: usize,
    exit_notice_shown: bool,
    next_visible: bool,
    typing: Option<ProgressBar>,
    typing_style: ProgressStyle,
}

impl Screen {
    fn new() -> Self {
        let typing_style = ProgressStyle::with_template("{wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        Self {
            printed: 0,
            exit_notice_shown: false,
            next_visible: false,
            typing: None,
            typing_style,
        }
    }

    /// Prints everything the session has emitted so far, waiting for the
    /// partner if a reply is pending. Returns `false` once the session is
    /// gone.
    async fn pump(
        &mut self,
        session: &Session,
        event_rx: &mut mpsc::UnboundedReceiver<HostEvent>,
    ) -> bool {
        // The snapshot is answered after every earlier command, so all
        // events caused by them are already queued.
        let Ok(snapshot) = session.snapshot().await else {
            return false;
        };
        let mut awaiting = snapshot.stage == SessionStage::AwaitingResponse;
        loop {
            let event = if awaiting {
                event_rx.recv().await
            } else {
                match event_rx.try_recv() {
                    Ok(event) => Some(event),
                    Err(_) => return true,
                }
            };
            let Some(event) = event else {
                return false;
            };
            if event == HostEvent::Idle {
                awaiting = false;
            }
            self.handle(event);
        }
    }

    fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Render(view) => {
                self.clear_typing();
                if view.bubbles.len() < self.printed {
                    self.printed = 0;
                }
                for bubble in &view.bubbles[self.printed..] {
                    println!("{}", format_bubble(bubble));
                }
                self.printed = view.bubbles.len();
                if let Some(notice) = view.exit_notice {
                    if !self.exit_notice_shown {
                        println!("\n{}\n", notice.bright_yellow());
                        self.exit_notice_shown = true;
                    }
                }
            }
            HostEvent::Typing(Some(frame)) if frame.visible => {
                let typing = self.typing.get_or_insert_with(|| {
                    let bar = ProgressBar::new_spinner();
                    bar.set_style(self.typing_style.clone());
                    bar
                });
                typing.set_message(format!("Discussion Partner is {}", frame.text()));
                typing.tick();
            }
            HostEvent::Typing(_) => self.clear_typing(),
            HostEvent::Notice(notice) => {
                self.clear_typing();
                println!("{}", notice.bright_red());
            }
            HostEvent::NextButton(visible) => {
                self.next_visible = visible;
                if visible {
                    println!(
                        "{}",
                        format!("Type {NEXT_COMMAND} to leave the chat.").dimmed()
                    );
                }
            }
            HostEvent::Idle => {}
        }
    }

    fn clear_typing(&mut self) {
        if let Some(typing) = self.typing.take() {
            typing.finish_and_clear();
        }
    }
}

fn chat_config() -> ChatConfig {
    let mut config = ChatConfig::default();
    if let Some(words) = env_number("CHAT_MIN_WORDS") {
        config = config.with_min_word_count(words);
    }
    if let Some(messages) = env_number("CHAT_EXIT_THRESHOLD") {
        config = config.with_exit_threshold(messages);
    }
    let delay_min = env_number::<u64>("CHAT_DELAY_MIN_SECS");
    let delay_max = env_number::<u64>("CHAT_DELAY_MAX_SECS");
    if delay_min.is_some() || delay_max.is_some() {
        let min = delay_min.or(delay_max).unwrap_or_default();
        let max = delay_max.unwrap_or(min);
        config = config
            .with_typing_delay(Duration::from_secs(min), Duration::from_secs(max));
    }
    config
}

fn env_number<T: FromStr>(var: &str) -> Option<T> {
    let value = env::var(var).ok()?;
    match value.trim().parse() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!("ignoring {var}={value:?}, not a number");
            None
        }
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
