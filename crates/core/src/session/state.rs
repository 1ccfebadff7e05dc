use std::fmt::{self, Debug};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::SessionSnapshot;
use crate::config::{ChatConfig, SessionConfig};
use crate::exchange::{ExchangeError, ExchangeRequest, run_exchange};
use crate::gate::{ExitGate, GateTransition};
use crate::host::{ChatSurface, HostPlatform};
use crate::model_client::ModelClient;
use crate::presentation::{TypingIndicator, render_view};
use crate::prompt::{build_system_prompt, context_prompt};
use crate::transcript::{Transcript, Turn};
use crate::validate::Validator;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionStage {
    /// Built, but the host has not called `start` yet.
    #[default]
    NotStarted,
    /// Waiting for the participant.
    Idle,
    /// An exchange is in flight; the send control is disabled.
    AwaitingResponse,
    /// Torn down.
    Stopped,
}

pub(super) enum Command {
    Start,
    Submit(String),
    ExchangeFinished {
        model_client: ModelClient,
        result: Result<Turn, ExchangeError>,
    },
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Stop,
}

impl Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => f.write_str("Start"),
            Command::Submit(message) => {
                f.debug_tuple("Submit").field(message).finish()
            }
            Command::ExchangeFinished { result, .. } => f
                .debug_struct("ExchangeFinished")
                .field("result", result)
                .finish_non_exhaustive(),
            Command::Snapshot(_) => f.write_str("Snapshot"),
            Command::Stop => f.write_str("Stop"),
        }
    }
}

pub(super) struct SessionState {
    config: ChatConfig,
    platform: Arc<dyn HostPlatform>,
    surface: Arc<dyn ChatSurface>,
    // Moved into the exchange task while a request is in flight, so a
    // second exchange cannot start before the first one has finished.
    model_client: Option<ModelClient>,
    validator: Validator,
    gate: ExitGate,
    transcript: Transcript,
    profile: Option<SessionConfig>,
    system_prompt: String,
    stage: SessionStage,
    typing: Option<TypingIndicator>,
    in_flight: Option<JoinHandle<()>>,
    cmd_tx: mpsc::WeakUnboundedSender<Command>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl SessionState {
    pub fn new(
        model_client: ModelClient,
        config: ChatConfig,
        platform: Arc<dyn HostPlatform>,
        surface: Arc<dyn ChatSurface>,
        cmd_tx: mpsc::WeakUnboundedSender<Command>,
        on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    ) -> Self {
        Self {
            validator: Validator::new(config.min_word_count),
            gate: ExitGate::new(config.exit_threshold),
            config,
            platform,
            surface,
            model_client: Some(model_client),
            transcript: Transcript::default(),
            profile: None,
            system_prompt: String::new(),
            stage: SessionStage::NotStarted,
            typing: None,
            in_flight: None,
            cmd_tx,
            on_idle,
        }
    }

    fn start(&mut self) {
        if self.stage != SessionStage::NotStarted {
            warn!("session has already been started");
            return;
        }
        self.platform.set_next_button_visible(false);

        let profile = SessionConfig::from_platform(&*self.platform);
        info!(
            "session started with partner {:?} ({:?})",
            profile.partner_id, profile.partner_kind
        );
        self.system_prompt = build_system_prompt(
            &profile.partner_id,
            &profile.initial_incident,
        );
        self.transcript
            .push(Turn::participant(profile.initial_incident.clone()));
        self.stage = SessionStage::Idle;

        if self.config.opening_reply {
            self.begin_exchange(profile.initial_incident.clone());
        } else {
            self.render();
        }
        self.profile = Some(profile);
    }

    fn submit(&mut self, candidate: String) {
        match self.stage {
            SessionStage::Idle => {}
            SessionStage::AwaitingResponse => {
                debug!("input is disabled while awaiting a reply, dropping");
                return;
            }
            SessionStage::NotStarted | SessionStage::Stopped => {
                warn!("session is not running, dropping message");
                return;
            }
        }

        let message = match self.validator.validate(&candidate) {
            Ok(message) => message,
            Err(err) => {
                debug!("rejected message: {err:?}");
                self.surface.show_notice(&err.to_string());
                return;
            }
        };

        self.transcript.push(Turn::participant(message));
        if let Some(GateTransition::Released) = self.gate.record_message() {
            info!("exit gate released after {} messages", self.gate.count());
            self.platform.set_next_button_visible(true);
        }

        let user_prompt = context_prompt(&self.transcript.flatten());
        self.begin_exchange(user_prompt);
    }

    fn begin_exchange(&mut self, user_prompt: String) {
        let Some(model_client) = self.model_client.take() else {
            error!("model client is already in use");
            return;
        };
        self.stage = SessionStage::AwaitingResponse;
        self.render();
        self.typing = Some(TypingIndicator::start(
            Arc::clone(&self.surface),
            self.config.typing_animation,
        ));

        let request = ExchangeRequest {
            system_prompt: self.system_prompt.clone(),
            user_prompt,
        };
        let config = self.config.clone();
        let cmd_tx = self.cmd_tx.clone();
        let task = tokio::spawn(
            async move {
                let result = run_exchange(&model_client, &config, request).await;
                let Some(cmd_tx) = cmd_tx.upgrade() else {
                    return;
                };
                cmd_tx
                    .send(Command::ExchangeFinished {
                        model_client,
                        result,
                    })
                    .ok();
            }
            .instrument(debug_span!("exchange")),
        );
        self.in_flight = Some(task);
    }

    fn finish_exchange(
        &mut self,
        model_client: ModelClient,
        result: Result<Turn, ExchangeError>,
    ) {
        self.model_client = Some(model_client);
        self.in_flight = None;
        self.typing = None;

        match result {
            Ok(turn) => {
                self.transcript.push(turn);
                self.persist();
            }
            Err(err) => {
                warn!("exchange failed: {err}");
                self.surface.show_notice(err.notice());
            }
        }

        self.stage = SessionStage::Idle;
        self.render();
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage,
            profile: self.profile.clone(),
            transcript: self.transcript.clone(),
            gate: self.gate.state(),
            exchange_count: self.gate.count(),
            input_enabled: self.stage == SessionStage::Idle,
        }
    }

    fn teardown(&mut self) {
        if self.stage == SessionStage::Stopped {
            return;
        }
        if let Some(task) = self.in_flight.take() {
            debug!("cancelling the pending exchange");
            task.abort();
        }
        self.typing = None;
        if self.stage != SessionStage::NotStarted {
            self.persist();
        }
        self.stage = SessionStage::Stopped;
        info!("session stopped with {} turns", self.transcript.len());
    }

    fn persist(&self) {
        self.platform.set_embedded_data(
            &self.config.transcript_key,
            &self.transcript.flatten(),
        );
    }

    fn render(&self) {
        let view = render_view(
            &self.transcript,
            self.stage == SessionStage::Idle,
            self.gate.is_released(),
        );
        self.surface.render(&view);
    }
}

pub(super) async fn run_session(
    mut state: SessionState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        match cmd {
            Command::Start => state.start(),
            Command::Submit(message) => state.submit(message),
            Command::ExchangeFinished {
                model_client,
                result,
            } => state.finish_exchange(model_client, result),
            Command::Snapshot(reply) => {
                reply.send(state.snapshot()).ok();
            }
            Command::Stop => break,
        }
    }
    state.teardown();
    debug!("will terminate");
}
