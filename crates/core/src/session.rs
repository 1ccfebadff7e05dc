mod builder;
mod state;

use std::error::Error;
use std::fmt;

use tokio::sync::{mpsc, oneshot};

use crate::config::SessionConfig;
use crate::gate::GateState;
use crate::transcript::Transcript;
pub use builder::SessionBuilder;
use state::Command;
pub use state::SessionStage;

/// A type of error which is returned when talking to a session that has
/// already been torn down.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SessionClosedError;

impl fmt::Debug for SessionClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClosedError").finish()
    }
}

impl fmt::Display for SessionClosedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the chat session has been closed".fmt(f)
    }
}

impl Error for SessionClosedError {}

/// A point-in-time copy of a session's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Where the session is in its lifecycle.
    pub stage: SessionStage,
    /// Inputs read at start, if the session has started.
    pub profile: Option<SessionConfig>,
    /// Every turn so far.
    pub transcript: Transcript,
    /// The exit gate.
    pub gate: GateState,
    /// Accepted participant messages.
    pub exchange_count: u32,
    /// Whether the participant can send a message right now.
    pub input_enabled: bool,
}

/// A chat session embedded in one survey question.
///
/// The host calls [`Session::start`] when the question is ready and
/// [`Session::stop`] when it unloads. Dropping the last handle has the
/// same effect as `stop`. All work happens on a driver task, so every
/// method returns immediately.
#[derive(Clone)]
pub struct Session {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Session {
    /// Reads the session inputs from the host, shows the seeded incident
    /// and, unless disabled, asks the partner for an opening reply.
    #[inline]
    pub fn start(&self) -> Result<(), SessionClosedError> {
        self.send(Command::Start)
    }

    /// Submits a participant message.
    ///
    /// Messages arriving while a reply is pending are dropped, like clicks
    /// on a disabled send button. Invalid messages produce a notice on the
    /// chat surface.
    #[inline]
    pub fn send_message<S: Into<String>>(
        &self,
        message: S,
    ) -> Result<(), SessionClosedError> {
        self.send(Command::Submit(message.into()))
    }

    /// Tears the session down: cancels the pending exchange and every
    /// timer, and writes the transcript to the host one last time.
    #[inline]
    pub fn stop(&self) -> Result<(), SessionClosedError> {
        self.send(Command::Stop)
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionClosedError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| SessionClosedError)
    }

    /// Waits until the session has been torn down.
    #[inline]
    pub async fn closed(&self) {
        self.cmd_tx.closed().await;
    }

    #[inline]
    fn send(&self, cmd: Command) -> Result<(), SessionClosedError> {
        self.cmd_tx.send(cmd).map_err(|_| SessionClosedError)
    }
}
