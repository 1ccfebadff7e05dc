//! Core logic of the discussion-partner chat: prompts, the transcript,
//! message validation, the exchange cycle, the exit gate, presentation,
//! and the session that ties them to a host.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod exchange;
pub mod gate;
pub mod host;
mod model_client;
pub mod presentation;
pub mod prompt;
mod session;
#[cfg(test)]
mod testing;
pub mod transcript;
pub mod validate;

pub use config::{ChatConfig, SessionConfig, TypingAnimation};
pub use exchange::{ExchangeError, ExchangeRequest, run_exchange};
pub use gate::{ExitGate, GateState};
pub use host::{ChatSurface, HostPlatform};
pub use model_client::ModelClient;
pub use session::{
    Session, SessionBuilder, SessionClosedError, SessionSnapshot,
    SessionStage,
};
pub use transcript::{Speaker, Transcript, Turn};
