//! A discussion-partner chat that runs in the terminal.
//!
//! The crate includes a CLI that plays the part of the survey platform. You
//! can also use [`TerminalHost`] as a library to drive a session from your own
//! terminal program.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod terminal;

pub use terminal::{HostEvent, TerminalHost, format_bubble};

/// Re-exports of [`partner_chat_core`] crate.
pub mod core {
    pub use partner_chat_core::*;
}
