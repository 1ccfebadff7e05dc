use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use owo_colors::OwoColorize;
use partner_chat_core::presentation::{
    Alignment, Bubble, ChatView, TypingFrame,
};
use partner_chat_core::{ChatSurface, HostPlatform};
use tokio::sync::mpsc;

const BAR_CHAR: &str = "▎";

/// Something the session asked the terminal to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The chat widget was redrawn.
    Render(ChatView),
    /// The typing indicator changed. `None` removes it.
    Typing(Option<TypingFrame>),
    /// A notice for the participant.
    Notice(String),
    /// The Next button was shown or hidden.
    NextButton(bool),
    /// An exchange concluded; see [`TerminalHost::idle_callback`].
    Idle,
}

/// A survey platform and chat surface backed by the terminal.
///
/// Embedded data lives in memory. Everything the session wants drawn is
/// forwarded as a [`HostEvent`], so printing happens on the caller's side
/// and never on the session's driver task.
pub struct TerminalHost {
    embedded_data: Mutex<HashMap<String, String>>,
    event_tx: mpsc::UnboundedSender<HostEvent>,
}

impl TerminalHost {
    /// Creates a host that forwards its events to `event_tx`.
    pub fn new(event_tx: mpsc::UnboundedSender<HostEvent>) -> Self {
        Self {
            embedded_data: Mutex::default(),
            event_tx,
        }
    }

    /// Seeds a value of the embedded data.
    #[inline]
    pub fn with_embedded_data<K, V>(self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        lock(&self.embedded_data).insert(key.into(), value.into());
        self
    }

    /// Reads a value of the embedded data.
    #[inline]
    pub fn embedded(&self, key: &str) -> Option<String> {
        lock(&self.embedded_data).get(key).cloned()
    }

    /// Returns a callback for [`SessionBuilder::on_idle`] that sends
    /// [`HostEvent::Idle`].
    ///
    /// [`SessionBuilder::on_idle`]: partner_chat_core::SessionBuilder::on_idle
    pub fn idle_callback(&self) -> impl Fn() + Send + Sync + 'static {
        let event_tx = self.event_tx.clone();
        move || {
            event_tx.send(HostEvent::Idle).ok();
        }
    }

    fn emit(&self, event: HostEvent) {
        if self.event_tx.send(event).is_err() {
            trace!("terminal is gone, dropping event");
        }
    }
}

impl HostPlatform for TerminalHost {
    fn embedded_data(&self, key: &str) -> Option<String> {
        self.embedded(key)
    }

    fn set_embedded_data(&self, key: &str, value: &str) {
        debug!("embedded data {key:?} updated ({} bytes)", value.len());
        lock(&self.embedded_data).insert(key.to_owned(), value.to_owned());
    }

    fn set_next_button_visible(&self, visible: bool) {
        self.emit(HostEvent::NextButton(visible));
    }
}

impl ChatSurface for TerminalHost {
    fn render(&self, view: &ChatView) {
        self.emit(HostEvent::Render(view.clone()));
    }

    fn update_typing(&self, frame: Option<TypingFrame>) {
        self.emit(HostEvent::Typing(frame));
    }

    fn show_notice(&self, notice: &str) {
        self.emit(HostEvent::Notice(notice.to_owned()));
    }
}

/// Formats a bubble as one colored line.
///
/// Participant bubbles are green, partner bubbles cyan.
pub fn format_bubble(bubble: &Bubble) -> String {
    match bubble.align {
        Alignment::Right => format!(
            "{}{} {}",
            BAR_CHAR.bright_green(),
            format!("{}:", bubble.label).bold(),
            bubble.text
        ),
        Alignment::Left => format!(
            "{}{} {}",
            BAR_CHAR.bright_cyan(),
            format!("{}:", bubble.label).bold(),
            bubble.text.bright_white()
        ),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
