//! The surfaces a session needs from the page it is embedded in.

use crate::presentation::{ChatView, TypingFrame};

/// The survey platform hosting the chat question.
///
/// Implementations must be cheap and non-blocking; the session calls
/// them from its driver task.
pub trait HostPlatform: Send + Sync + 'static {
    /// Reads a named value from the platform's embedded data.
    fn embedded_data(&self, key: &str) -> Option<String>;

    /// Overwrites a named value in the platform's embedded data.
    fn set_embedded_data(&self, key: &str, value: &str);

    /// Shows or hides the platform's forward-navigation control.
    fn set_next_button_visible(&self, visible: bool);
}

/// The widget area the chat is drawn into.
pub trait ChatSurface: Send + Sync + 'static {
    /// Replaces whatever is drawn with `view`.
    fn render(&self, view: &ChatView);

    /// Updates the typing indicator. `None` removes it.
    fn update_typing(&self, frame: Option<TypingFrame>);

    /// Shows a notice the participant has to acknowledge.
    fn show_notice(&self, notice: &str);
}
