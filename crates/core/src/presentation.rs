//! Everything the participant sees: bubbles, the typing indicator, and
//! the exit notice.

mod timer;
mod typing;
mod view;

pub use timer::TimerSet;
pub use typing::{TypingFrame, TypingIndicator};
pub use view::{Alignment, Bubble, ChatView, EXIT_NOTICE, render_view};
