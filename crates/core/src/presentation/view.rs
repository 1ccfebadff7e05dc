use crate::transcript::{Speaker, Transcript};

/// Shown once the participant may leave the chat.
pub const EXIT_NOTICE: &str = "Now it's time for the open discussion. If you would like to continue the discussion, feel free to continue. If you no longer want to chat, anytime, click \"Next\" at the bottom right of your page and exit your chat window.";

/// Which side of the chat a bubble sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// The partner's side.
    Left,
    /// The participant's side.
    Right,
}

/// One rendered message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bubble {
    /// Who wrote the message.
    pub speaker: Speaker,
    /// The name printed in front of the text.
    pub label: &'static str,
    /// The message text.
    pub text: String,
    /// Where the bubble sits.
    pub align: Alignment,
}

impl Bubble {
    fn new(speaker: Speaker, text: &str) -> Self {
        let (label, align) = match speaker {
            Speaker::Participant => ("You", Alignment::Right),
            Speaker::Partner => ("Discussion Partner", Alignment::Left),
        };
        Self {
            speaker,
            label,
            text: text.to_owned(),
            align,
        }
    }
}

/// A full snapshot of the chat widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChatView {
    /// One bubble per turn, oldest first.
    pub bubbles: Vec<Bubble>,
    /// Whether the message box and send button accept input.
    pub input_enabled: bool,
    /// The exit notice, once the gate has been released.
    pub exit_notice: Option<&'static str>,
}

/// Builds the view for a transcript. Pure.
pub fn render_view(
    transcript: &Transcript,
    input_enabled: bool,
    show_exit_notice: bool,
) -> ChatView {
    ChatView {
        bubbles: transcript
            .turns()
            .iter()
            .map(|turn| Bubble::new(turn.speaker(), turn.text()))
            .collect(),
        input_enabled,
        exit_notice: show_exit_notice.then_some(EXIT_NOTICE),
    }
}
