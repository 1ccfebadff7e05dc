//! Conversation transcript types.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Who wrote a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// The research participant.
    Participant,
    /// The AI discussion partner.
    Partner,
}

impl Speaker {
    /// Returns the label this speaker's lines carry in the flattened
    /// transcript.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Speaker::Participant => "You",
            Speaker::Partner => "AI",
        }
    }
}

/// One message in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    /// Creates a turn written by the participant.
    #[inline]
    pub fn participant<S: Into<String>>(text: S) -> Self {
        Self {
            speaker: Speaker::Participant,
            text: text.into(),
        }
    }

    /// Creates a turn written by the discussion partner.
    #[inline]
    pub fn partner<S: Into<String>>(text: S) -> Self {
        Self {
            speaker: Speaker::Partner,
            text: text.into(),
        }
    }

    /// Returns who wrote this turn.
    #[inline]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// Returns the text of this turn.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for Turn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.label(), self.text)
    }
}

/// The ordered, append-only history of a session.
///
/// Its flattened form (`"You: …\nAI: …"`) is what the model receives as
/// context and what the host stores.
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Appends a turn.
    #[inline]
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns all turns, oldest first.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the most recent turn.
    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Renders every turn as a `Label: text` line, joined by newlines.
    pub fn flatten(&self) -> String {
        let mut flattened = String::new();
        for (idx, turn) in self.turns.iter().enumerate() {
            if idx > 0 {
                flattened.push('\n');
            }
            flattened.push_str(&turn.to_string());
        }
        flattened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.flatten(), "");

        transcript.push(Turn::participant("I got cut off in traffic."));
        assert_eq!(transcript.flatten(), "You: I got cut off in traffic.");

        transcript.push(Turn::partner("That sounds stressful."));
        transcript.push(Turn::participant("It was."));
        assert_eq!(
            transcript.flatten(),
            "You: I got cut off in traffic.\nAI: That sounds stressful.\nYou: It was."
        );
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().unwrap().speaker(), Speaker::Participant);
    }

    #[test]
    fn test_flatten_tracks_every_push() {
        let mut transcript = Transcript::default();
        let mut expected = Vec::new();
        for i in 0..6 {
            let turn = if i % 2 == 0 {
                Turn::participant(format!("message {i}"))
            } else {
                Turn::partner(format!("reply {i}\nwith a second line"))
            };
            expected.push(turn.to_string());
            transcript.push(turn);
            assert_eq!(transcript.flatten(), expected.join("\n"));
        }
    }

    #[test]
    fn test_json_shape() {
        let mut transcript = Transcript::default();
        transcript.push(Turn::participant("hi"));
        transcript.push(Turn::partner("hello"));
        let json = serde_json::to_string(&transcript).unwrap();
        assert_eq!(
            json,
            r#"{"turns":[{"speaker":"Participant","text":"hi"},{"speaker":"Partner","text":"hello"}]}"#
        );
        let parsed: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.flatten(), "You: hi\nAI: hello");
    }
}
