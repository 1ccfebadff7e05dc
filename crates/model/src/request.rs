use serde::{Deserialize, Serialize};

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The input messages, in the order the model should read them.
    pub messages: Vec<ModelMessage>,
}

impl ModelRequest {
    /// Creates the usual two-message request: system instructions first,
    /// then a single user message.
    #[inline]
    pub fn with_system_and_user<S1: Into<String>, S2: Into<String>>(
        system: S1,
        user: S2,
    ) -> Self {
        Self {
            messages: vec![
                ModelMessage::System(system.into()),
                ModelMessage::User(user.into()),
            ],
        }
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
}

impl ModelMessage {
    /// Returns the text of the message regardless of its role.
    #[inline]
    pub fn content(&self) -> &str {
        match self {
            ModelMessage::System(content) | ModelMessage::User(content) => {
                content
            }
        }
    }
}
