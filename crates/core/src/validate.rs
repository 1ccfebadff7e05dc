//! Validation of outgoing participant messages.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Why a participant message was not sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationError {
    /// Nothing but whitespace was typed.
    Empty,
    /// Fewer words than required.
    TooShort {
        /// Minimum word count.
        required: usize,
        /// Words actually typed.
        actual: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty => {
                write!(f, "Please type a message before sending.")
            }
            ValidationError::TooShort { required, .. } => write!(
                f,
                "Please type at least {required} words before sending your message."
            ),
        }
    }
}

impl Error for ValidationError {}

/// Accepts or rejects messages by word count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Validator {
    min_words: usize,
}

impl Validator {
    /// Creates a validator requiring at least `min_words` words.
    #[inline]
    pub fn new(min_words: usize) -> Self {
        Self { min_words }
    }

    /// Checks a candidate message and returns it trimmed.
    pub fn validate(&self, candidate: &str) -> Result<String, ValidationError> {
        let message = candidate.trim();
        if message.is_empty() {
            return Err(ValidationError::Empty);
        }
        let words = message.split_whitespace().count();
        if words < self.min_words {
            return Err(ValidationError::TooShort {
                required: self.min_words,
                actual: words,
            });
        }
        Ok(message.to_owned())
    }
}

impl Default for Validator {
    #[inline]
    fn default() -> Self {
        Self::new(10)
    }
}
