use serde::{Deserialize, Serialize};

/// A completely received answer from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelCompletion {
    /// The generated text, exactly as the provider returned it.
    pub content: String,
}

impl ModelCompletion {
    /// Creates a completion from the given text.
    #[inline]
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
        }
    }
}
