use serde::{Deserialize, Serialize};

/// How the test model answers one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetResponse {
    /// A successful completion with the given text.
    #[serde(rename = "reply")]
    Reply(String),
    /// A non-success HTTP status.
    #[serde(rename = "status")]
    Status(u16),
    /// A 2xx response whose body has no completion in it.
    #[serde(rename = "malformed")]
    Malformed,
    /// The connection failed before any response.
    #[serde(rename = "transport_failure")]
    TransportFailure,
    /// The request never finishes.
    #[serde(rename = "hang")]
    Hang,
}

impl PresetResponse {
    /// Creates a successful reply.
    #[inline]
    pub fn reply<S: Into<String>>(text: S) -> Self {
        Self::Reply(text.into())
    }
}
