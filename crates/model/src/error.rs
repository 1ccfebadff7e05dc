use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never got a response (connection, TLS, DNS, etc.).
    Transport,
    /// The provider answered with a non-success status code.
    Status(u16),
    /// The response body could not be read as a completion.
    MalformedResponse,
    /// The request did not finish within the configured time limit.
    TimedOut,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Status(code) => write!(f, "status {code}"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
            ErrorKind::TimedOut => write!(f, "timed out"),
        }
    }
}
