//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use partner_chat_model::{
    ErrorKind, ModelCompletion, ModelProvider, ModelProviderError,
    ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should answer each request in turn. Clones share the script and
/// the request log, so a test can hand one clone to the code under test and
/// keep another to inspect what was sent. Requests beyond the end of the
/// script fail with a `503` status.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<VecDeque<PresetResponse>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Appends a response to the script.
    #[inline]
    pub fn add_response(&self, preset: PresetResponse) {
        lock(&self.script).push_back(preset);
    }

    /// Appends a successful reply to the script.
    #[inline]
    pub fn add_reply<S: Into<String>>(&self, text: S) {
        self.add_response(PresetResponse::reply(text));
    }

    /// Makes every answer wait for `duration` first.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the requests received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        lock(&self.requests).clone()
    }

    /// Returns how many scripted responses have not been used yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("remaining", &self.remaining())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelCompletion, Self::Error>> + Send + 'static
    {
        lock(&self.requests).push(req.clone());
        let preset = lock(&self.script).pop_front();
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match preset {
                Some(PresetResponse::Reply(text)) => {
                    Ok(ModelCompletion::new(text))
                }
                Some(PresetResponse::Status(code)) => Err(Error {
                    message: "scripted status",
                    kind: ErrorKind::Status(code),
                }),
                Some(PresetResponse::Malformed) => Err(Error {
                    message: "scripted malformed body",
                    kind: ErrorKind::MalformedResponse,
                }),
                Some(PresetResponse::TransportFailure) => Err(Error {
                    message: "scripted connection failure",
                    kind: ErrorKind::Transport,
                }),
                Some(PresetResponse::Hang) => pending().await,
                None => Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::Status(503),
                }),
            }
        }
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
