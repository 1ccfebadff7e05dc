//! A model provider for OpenAI-compatible chat completion APIs.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use partner_chat_model::{
    ErrorKind, ModelCompletion, ModelProvider, ModelProviderError,
    ModelRequest,
};
use reqwest::{Client, header};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use proto::ChatCompletion;

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelCompletion, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(self.config.endpoint())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::ACCEPT, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(
                        format!("{err}"),
                        ErrorKind::Transport,
                    ));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::new(
                    format!("API request failed: {status}"),
                    ErrorKind::Status(status.as_u16()),
                ));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            if let Some(content_type) = &content_type {
                if !is_json_content_type(content_type) {
                    return Err(Error::new(
                        format!("Unexpected content type: {content_type}"),
                        ErrorKind::MalformedResponse,
                    ));
                }
            }

            let body = resp.bytes().await.map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;
            parse_completion(&body)
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .parse()
        .map(|m: Mime| {
            m.type_() == mime::APPLICATION
                && (m.subtype() == mime::JSON
                    || m.suffix() == Some(mime::JSON))
        })
        .unwrap_or(false)
}

fn parse_completion(body: &[u8]) -> Result<ModelCompletion, Error> {
    let completion = serde_json::from_slice::<ChatCompletion>(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::MalformedResponse))?;
    trace!("got completion: {:?}", completion.id);
    let Some(content) = completion.into_first_content() else {
        return Err(Error::new(
            "response has no completion content",
            ErrorKind::MalformedResponse,
        ));
    };
    Ok(ModelCompletion::new(content))
}
