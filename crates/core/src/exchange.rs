//! One request/response cycle with the discussion partner.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use partner_chat_model::{
    ErrorKind, ModelCompletion, ModelProviderError, ModelRequest,
};
use rand::Rng;
use tokio::time::{sleep, timeout};

use crate::config::ChatConfig;
use crate::model_client::ModelClient;
use crate::transcript::Turn;

/// The notice shown to the participant when an exchange fails.
pub const FAILURE_NOTICE: &str =
    "Error communicating with the discussion partner. Please try again.";

const PARTNER_LABEL: &str = "AI:";

/// What to send for one exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExchangeRequest {
    /// The system instructions, the same for the whole session.
    pub system_prompt: String,
    /// The single user message of this request.
    pub user_prompt: String,
}

/// Why an exchange produced no reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeError {
    /// The completion provider failed: transport error, non-success
    /// status, unusable body, or an exceeded time limit.
    ProviderFailure {
        /// What went wrong.
        kind: ErrorKind,
        /// Details for the logs.
        message: String,
    },
}

impl ExchangeError {
    /// Returns the provider error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::ProviderFailure { kind, .. } => *kind,
        }
    }

    /// Returns the text to show the participant.
    #[inline]
    pub fn notice(&self) -> &'static str {
        FAILURE_NOTICE
    }

    fn from_provider(err: Box<dyn ModelProviderError>) -> Self {
        ExchangeError::ProviderFailure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    fn timed_out(limit: Duration) -> Self {
        ExchangeError::ProviderFailure {
            kind: ErrorKind::TimedOut,
            message: format!("no response within {limit:?}"),
        }
    }
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::ProviderFailure { kind, message } => {
                write!(f, "provider failure ({kind}): {message}")
            }
        }
    }
}

impl Error for ExchangeError {}

/// Removes leading `AI:` labels, and the whitespace after each, from a
/// model reply.
///
/// The label match is case-insensitive. Nothing after the labels is
/// touched, and text without a label is returned as is.
pub fn strip_partner_label(text: &str) -> &str {
    let mut rest = text;
    while let Some(prefix) = rest.get(..PARTNER_LABEL.len()) {
        if !prefix.eq_ignore_ascii_case(PARTNER_LABEL) {
            break;
        }
        rest = rest[PARTNER_LABEL.len()..].trim_start();
    }
    rest
}

/// Runs one exchange: waits the simulated response time, sends one
/// request and turns the completion into a partner turn.
///
/// The caller owns the transcript; nothing here touches it.
///
/// # Cancel safety
///
/// Dropping the future at any point abandons the exchange. This is how a
/// session teardown cancels the simulated delay.
pub async fn run_exchange(
    client: &ModelClient,
    config: &ChatConfig,
    request: ExchangeRequest,
) -> Result<Turn, ExchangeError> {
    let delay = sample_delay(config.typing_delay_min, config.typing_delay_max);
    debug!("simulating partner latency of {delay:?}");
    sleep(delay).await;

    let ExchangeRequest {
        system_prompt,
        user_prompt,
    } = request;
    let model_req =
        ModelRequest::with_system_and_user(system_prompt, user_prompt);
    let completion = send_with_retries(client, config, model_req).await?;
    Ok(Turn::partner(strip_partner_label(&completion.content)))
}

async fn send_with_retries(
    client: &ModelClient,
    config: &ChatConfig,
    req: ModelRequest,
) -> Result<ModelCompletion, ExchangeError> {
    let mut backoff = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_secs(1))
        .with_max_elapsed_time(None)
        .build();
    let mut attempt = 0;
    loop {
        let err =
            match send_once(client, config.request_timeout, req.clone()).await {
                Ok(completion) => return Ok(completion),
                Err(err) => err,
            };
        if attempt >= config.max_retries {
            return Err(err);
        }
        attempt += 1;
        let wait = backoff.next_backoff().unwrap_or(Duration::from_secs(1));
        warn!("exchange attempt failed ({err}), retry {attempt} in {wait:?}");
        sleep(wait).await;
    }
}

async fn send_once(
    client: &ModelClient,
    limit: Option<Duration>,
    req: ModelRequest,
) -> Result<ModelCompletion, ExchangeError> {
    let fut = client.send_request(req);
    let result = match limit {
        Some(limit) => match timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => return Err(ExchangeError::timed_out(limit)),
        },
        None => fut.await,
    };
    result.map_err(ExchangeError::from_provider)
}

fn sample_delay(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}

#[cfg(test)]
mod tests {
    use partner_chat_model::ModelMessage;
    use partner_chat_test_model::{PresetResponse, TestModelProvider};
    use tokio::time::Instant;

    use super::*;

    fn request() -> ExchangeRequest {
        ExchangeRequest {
            system_prompt: "You are a discussion partner.".to_owned(),
            user_prompt: "I was angry at my landlord.".to_owned(),
        }
    }

    #[test]
    fn test_strip_partner_label() {
        assert_eq!(strip_partner_label("AI: Hello"), "Hello");
        assert_eq!(strip_partner_label("ai:\n\tHello"), "Hello");
        assert_eq!(strip_partner_label("Ai:Hello"), "Hello");
        assert_eq!(strip_partner_label("Hello"), "Hello");
        assert_eq!(strip_partner_label(""), "");
        assert_eq!(strip_partner_label("AI"), "AI");
        assert_eq!(strip_partner_label("AIR: on"), "AIR: on");
        assert_eq!(strip_partner_label(" AI: leading space"), " AI: leading space");
        assert_eq!(
            strip_partner_label("AI: Use AI: wisely.  "),
            "Use AI: wisely.  "
        );
        assert_eq!(strip_partner_label("é AI:"), "é AI:");
    }

    #[test]
    fn test_strip_partner_label_is_idempotent() {
        for input in [
            "AI: AI: twice",
            "ai:AI:  x",
            "plain",
            "AI:",
            "AI:   ",
            "Über AI: label",
        ] {
            let once = strip_partner_label(input);
            assert_eq!(strip_partner_label(once), once, "{input:?}");
        }
    }

    #[test]
    fn test_sample_delay_bounds() {
        let min = Duration::from_secs(30);
        let max = Duration::from_secs(50);
        for _ in 0..100 {
            let delay = sample_delay(min, max);
            assert!(delay >= min && delay <= max, "{delay:?}");
        }
        assert_eq!(sample_delay(max, max), max);
        assert_eq!(sample_delay(Duration::ZERO, Duration::ZERO), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_exchange() {
        let provider = TestModelProvider::default();
        provider.add_reply("AI: That sounds frustrating.");
        let client = ModelClient::new(provider.clone());

        let started = Instant::now();
        let turn = run_exchange(&client, &ChatConfig::default(), request())
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert_eq!(turn, Turn::partner("That sounds frustrating."));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].messages,
            vec![
                ModelMessage::System("You are a discussion partner.".to_owned()),
                ModelMessage::User("I was angry at my landlord.".to_owned()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_retried_by_default() {
        for preset in [
            PresetResponse::Status(500),
            PresetResponse::Malformed,
            PresetResponse::TransportFailure,
        ] {
            let provider = TestModelProvider::default();
            provider.add_response(preset.clone());
            provider.add_reply("never sent");
            let client = ModelClient::new(provider.clone());

            let err = run_exchange(&client, &ChatConfig::default(), request())
                .await
                .unwrap_err();
            assert!(
                matches!(err, ExchangeError::ProviderFailure { .. }),
                "{preset:?}"
            );
            assert_eq!(err.notice(), FAILURE_NOTICE);
            assert_eq!(provider.requests().len(), 1);
            assert_eq!(provider.remaining(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_is_reported() {
        let provider = TestModelProvider::default();
        provider.add_response(PresetResponse::Status(500));
        let client = ModelClient::new(provider);
        let err = run_exchange(&client, &ChatConfig::default(), request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_opt_in_retry() {
        let provider = TestModelProvider::default();
        provider.add_response(PresetResponse::Status(502));
        provider.add_reply("Second time lucky.");
        let client = ModelClient::new(provider.clone());

        let config = ChatConfig::default().with_max_retries(1);
        let turn = run_exchange(&client, &config, request()).await.unwrap();
        assert_eq!(turn.text(), "Second time lucky.");
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_opt_in_timeout() {
        let provider = TestModelProvider::default();
        provider.add_response(PresetResponse::Hang);
        let client = ModelClient::new(provider);

        let config = ChatConfig::default()
            .with_typing_delay(Duration::ZERO, Duration::ZERO)
            .with_request_timeout(Duration::from_secs(20));
        let started = Instant::now();
        let err = run_exchange(&client, &config, request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
        assert!(started.elapsed() >= Duration::from_secs(20));
    }
}
