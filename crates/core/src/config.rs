//! Session tunables and per-session inputs.

use std::time::Duration;

use crate::host::HostPlatform;

/// Embedded-data key holding the recalled incident.
pub const INCIDENT_KEY: &str = "userRecallIncident";
/// Embedded-data key holding the discussion-partner identifier.
pub const PARTNER_ID_KEY: &str = "chatbotName";
/// Embedded-data key holding the discussion-partner condition.
pub const PARTNER_KIND_KEY: &str = "chatbotType";
/// Embedded-data key holding the participant's preferred name.
pub const PARTICIPANT_NAME_KEY: &str = "UserPreferredName";

/// Inputs resolved once when a session starts. Never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionConfig {
    /// Selects the system prompt, e.g. `host1`.
    pub partner_id: String,
    /// The experimental condition, carried for the logs.
    pub partner_kind: String,
    /// How the participant wants to be called.
    pub participant_name: String,
    /// The recalled incident that seeds the conversation.
    pub initial_incident: String,
    /// Turns in the transcript before the participant types anything.
    pub initial_turn_count: usize,
}

impl SessionConfig {
    /// Reads the inputs from the host. Missing values become empty
    /// strings.
    pub fn from_platform(platform: &dyn HostPlatform) -> Self {
        let read = |key: &str| {
            platform.embedded_data(key).unwrap_or_else(|| {
                warn!("embedded data {key:?} is not set");
                String::new()
            })
        };
        Self {
            partner_id: read(PARTNER_ID_KEY),
            partner_kind: read(PARTNER_KIND_KEY),
            participant_name: read(PARTICIPANT_NAME_KEY),
            initial_incident: read(INCIDENT_KEY),
            initial_turn_count: 1,
        }
    }
}

/// Timing of the "partner is typing" animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypingAnimation {
    /// How long the indicator stays hidden after an exchange begins.
    pub appear_after: Duration,
    /// Interval between ellipsis steps.
    pub dots_tick: Duration,
    /// How long the indicator stays visible in each blink cycle.
    pub visible_for: Duration,
    /// How long the indicator stays hidden in each blink cycle.
    pub hidden_for: Duration,
}

impl Default for TypingAnimation {
    fn default() -> Self {
        Self {
            appear_after: Duration::from_secs(3),
            dots_tick: Duration::from_millis(500),
            visible_for: Duration::from_secs(7),
            hidden_for: Duration::from_secs(2),
        }
    }
}

/// Configuration shared by every exchange of a session.
///
/// The defaults reproduce the research protocol: ten-word replies, a
/// 30 to 50 second simulated response time, release after four messages,
/// no request timeout and no retries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatConfig {
    pub(crate) min_word_count: usize,
    pub(crate) typing_delay_min: Duration,
    pub(crate) typing_delay_max: Duration,
    pub(crate) exit_threshold: u32,
    pub(crate) typing_animation: TypingAnimation,
    pub(crate) transcript_key: String,
    pub(crate) opening_reply: bool,
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) max_retries: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            min_word_count: 10,
            typing_delay_min: Duration::from_secs(30),
            typing_delay_max: Duration::from_secs(50),
            exit_threshold: 4,
            typing_animation: TypingAnimation::default(),
            transcript_key: "chatHistory".to_owned(),
            opening_reply: true,
            request_timeout: None,
            max_retries: 0,
        }
    }
}

impl ChatConfig {
    /// Sets the minimum number of words a participant message must have.
    #[inline]
    pub fn with_min_word_count(mut self, words: usize) -> Self {
        self.min_word_count = words;
        self
    }

    /// Sets the interval the simulated response delay is drawn from.
    ///
    /// The bounds are swapped if given in the wrong order.
    #[inline]
    pub fn with_typing_delay(mut self, min: Duration, max: Duration) -> Self {
        self.typing_delay_min = min.min(max);
        self.typing_delay_max = min.max(max);
        self
    }

    /// Sets how many accepted participant messages release the exit gate.
    #[inline]
    pub fn with_exit_threshold(mut self, messages: u32) -> Self {
        self.exit_threshold = messages;
        self
    }

    /// Sets the typing indicator timing.
    #[inline]
    pub fn with_typing_animation(mut self, animation: TypingAnimation) -> Self {
        self.typing_animation = animation;
        self
    }

    /// Sets the embedded-data key the transcript is written to.
    #[inline]
    pub fn with_transcript_key<S: Into<String>>(mut self, key: S) -> Self {
        self.transcript_key = key.into();
        self
    }

    /// Controls whether the partner answers the seeded incident before the
    /// participant writes anything.
    #[inline]
    pub fn with_opening_reply(mut self, enabled: bool) -> Self {
        self.opening_reply = enabled;
        self
    }

    /// Bounds each provider request. Off by default, since the simulated
    /// latency is part of the protocol and a timeout changes it.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Retries failed provider requests up to `retries` extra times with
    /// exponential backoff. Off by default.
    #[inline]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Returns the minimum word count.
    #[inline]
    pub fn min_word_count(&self) -> usize {
        self.min_word_count
    }

    /// Returns the exit threshold.
    #[inline]
    pub fn exit_threshold(&self) -> u32 {
        self.exit_threshold
    }

    /// Returns the embedded-data key for the transcript.
    #[inline]
    pub fn transcript_key(&self) -> &str {
        &self.transcript_key
    }
}
