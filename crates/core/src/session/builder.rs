use std::sync::Arc;

use partner_chat_model::ModelProvider;
use tokio::sync::mpsc;
use tracing::Instrument;

use super::Session;
use super::state::{SessionState, run_session};
use crate::config::ChatConfig;
use crate::host::{ChatSurface, HostPlatform};
use crate::model_client::ModelClient;

/// [`Session`] builder.
pub struct SessionBuilder {
    model_client: ModelClient,
    config: ChatConfig,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl SessionBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            config: ChatConfig::default(),
            on_idle: None,
        }
    }

    /// Replaces the default configuration.
    #[inline]
    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback to be invoked whenever an exchange concludes
    /// and the participant can type again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the session and spawns its driver task on the current
    /// runtime. The session stays idle until [`Session::start`].
    pub fn build(
        self,
        platform: Arc<dyn HostPlatform>,
        surface: Arc<dyn ChatSurface>,
    ) -> Session {
        let Self {
            model_client,
            config,
            on_idle,
        } = self;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state = SessionState::new(
            model_client,
            config,
            platform,
            surface,
            cmd_tx.downgrade(),
            on_idle,
        );
        tokio::spawn(run_session(state, cmd_rx).instrument(debug_span!("session")));
        Session { cmd_tx }
    }
}
