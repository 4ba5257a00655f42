// ── Provider ──
//
// Owns the authenticated JSON-RPC client for one FortiManager and the
// engine built on it. Lifecycle: `connect` → engine operations →
// `disconnect`.

use fortiform_api::JsonRpcClient;
use tracing::{info, warn};

use crate::config::{AuthCredentials, ProviderConfig};
use crate::engine::Engine;
use crate::error::CoreError;

pub struct Provider {
    config: ProviderConfig,
    engine: Engine<JsonRpcClient>,
}

impl Provider {
    /// Build the client and authenticate. Session auth logs in here; token
    /// auth needs no round-trip.
    pub async fn connect(config: ProviderConfig) -> Result<Self, CoreError> {
        let transport = config.transport();

        let client = match &config.auth {
            AuthCredentials::Session { .. } => JsonRpcClient::new(&config.url, &transport)?,
            AuthCredentials::Token(token) => {
                JsonRpcClient::with_token(&config.url, token, &transport)?
            }
        }
        .with_retries(config.retries);

        if let AuthCredentials::Session { username, password } = &config.auth {
            client.login(username, password).await?;
        }

        let mut engine = Engine::new(client);
        if config.workspace_mode {
            engine = engine.with_workspace(config.adom.clone());
        }

        info!(url = %config.url, workspace = config.workspace_mode, "connected");
        Ok(Self { config, engine })
    }

    pub fn engine(&self) -> &Engine<JsonRpcClient> {
        &self.engine
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// End the session. Logout failures are logged, not returned.
    pub async fn disconnect(self) {
        if let Err(e) = self.engine.client().logout().await {
            warn!(error = %e, "logout failed");
        }
    }
}
