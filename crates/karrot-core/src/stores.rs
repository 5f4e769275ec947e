//! The set of state modules one client session works with.

use karrot_client::{HttpApiClient, ShareApi};
use std::sync::Arc;

use crate::config::ShareConfig;
use crate::conversations::Conversations;
use crate::errors::CoreError;
use crate::history::History;
use crate::hooks::SessionHooks;
use crate::invitations::Invitations;

/// One instance of every state module, sharing a single API client.
#[derive(Clone)]
pub struct Stores {
    pub conversations: Conversations,
    pub history: History,
    pub invitations: Invitations,
}

impl Stores {
    pub fn new(api: Arc<dyn ShareApi>, hooks: Arc<dyn SessionHooks>) -> Self {
        Self {
            conversations: Conversations::new(Arc::clone(&api)),
            history: History::new(Arc::clone(&api)),
            invitations: Invitations::new(api, hooks),
        }
    }

    /// Builds the modules on top of an HTTP client for the configured server.
    pub fn from_config(
        config: &ShareConfig,
        hooks: Arc<dyn SessionHooks>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let mut client =
            HttpApiClient::new(config.api.base_url.as_str()).with_timeout(config.api.timeout());
        if let Some(token) = &config.api.auth_token {
            client = client.with_auth_token(token.as_str());
        }
        log::info!("Using Karrot API at {}", client.base_url());

        Ok(Self::new(Arc::new(client), hooks))
    }
}
