use std::sync::Arc;

use crate::auth::{IdentityProvider, OAuthConfig};
use crate::database::PersonStore;

/// Shared handles injected into every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersonStore>,
    pub oauth: Arc<OAuthConfig>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PersonStore>,
        oauth: OAuthConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            oauth: Arc::new(oauth),
            provider,
        }
    }
}
