use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::ClientProvider;

/// Router state: loaded configuration and the store client provider.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn ClientProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn ClientProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}
