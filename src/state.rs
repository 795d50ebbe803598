use std::sync::Arc;

use crate::config::Config;
use crate::store::{MemoryStore, Store};

/// Shared per-request context: config plus the storage handle.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(AppState {
            store: Arc::new(MemoryStore::new()),
            config,
        })
    }
}

/// Fresh state with demo OTP echoing on, for tests.
#[cfg(test)]
pub fn test_state() -> Arc<AppState> {
    AppState::new(Config {
        port: 0,
        ping_message: "ping".to_string(),
        insecure_demo_otp: true,
    })
}
