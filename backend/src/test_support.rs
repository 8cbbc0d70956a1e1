//! Shared fixtures for unit tests

use crate::config::AppConfig;
use crate::notify::MemoryNotifier;
use crate::repositories::InMemoryUserRepository;
use crate::state::AppState;
use std::sync::Arc;

/// Config with fast password hashing and no rate limit
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.password.bcrypt_cost = 4;
    config.rate_limit.enabled = false;
    config
}

/// State over an in-memory repository and a recording notifier
pub fn test_state_with(config: AppConfig) -> (AppState, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        notifier.clone(),
        config,
    );
    (state, notifier)
}

pub fn test_state() -> AppState {
    test_state_with(test_config()).0
}
