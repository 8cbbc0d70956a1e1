//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything is built once at startup from `AppConfig`: token keys, the
//! password hasher, the repository and the notifier. Handlers never read
//! secrets from the process environment.

use crate::auth::{PasswordService, TokenService};
use crate::config::AppConfig;
use crate::middleware::RateLimiter;
use crate::notify::{self, Notifier};
use crate::repositories::{PgUserRepository, UserRepository};
use crate::services::{AuthService, ResetLinkSettings};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are designed for cheap cloning across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// User persistence
    pub users: Arc<dyn UserRepository>,
    /// Account operations
    pub auth: AuthService,
    rate_limiter: RateLimiter,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// This pre-computes token keys from the configured secrets, so it
    /// should only be called once at application startup.
    pub fn new(
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
        config: AppConfig,
    ) -> Self {
        let tokens = TokenService::new(
            &config.jwt.session_secret,
            &config.jwt.reset_secret,
            config.jwt.session_token_expiry_secs,
            config.jwt.reset_token_expiry_secs,
        );
        let reset = ResetLinkSettings {
            public_base_url: config.app.public_base_url.clone(),
            subject: config.mail.subject.clone(),
            conceal_unknown_accounts: config.reset.conceal_unknown_accounts,
        };
        let auth = AuthService::new(
            users.clone(),
            notifier,
            PasswordService::new(&config.password),
            tokens,
            reset,
        );

        Self {
            rate_limiter: RateLimiter::new(&config.rate_limit),
            config: Arc::new(config),
            users,
            auth,
            metrics: None,
        }
    }

    /// State backed by Postgres with the notifier selected in `config.mail`
    pub fn with_postgres(pool: PgPool, config: AppConfig) -> anyhow::Result<Self> {
        let notifier = notify::from_config(&config.mail)?;
        Ok(Self::new(
            Arc::new(PgUserRepository::new(pool)),
            notifier,
            config,
        ))
    }

    /// Attach the Prometheus handle that renders `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        self.auth.tokens()
    }

    #[inline]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    #[inline]
    pub fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}
