//! Reset link delivery
//!
//! The auth service hands a `ResetLinkMessage` to a `Notifier` and treats any
//! error as a failed operation. Notifiers do not retry.
//!
//! - `LogNotifier` logs the delivery without the token (local development).
//! - `HttpMailNotifier` posts the message to an HTTP mail API.
//! - `MemoryNotifier` records messages for tests.

mod http;

pub use http::HttpMailNotifier;

use crate::config::{MailConfig, MailProvider};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Delivery failure
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Mail API rejected the message: {status}")]
    Rejected { status: u16 },
}

/// A password reset link addressed to one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetLinkMessage {
    pub to: String,
    pub subject: String,
    pub reset_url: String,
}

/// Outbound notification port
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), NotifyError>;
}

/// Build the notifier selected by configuration
pub fn from_config(config: &MailConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    Ok(match config.provider {
        MailProvider::Log => Arc::new(LogNotifier),
        MailProvider::Http => Arc::new(HttpMailNotifier::new(config)?),
    })
}

/// Local dev notifier that logs the link instead of sending it
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), NotifyError> {
        info!(
            to_email = %message.to,
            subject = %message.subject,
            "Reset link logged (mail delivery disabled)"
        );
        debug!(reset_url = %redact_token(&message.reset_url), "Reset link without token");
        Ok(())
    }
}

/// Replace the trailing token segment of a reset URL
fn redact_token(url: &str) -> String {
    match url.rsplit_once('/') {
        Some((base, _token)) => format!("{}/<redacted>", base),
        None => "<redacted>".to_string(),
    }
}

/// Notifier that keeps every message in memory
///
/// `failing()` builds one that rejects every send.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<ResetLinkMessage>>,
    fail: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages delivered so far
    pub async fn sent(&self) -> Vec<ResetLinkMessage> {
        self.sent.lock().await.clone()
    }

    /// Most recent message, if any
    pub async fn last(&self) -> Option<ResetLinkMessage> {
        self.sent.lock().await.last().cloned()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("connection refused".to_string()));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
