//! HTTP mail API notifier
//!
//! Posts `{from, to, subject, text}` as JSON with a bearer API key. Any
//! transport error or non-2xx answer fails the send.

use super::{Notifier, NotifyError, ResetLinkMessage};
use crate::config::MailConfig;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Notifier backed by an HTTP mail API
#[derive(Clone)]
pub struct HttpMailNotifier {
    client: Client,
    api_url: String,
    api_key: SecretString,
    from_address: String,
}

impl HttpMailNotifier {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), NotifyError> {
        let payload = MailPayload {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.reset_url,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Mail API request failed");
                NotifyError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Mail API rejected reset link");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(to_email = %message.to, "Reset link accepted by mail API");
        Ok(())
    }
}
