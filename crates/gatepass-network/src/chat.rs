//! Chat webhook notifier.
//!
//! Messages are posted as JSON to a chat webhook. TLS is pinned to
//! [`GTS_ROOT_R4_PEM`] by default: built-in roots are disabled and plain
//! `http` is refused.

use std::time::Duration;

use gatepass_core::Embed;
use gatepass_core::constants::WEBHOOK_TIMEOUT_MS;
use reqwest::redirect;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::certs::GTS_ROOT_R4_PEM;
use crate::error::{NetworkError, check_url};
use crate::traits::ChatSink;

/// One chat message: text, optionally with a rich card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub content: String,
    pub embed: Option<Embed>,
}

impl ChatMessage {
    /// Plain-text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }

    /// Card-only message.
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: String::new(),
            embed: Some(embed),
        }
    }
}

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    pub tts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
}

impl WebhookPayload {
    pub fn from_message(message: &ChatMessage, tts: bool) -> Self {
        Self {
            content: message.content.clone(),
            tts,
            embeds: message.embed.clone().map(|embed| vec![embed]),
        }
    }
}

/// Result of one webhook post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The service answered 200 or 204.
    Delivered,
    /// The service answered with any other status.
    Rejected(u16),
    /// No HTTP response: connection, TLS or timeout failure.
    Failed,
}

impl Delivery {
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Configuration for [`ChatNotifier`].
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,

    /// Ask the chat client to read messages aloud.
    pub tts: bool,

    pub timeout: Duration,

    /// Only root trusted for the webhook connection. `None` falls back to
    /// the platform roots and allows plain `http`.
    pub root_certificate: Option<String>,
}

impl WebhookConfig {
    /// Pinned configuration for `url`.
    pub fn new(url: impl Into<String>, tts: bool) -> Self {
        Self {
            url: url.into(),
            tts,
            timeout: Duration::from_millis(WEBHOOK_TIMEOUT_MS),
            root_certificate: Some(GTS_ROOT_R4_PEM.to_string()),
        }
    }

    /// Drop certificate pinning.
    pub fn unpinned(mut self) -> Self {
        self.root_certificate = None;
        self
    }
}

/// Posts [`ChatMessage`]s to a webhook.
#[derive(Debug, Clone)]
pub struct ChatNotifier {
    client: reqwest::Client,
    url: String,
    tts: bool,
}

impl ChatNotifier {
    /// Build a notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable, the pinned certificate is
    /// not valid PEM, or the client cannot be built.
    pub fn new(config: WebhookConfig) -> Result<Self, NetworkError> {
        check_url(&config.url)?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none());

        if let Some(pem) = &config.root_certificate {
            let certificate = reqwest::Certificate::from_pem(pem.as_bytes())
                .map_err(|e| NetworkError::Certificate(e.to_string()))?;
            builder = builder
                .tls_built_in_root_certs(false)
                .add_root_certificate(certificate)
                .https_only(true);
            debug!("Webhook TLS pinned to a single root");
        } else {
            warn!("Webhook TLS pinning disabled");
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url,
            tts: config.tts,
        })
    }
}

impl ChatSink for ChatNotifier {
    async fn send(&self, message: &ChatMessage) -> Delivery {
        let payload = WebhookPayload::from_message(message, self.tts);

        let response = match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Webhook post failed: {}", e);
                return Delivery::Failed;
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match status {
            200 | 204 => {
                info!("Webhook message delivered - HTTP {}", status);
                Delivery::Delivered
            }
            _ => {
                warn!("Webhook rejected message - HTTP {}: {}", status, body);
                Delivery::Rejected(status)
            }
        }
    }
}
