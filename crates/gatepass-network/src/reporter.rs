//! Scan reporting to the spreadsheet backend.

use std::time::Duration;

use gatepass_core::ScanEvent;
use gatepass_core::constants::REPORT_TIMEOUT_MS;
use reqwest::header::ACCEPT;
use reqwest::redirect;
use tracing::{debug, info, warn};

use crate::error::{NetworkError, check_url};
use crate::traits::ScanSink;

/// Configuration for [`ScanReporter`].
#[derive(Debug, Clone)]
pub struct ScanReporterConfig {
    /// Report URL (the backend's `exec` endpoint).
    pub url: String,
    pub timeout: Duration,
}

impl ScanReporterConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(REPORT_TIMEOUT_MS),
        }
    }
}

/// Posts one JSON document per scan.
///
/// Redirects on the POST are never followed; the backend records the row
/// before redirecting, so the first response is all the terminal needs.
#[derive(Debug, Clone)]
pub struct ScanReporter {
    client: reqwest::Client,
    url: String,
}

impl ScanReporter {
    /// Build a reporter for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client cannot be built.
    pub fn new(config: ScanReporterConfig) -> Result<Self, NetworkError> {
        check_url(&config.url)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            url: config.url,
        })
    }
}

impl ScanSink for ScanReporter {
    async fn report(&self, event: &ScanEvent) {
        debug!(
            "Reporting scan uid={} access_granted={}",
            event.badge_id, event.authorized
        );

        let result = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(event)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain so the connection is released before returning
                let _ = response.bytes().await;
                info!("Scan reported - HTTP {}", status);
            }
            Err(e) => warn!("Scan report for {} failed: {}", event.badge_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ScanReporterConfig::new("https://script.google.com/macros/s/id/exec");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let result = ScanReporter::new(ScanReporterConfig::new("mailto:ops@example.com"));
        assert!(matches!(result, Err(NetworkError::InvalidUrl { .. })));
    }
}
