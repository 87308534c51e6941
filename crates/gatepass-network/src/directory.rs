//! Directory download from the spreadsheet backend.
//!
//! # Redirects
//!
//! The backend answers reads with a redirect to a content host. Redirects
//! are followed strictly: at most [`MAX_REDIRECTS`] hops and only to `https`
//! targets, so a compromised hop cannot steer the terminal to a plaintext
//! host. A refused redirect is a transport failure like any other.

use std::time::Duration;

use gatepass_core::constants::{DIRECTORY_TIMEOUT_MS, MAX_REDIRECTS};
use reqwest::{Url, redirect};
use tracing::{debug, error, info};

use crate::error::{NetworkError, check_url};
use crate::traits::DirectorySource;

/// Configuration for [`DirectoryClient`].
#[derive(Debug, Clone)]
pub struct DirectoryClientConfig {
    /// Full read URL, including the read query marker.
    pub url: String,

    /// Timeout for the whole request, redirects included.
    pub timeout: Duration,
}

impl DirectoryClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(DIRECTORY_TIMEOUT_MS),
        }
    }
}

/// HTTP client for the directory endpoint.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    url: String,
}

impl DirectoryClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute http(s) or the HTTP
    /// client cannot be constructed.
    pub fn new(config: DirectoryClientConfig) -> Result<Self, NetworkError> {
        check_url(&config.url)?;
        debug!("Creating directory client for {}", config.url);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(strict_redirects())
            .build()?;

        Ok(Self {
            client,
            url: config.url,
        })
    }
}

impl DirectorySource for DirectoryClient {
    async fn fetch_raw(&self) -> String {
        info!("Fetching UID database...");

        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Database request failed: {}", e);
                return String::new();
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => {
                info!("Database request completed - HTTP {}", status.as_u16());
                body
            }
            Err(e) => {
                error!("Database response unreadable (HTTP {}): {}", status.as_u16(), e);
                String::new()
            }
        }
    }
}

/// Follow at most [`MAX_REDIRECTS`] hops, and only to `https` targets.
fn strict_redirects() -> redirect::Policy {
    redirect::Policy::custom(|attempt| match redirect_refusal(attempt.url(), attempt.previous()) {
        Some(reason) => attempt.error(reason),
        None => attempt.follow(),
    })
}

/// Why a redirect to `target` must not be followed, if it must not.
///
/// `previous` holds every URL already requested, the original one included,
/// so its length is the number of the hop being considered.
fn redirect_refusal(target: &Url, previous: &[Url]) -> Option<String> {
    if previous.len() > MAX_REDIRECTS {
        Some(format!("more than {MAX_REDIRECTS} redirects"))
    } else if target.scheme() != "https" {
        Some(format!("refusing redirect to non-https {target}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_config_defaults() {
        let config = DirectoryClientConfig::new("https://script.google.com/macros/s/id/exec?read");
        assert_eq!(config.timeout, Duration::from_millis(DIRECTORY_TIMEOUT_MS));
    }

    fn hops(count: usize) -> Vec<Url> {
        (0..count)
            .map(|i| Url::parse(&format!("https://script.googleusercontent.com/hop/{i}")).unwrap())
            .collect()
    }

    #[rstest]
    #[case(1)]
    #[case(MAX_REDIRECTS)]
    fn test_redirect_followed_within_limit(#[case] hop: usize) {
        let target = Url::parse("https://script.googleusercontent.com/macros/echo").unwrap();
        assert_eq!(redirect_refusal(&target, &hops(hop)), None);
    }

    #[test]
    fn test_redirect_refused_past_limit() {
        let target = Url::parse("https://script.googleusercontent.com/macros/echo").unwrap();
        let reason = redirect_refusal(&target, &hops(MAX_REDIRECTS + 1)).unwrap();
        assert_eq!(reason, "more than 5 redirects");
    }

    #[test]
    fn test_redirect_refused_to_plain_http() {
        let target = Url::parse("http://script.googleusercontent.com/macros/echo").unwrap();
        let reason = redirect_refusal(&target, &hops(1)).unwrap();
        assert!(reason.starts_with("refusing redirect to non-https"));
    }

    #[test]
    fn test_rejects_bad_url() {
        let result = DirectoryClient::new(DirectoryClientConfig::new("script.google.com/exec"));
        assert!(matches!(result, Err(NetworkError::InvalidUrl { .. })));
    }
}
