use thiserror::Error;

/// Errors raised while constructing network clients.
///
/// Individual requests never return these; they log and degrade instead.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The pinned root certificate is not valid PEM.
    #[error("Invalid pinned certificate: {0}")]
    Certificate(String),

    /// An endpoint URL is unusable.
    #[error("Invalid endpoint URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl NetworkError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reject anything that is not an absolute http(s) URL.
pub(crate) fn check_url(url: &str) -> Result<(), NetworkError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| NetworkError::invalid_url(url, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(NetworkError::invalid_url(
            url,
            format!("unsupported scheme `{other}`"),
        )),
    }
}
