//! Terminal configuration.
//!
//! Deployed terminals have their secrets baked in at build time
//! (`GATEPASS_*` variables visible to `cargo build`). The same variables set
//! at runtime take precedence, which is how the host build is pointed at a
//! test backend.

use crate::constants::{DIRECTORY_READ_QUERY, SCRIPT_BASE_URL};
use crate::{Error, Result};

const KEY_WIFI_SSID: &str = "GATEPASS_WIFI_SSID";
const KEY_APP_ID: &str = "GATEPASS_APP_ID";
const KEY_SCRIPT_BASE_URL: &str = "GATEPASS_SCRIPT_BASE_URL";
const KEY_WEBHOOK: &str = "GATEPASS_DISCORD_WEBHOOK";
const KEY_TTS: &str = "GATEPASS_DISCORD_TTS";

/// Endpoints and credentials for one terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Access point the terminal joins.
    pub wifi_ssid: String,

    /// Deployment id of the spreadsheet backend script.
    pub app_id: String,

    /// Base URL the deployment id is appended to.
    pub script_base_url: String,

    /// Chat webhook URL.
    pub webhook_url: String,

    /// Whether chat messages are read aloud by the chat client.
    pub tts: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: String::new(),
            app_id: String::new(),
            script_base_url: SCRIPT_BASE_URL.to_string(),
            webhook_url: String::new(),
            tts: false,
        }
    }
}

impl TerminalConfig {
    /// Load from the process environment, falling back to build-time values.
    ///
    /// # Errors
    /// Returns `Error::MissingConfig` when the app id or webhook URL is
    /// unset, and `Error::Config` when the TTS flag is not a boolean.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| build_time(key)))
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::MissingConfig(key.to_string()))
        };

        let tts = match lookup(KEY_TTS) {
            None => false,
            Some(value) => value
                .trim()
                .parse::<bool>()
                .map_err(|_| Error::Config(format!("{KEY_TTS} must be true or false, got {value}")))?,
        };

        Ok(Self {
            wifi_ssid: lookup(KEY_WIFI_SSID).unwrap_or_default(),
            app_id: required(KEY_APP_ID)?,
            script_base_url: lookup(KEY_SCRIPT_BASE_URL)
                .unwrap_or_else(|| SCRIPT_BASE_URL.to_string()),
            webhook_url: required(KEY_WEBHOOK)?,
            tts,
        })
    }

    /// Endpoint that receives scan reports.
    pub fn report_url(&self) -> String {
        format!(
            "{}/{}/exec",
            self.script_base_url.trim_end_matches('/'),
            self.app_id
        )
    }

    /// Endpoint that returns the directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepass_core::TerminalConfig;
    ///
    /// let config = TerminalConfig { app_id: "AKfy".into(), ..Default::default() };
    /// assert_eq!(
    ///     config.directory_url(),
    ///     "https://script.google.com/macros/s/AKfy/exec?read"
    /// );
    /// ```
    pub fn directory_url(&self) -> String {
        format!("{}?{}", self.report_url(), DIRECTORY_READ_QUERY)
    }
}

fn build_time(key: &str) -> Option<String> {
    let value = match key {
        KEY_WIFI_SSID => option_env!("GATEPASS_WIFI_SSID"),
        KEY_APP_ID => option_env!("GATEPASS_APP_ID"),
        KEY_SCRIPT_BASE_URL => option_env!("GATEPASS_SCRIPT_BASE_URL"),
        KEY_WEBHOOK => option_env!("GATEPASS_DISCORD_WEBHOOK"),
        KEY_TTS => option_env!("GATEPASS_DISCORD_TTS"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_complete() {
        let config = TerminalConfig::from_lookup(lookup_from(&[
            (KEY_WIFI_SSID, "EcoArchers"),
            (KEY_APP_ID, "AKfy123"),
            (KEY_WEBHOOK, "https://discord.com/api/webhooks/1/abc"),
            (KEY_TTS, "true"),
        ]))
        .unwrap();

        assert_eq!(config.wifi_ssid, "EcoArchers");
        assert!(config.tts);
        assert_eq!(
            config.report_url(),
            "https://script.google.com/macros/s/AKfy123/exec"
        );
    }

    #[test]
    fn test_missing_app_id() {
        let result = TerminalConfig::from_lookup(lookup_from(&[(KEY_WEBHOOK, "https://x")]));
        assert!(matches!(result, Err(Error::MissingConfig(key)) if key == KEY_APP_ID));
    }

    #[test]
    fn test_blank_webhook_is_missing() {
        let result =
            TerminalConfig::from_lookup(lookup_from(&[(KEY_APP_ID, "id"), (KEY_WEBHOOK, "  ")]));
        assert!(matches!(result, Err(Error::MissingConfig(key)) if key == KEY_WEBHOOK));
    }

    #[test]
    fn test_invalid_tts() {
        let result = TerminalConfig::from_lookup(lookup_from(&[
            (KEY_APP_ID, "id"),
            (KEY_WEBHOOK, "https://x"),
            (KEY_TTS, "yes"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_base_url() {
        let config = TerminalConfig::from_lookup(lookup_from(&[
            (KEY_APP_ID, "id"),
            (KEY_WEBHOOK, "https://x"),
            (KEY_SCRIPT_BASE_URL, "http://127.0.0.1:8080/macros/s/"),
        ]))
        .unwrap();

        assert_eq!(
            config.directory_url(),
            "http://127.0.0.1:8080/macros/s/id/exec?read"
        );
    }
}
