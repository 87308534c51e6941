use crate::{Result, error::Error};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{self, Write as _};
use subtle::ConstantTimeEq;

/// Normalized badge identifier.
///
/// The textual form is uppercase hexadecimal, one zero-padded byte per
/// token, tokens separated by single spaces (`[0x0A, 0xFF]` → `"0A FF"`).
/// Directory records are keyed by exactly this representation, so every
/// scanned card must go through [`BadgeUid::from_bytes`] before lookup.
///
/// # Security
/// Equality is evaluated in constant time so that lookups do not leak how
/// many leading characters of a badge matched.
#[derive(Debug, Clone, Eq, Serialize)]
#[serde(transparent)]
pub struct BadgeUid(String);

impl BadgeUid {
    /// Format raw card identifier bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepass_core::BadgeUid;
    ///
    /// assert_eq!(BadgeUid::from_bytes(&[0x0A, 0xFF]).as_str(), "0A FF");
    /// assert_eq!(BadgeUid::from_bytes(&[0x04, 0xAB, 0x1C, 0x9D]).as_str(), "04 AB 1C 9D");
    /// ```
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut formatted = String::with_capacity(bytes.len() * 3);
        for byte in bytes {
            // Writing into a String cannot fail
            let _ = write!(formatted, " {byte:02X}");
        }
        BadgeUid(formatted.trim().to_string())
    }

    /// Get the badge identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a directory key without short-circuiting.
    #[must_use]
    pub fn matches(&self, badge_id: &str) -> bool {
        self.0.as_bytes().ct_eq(badge_id.as_bytes()).into()
    }
}

impl fmt::Display for BadgeUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses either the spaced form (`"0a ff"`) or a compact hex string
/// (`"0AFF"`) and re-formats it, so parsing a formatted badge is a no-op.
impl std::str::FromStr for BadgeUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(BadgeUid::from_bytes(&parse_uid_bytes(s)?))
    }
}

impl PartialEq for BadgeUid {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl std::hash::Hash for BadgeUid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Parse hexadecimal card bytes typed by an operator or stored in fixtures.
///
/// # Errors
/// Returns `Error::InvalidBadge` when the input is empty, has an odd number
/// of compact digits, or contains a token that is not one hex byte.
pub fn parse_uid_bytes(input: &str) -> Result<Vec<u8>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidBadge("empty identifier".to_string()));
    }

    let tokens: Vec<&str> = if input.contains(char::is_whitespace) {
        input.split_whitespace().collect()
    } else {
        if input.len() % 2 != 0 || !input.is_ascii() {
            return Err(Error::InvalidBadge(format!(
                "compact identifier must have an even number of hex digits: {input}"
            )));
        }
        (0..input.len()).step_by(2).map(|i| &input[i..i + 2]).collect()
    };

    tokens
        .into_iter()
        .map(|token| {
            if token.len() > 2 {
                return Err(Error::InvalidBadge(format!("`{token}` is not a single byte")));
            }
            u8::from_str_radix(token, 16)
                .map_err(|_| Error::InvalidBadge(format!("`{token}` is not hexadecimal")))
        })
        .collect()
}

/// One authorization decision, reported to the attendance backend.
///
/// Serializes to the backend's wire shape `{"uid": ..., "access_granted": ...}`.
/// The timestamp stays local; the backend stamps rows on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEvent {
    #[serde(rename = "uid")]
    pub badge_id: BadgeUid,

    #[serde(rename = "access_granted")]
    pub authorized: bool,

    #[serde(skip)]
    pub timestamp: DateTime<Utc>,
}

impl ScanEvent {
    /// Record a decision taken now.
    pub fn new(badge_id: BadgeUid, authorized: bool) -> Self {
        Self {
            badge_id,
            authorized,
            timestamp: Utc::now(),
        }
    }
}
