//! Authorized badge directory.
//!
//! The directory is downloaded once at boot as a JSON array and held in
//! memory for the lifetime of the process. It is only ever replaced as a
//! whole, so a scan can never observe a half-loaded list.
//!
//! # Wire format
//!
//! ```json
//! [
//!   {"uid": "0A FF", "dlsu_id": "12012345", "name": "Jane Doe", "discord_username": "jane"}
//! ]
//! ```
//!
//! Individual record fields are best-effort: a missing or non-string field
//! becomes an empty string and is logged, it does not reject the batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::constants::PARSE_EXCERPT_RADIUS;
use crate::{BadgeUid, Error, Result};

/// One authorized badge holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    /// Badge identifier in normalized form (`"0A FF"`).
    #[serde(rename = "uid")]
    pub badge_id: String,

    /// Institutional identifier (student or staff number).
    #[serde(rename = "dlsu_id")]
    pub external_id: String,

    /// Name shown on the display and in chat.
    #[serde(rename = "name")]
    pub display_name: String,

    /// Chat handle mentioned in notifications, without the `@`.
    #[serde(rename = "discord_username")]
    pub chat_handle: String,
}

impl DirectoryRecord {
    pub fn new(
        badge_id: impl Into<String>,
        external_id: impl Into<String>,
        display_name: impl Into<String>,
        chat_handle: impl Into<String>,
    ) -> Self {
        Self {
            badge_id: badge_id.into(),
            external_id: external_id.into(),
            display_name: display_name.into(),
            chat_handle: chat_handle.into(),
        }
    }

    fn from_value(index: usize, value: &Value) -> Self {
        let field = |key: &str| match value.get(key) {
            Some(Value::String(s)) => s.clone(),
            other => {
                warn!("Record {} has no string `{}` (got {:?})", index, key, other);
                String::new()
            }
        };

        Self {
            badge_id: field("uid"),
            external_id: field("dlsu_id"),
            display_name: field("name"),
            chat_handle: field("discord_username"),
        }
    }
}

/// Parse a raw directory response.
///
/// The body must be non-empty, start with `[`, end with `]` and be valid
/// JSON. An empty array is *not* an error here; callers decide whether zero
/// records is acceptable.
///
/// # Errors
///
/// - `Error::MalformedDirectory` if the body is not bracketed like an array
/// - `Error::DirectoryParse` if the JSON is invalid, with the failure
///   position and the surrounding text
///
/// # Examples
///
/// ```
/// use gatepass_core::parse_directory;
///
/// let records = parse_directory(r#"[{"uid":"0A FF","dlsu_id":"1","name":"Jane Doe","discord_username":"jane"}]"#).unwrap();
/// assert_eq!(records[0].display_name, "Jane Doe");
///
/// assert!(parse_directory("[]").unwrap().is_empty());
/// assert!(parse_directory("not json").is_err());
/// ```
pub fn parse_directory(raw: &str) -> Result<Vec<DirectoryRecord>> {
    if raw.is_empty() || !raw.starts_with('[') || !raw.ends_with(']') {
        return Err(Error::MalformedDirectory {
            length: raw.chars().count(),
        });
    }

    let values: Vec<Value> = serde_json::from_str(raw).map_err(|e| Error::DirectoryParse {
        category: format!("{:?}", e.classify()),
        line: e.line(),
        column: e.column(),
        excerpt: excerpt(raw, e.line(), e.column()),
    })?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(index, value)| DirectoryRecord::from_value(index, value))
        .collect())
}

/// Text around a 1-based line/column position, bounded on both sides.
fn excerpt(raw: &str, line: usize, column: usize) -> String {
    let Some(text) = raw.lines().nth(line.saturating_sub(1)) else {
        return String::new();
    };
    let chars: Vec<char> = text.chars().collect();
    let center = column.saturating_sub(1).min(chars.len());
    let start = center.saturating_sub(PARSE_EXCERPT_RADIUS);
    let end = (center + PARSE_EXCERPT_RADIUS).min(chars.len());
    chars[start..end].iter().collect()
}

/// In-memory list of authorized badges.
///
/// Order is preserved from the download; lookups return the first record
/// whose badge id matches, so duplicates shadow later entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    records: Vec<DirectoryRecord>,
}

impl Directory {
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self { records }
    }

    /// Swap in a freshly loaded record set, returning the previous one.
    pub fn replace(&mut self, records: Vec<DirectoryRecord>) -> Vec<DirectoryRecord> {
        std::mem::replace(&mut self.records, records)
    }

    /// Find the first record for a scanned badge.
    pub fn lookup(&self, uid: &BadgeUid) -> Option<&DirectoryRecord> {
        self.records.iter().find(|record| uid.matches(&record.badge_id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DirectoryRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const JANE: &str = r#"{"uid":"0A FF","dlsu_id":"12012345","name":"Jane Doe","discord_username":"jane"}"#;

    #[test]
    fn test_parse_single_record() {
        let records = parse_directory(&format!("[{JANE}]")).unwrap();
        assert_eq!(
            records,
            vec![DirectoryRecord::new("0A FF", "12012345", "Jane Doe", "jane")]
        );
    }

    #[test]
    fn test_parse_empty_array_is_not_an_error() {
        assert!(parse_directory("[]").unwrap().is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("not json")]
    #[case("{\"uid\":\"0A FF\"}")]
    #[case("[{}")]
    #[case("<html>Moved</html>")]
    fn test_parse_rejects_non_arrays(#[case] raw: &str) {
        assert!(matches!(
            parse_directory(raw),
            Err(Error::MalformedDirectory { .. })
        ));
    }

    #[test]
    fn test_parse_error_carries_position_and_excerpt() {
        let raw = r#"[{"uid":"0A FF","name":"Jane" "dlsu_id":"1"}]"#;
        match parse_directory(raw) {
            Err(Error::DirectoryParse {
                line,
                column,
                excerpt,
                ..
            }) => {
                assert_eq!(line, 1);
                assert!(column > 0);
                assert!(excerpt.contains("Jane"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tolerates_bad_fields() {
        let raw = r#"[{"uid":"01 02 03 04","dlsu_id":12012345,"name":"Juan"}]"#;
        let records = parse_directory(raw).unwrap();
        assert_eq!(records[0].badge_id, "01 02 03 04");
        assert_eq!(records[0].external_id, "");
        assert_eq!(records[0].display_name, "Juan");
        assert_eq!(records[0].chat_handle, "");
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let directory = Directory::new(vec![
            DirectoryRecord::new("0A FF", "1", "First", "first"),
            DirectoryRecord::new("0A FF", "2", "Second", "second"),
        ]);

        let found = directory.lookup(&BadgeUid::from_bytes(&[0x0A, 0xFF])).unwrap();
        assert_eq!(found.display_name, "First");
    }

    #[test]
    fn test_lookup_miss() {
        let directory = Directory::new(vec![DirectoryRecord::new("0A FF", "1", "Jane", "jane")]);
        assert!(directory.lookup(&BadgeUid::from_bytes(&[0x0A, 0xFE])).is_none());
    }

    #[test]
    fn test_replace_swaps_whole_set() {
        let mut directory = Directory::new(vec![DirectoryRecord::new("01", "1", "Old", "old")]);
        let previous = directory.replace(vec![
            DirectoryRecord::new("02", "2", "New", "new"),
            DirectoryRecord::new("03", "3", "Newer", "newer"),
        ]);

        assert_eq!(previous.len(), 1);
        assert_eq!(directory.len(), 2);
        assert!(directory.lookup(&BadgeUid::from_bytes(&[0x01])).is_none());
    }
}
