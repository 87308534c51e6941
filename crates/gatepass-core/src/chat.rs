//! Chat notification templates.
//!
//! Each template produces an [`Embed`]: a titled, coloured card shown by the
//! chat service. The notifier in `gatepass-network` wraps embeds into the
//! webhook payload.

use serde::{Deserialize, Serialize};

/// Title used for every authorized-access message.
pub const AUTHORIZED_TITLE: &str = "✅ [ATTENDANCE RECORDED] Automated Gatepass Message";

/// Title used for access-denied alerts.
pub const DENIED_TITLE: &str = "❌ [ACCESS DENIED] Automated Gatepass Message";

/// Embed colour for arrivals (blue).
pub const COLOR_ARRIVAL: u32 = 0x0099FF;

/// Embed colour for departures and plain attendance (green).
pub const COLOR_ATTENDANCE: u32 = 0x00FF00;

/// Embed colour for security alerts (red).
pub const COLOR_DENIED: u32 = 0xFF0000;

/// Plain-text message posted once the terminal finishes booting.
pub const ONLINE_MESSAGE: &str = "Eco Archers Team Gatepass System Online. 📡";

/// Kind of attendance being recorded for an authorized badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    /// Arrival.
    TimeIn,
    /// Departure.
    TimeOut,
    /// Direction unknown; the backend decides.
    Attendance,
}

/// Rich chat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

/// Name/value row inside an embed. Current templates never add any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            fields: Vec::new(),
        }
    }

    /// Authorized-access card for `name`, mentioning `@handle`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepass_core::{AttendanceAction, Embed};
    ///
    /// let embed = Embed::authorized("Jane Doe", "jane", AttendanceAction::Attendance);
    /// assert!(embed.description.contains("@jane"));
    /// assert!(embed.description.contains("Jane Doe"));
    /// ```
    pub fn authorized(name: &str, handle: &str, action: AttendanceAction) -> Self {
        let (description, color) = match action {
            AttendanceAction::TimeIn => (
                format!("Greetings @{handle}!\n\n**{name}** has successfully **timed in**. ✅"),
                COLOR_ARRIVAL,
            ),
            AttendanceAction::TimeOut => (
                format!("Goodbye @{handle}!\n\n**{name}** has successfully **timed out**. 👋"),
                COLOR_ATTENDANCE,
            ),
            AttendanceAction::Attendance => (
                format!("Hello @{handle}!\n\nAttendance recorded for **{name}**. ✅"),
                COLOR_ATTENDANCE,
            ),
        };
        Self::new(AUTHORIZED_TITLE, description, color)
    }

    /// Security alert for an unregistered badge.
    pub fn denied() -> Self {
        Self::new(
            DENIED_TITLE,
            "**UNAUTHORIZED ACCESS ATTEMPT**\n\n\
             An unregistered RFID card was used to attempt facility access.\n \
             The request has been **DENIED** and logged.",
            COLOR_DENIED,
        )
    }
}
