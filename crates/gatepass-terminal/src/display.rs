//! Status display for the attendance terminal.
//!
//! The physical panel is a 128×64 monochrome OLED driven at text size 1,
//! which gives 8 lines of 21 characters. [`VirtualDisplay`] models that text
//! grid; [`StatusDisplay`] renders the terminal's screens ([`StatusFrame`])
//! onto it.
//!
//! # Character Encoding
//!
//! The panel font only covers printable ASCII. Control characters are
//! dropped and any other non-ASCII character is shown as `?`, so a name like
//! "Peña" renders as "Pe?a".
//!
//! # Examples
//!
//! ```
//! use gatepass_terminal::{StatusDisplay, StatusFrame};
//!
//! let mut display = StatusDisplay::new();
//! display.show(StatusFrame::granted("Jane Doe"));
//!
//! assert!(display.contains("Jane Doe"));
//! ```

use std::collections::VecDeque;
use std::fmt;

use gatepass_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};
use gatepass_core::{Error, Result};
use tracing::debug;

/// Frames per animation strip.
pub const ANIMATION_FRAMES: usize = 28;

/// Line the animation marker is drawn on.
const ANIMATION_LINE: usize = 1;

/// First caption line (the bitmap occupies the rows above).
const CAPTION_LINE: usize = 6;

/// Line used by screens without an animation.
const PLAIN_LINE: usize = 3;

/// Screens kept for inspection.
const MAX_FRAME_HISTORY: usize = 64;

/// Text alignment within a display line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    /// Extra space goes on the right when the padding is odd.
    Center,
    Right,
}

/// Text grid backing the panel.
#[derive(Debug, Clone)]
pub struct VirtualDisplay {
    lines: usize,
    columns: usize,
    buffer: Vec<String>,
}

impl VirtualDisplay {
    /// Create a blank display of `lines` × `columns` characters.
    ///
    /// ```
    /// use gatepass_terminal::VirtualDisplay;
    ///
    /// let display = VirtualDisplay::new(8, 21);
    /// assert_eq!(display.get_line(7).unwrap().len(), 21);
    /// ```
    pub fn new(lines: usize, columns: usize) -> Self {
        Self {
            lines,
            columns,
            buffer: vec![" ".repeat(columns); lines],
        }
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Set text on a line, left aligned.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLine` if `line` is out of bounds.
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<()> {
        self.set_line_aligned(line, text, Alignment::Left)
    }

    /// Set text on a line with the given alignment. Text is sanitized and
    /// truncated to the column width.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLine` if `line` is out of bounds.
    ///
    /// ```
    /// use gatepass_terminal::{Alignment, VirtualDisplay};
    ///
    /// let mut display = VirtualDisplay::new(8, 21);
    /// display.set_line_aligned(0, "Verifying...", Alignment::Center).unwrap();
    /// assert_eq!(display.get_line(0).unwrap(), "    Verifying...     ");
    /// ```
    pub fn set_line_aligned(&mut self, line: usize, text: &str, align: Alignment) -> Result<()> {
        if line >= self.lines {
            return Err(Error::InvalidLine {
                line,
                max: self.lines.saturating_sub(1),
            });
        }

        let sanitized = sanitize_text(text);
        self.buffer[line] = align_text(&sanitized, self.columns, align);
        Ok(())
    }

    /// Fill every line with spaces.
    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
    }

    /// Text of one line, padded to the column width.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLine` if `line` is out of bounds.
    pub fn get_line(&self, line: usize) -> Result<&str> {
        self.buffer
            .get(line)
            .map(String::as_str)
            .ok_or(Error::InvalidLine {
                line,
                max: self.lines.saturating_sub(1),
            })
    }

    pub fn get_all_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(|s| s.as_str()).collect()
    }
}

/// Bitmap animation strips available on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
    /// Idle "tap your card" loop.
    Scan,
    /// Busy indicator.
    Gears,
    /// Check mark.
    Authorized,
    /// Cross.
    Denied,
}

impl Animation {
    pub const fn frame_count(self) -> usize {
        ANIMATION_FRAMES
    }

    pub const fn name(self) -> &'static str {
        match self {
            Animation::Scan => "scan",
            Animation::Gears => "gears",
            Animation::Authorized => "authorized",
            Animation::Denied => "denied",
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One screen: an optional animation frame plus caption lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFrame {
    pub animation: Option<Animation>,
    pub frame: usize,
    pub captions: Vec<String>,
}

impl StatusFrame {
    fn animated(animation: Animation, frame: usize, captions: &[&str]) -> Self {
        Self {
            animation: Some(animation),
            frame: frame % animation.frame_count(),
            captions: captions.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn connecting(ssid: &str) -> Self {
        Self {
            animation: None,
            frame: 0,
            captions: vec![format!("Connecting to {ssid}")],
        }
    }

    /// Directory download, `attempt` counted from 1.
    ///
    /// ```
    /// use gatepass_terminal::StatusFrame;
    ///
    /// assert_eq!(StatusFrame::downloading(1, 0).captions, ["Downloading UIDs"]);
    /// assert_eq!(StatusFrame::downloading(3, 0).captions, ["Retry Attempt: 3"]);
    /// ```
    pub fn downloading(attempt: u32, frame: usize) -> Self {
        if attempt <= 1 {
            Self::animated(Animation::Gears, frame, &["Downloading UIDs"])
        } else {
            let caption = format!("Retry Attempt: {attempt}");
            Self::animated(Animation::Gears, frame, &[caption.as_str()])
        }
    }

    pub fn database_ready(frame: usize) -> Self {
        Self::animated(Animation::Authorized, frame, &["Database Ready!"])
    }

    pub fn database_failed() -> Self {
        Self::animated(Animation::Denied, 0, &["Database Failed", "Check Network"])
    }

    pub fn ready_to_scan(frame: usize) -> Self {
        Self::animated(Animation::Scan, frame, &["Ready to scan..."])
    }

    pub fn verifying() -> Self {
        Self::animated(Animation::Gears, 0, &["Verifying..."])
    }

    pub fn granted(name: &str) -> Self {
        Self::animated(Animation::Authorized, 0, &[name])
    }

    pub fn denied() -> Self {
        Self::animated(Animation::Denied, 0, &["Access Denied"])
    }
}

/// Renders [`StatusFrame`]s onto the panel and remembers recent ones.
#[derive(Debug, Clone)]
pub struct StatusDisplay {
    panel: VirtualDisplay,
    current: Option<StatusFrame>,
    history: VecDeque<StatusFrame>,
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self {
            panel: VirtualDisplay::new(DISPLAY_LINES, DISPLAY_COLUMNS),
            current: None,
            history: VecDeque::with_capacity(MAX_FRAME_HISTORY),
        }
    }

    /// Replace the panel contents with `frame`.
    pub fn show(&mut self, frame: StatusFrame) {
        self.panel.clear();

        let first_caption = match frame.animation {
            Some(animation) => {
                let marker = format!("<{} {:02}>", animation, frame.frame);
                let _ = self
                    .panel
                    .set_line_aligned(ANIMATION_LINE, &marker, Alignment::Center);
                CAPTION_LINE
            }
            None => PLAIN_LINE,
        };

        // Captions past the last line are dropped
        for (offset, caption) in frame.captions.iter().enumerate() {
            let align = if frame.animation.is_some() {
                Alignment::Center
            } else {
                Alignment::Left
            };
            let _ = self
                .panel
                .set_line_aligned(first_caption + offset, caption, align);
        }

        debug!("Display: {}", frame.captions.join(" / "));

        if self.history.len() == MAX_FRAME_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(frame.clone());
        self.current = Some(frame);
    }

    /// Screen currently shown, if any.
    pub fn current(&self) -> Option<&StatusFrame> {
        self.current.as_ref()
    }

    /// Recently shown screens, oldest first.
    pub fn history(&self) -> &VecDeque<StatusFrame> {
        &self.history
    }

    pub fn panel(&self) -> &VirtualDisplay {
        &self.panel
    }

    /// Whether any panel line contains `text` after sanitizing.
    pub fn contains(&self, text: &str) -> bool {
        let needle = sanitize_text(text);
        self.panel
            .get_all_lines()
            .iter()
            .any(|line| line.contains(needle.as_str()))
    }
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate text to at most `max_chars` characters.
///
/// ```
/// use gatepass_terminal::truncate_text;
///
/// assert_eq!(truncate_text("Ready to scan...", 5), "Ready");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Align text within `width` characters, padding with spaces. Longer text
/// is truncated.
///
/// ```
/// use gatepass_terminal::{align_text, Alignment};
///
/// assert_eq!(align_text("HELLO", 10, Alignment::Left), "HELLO     ");
/// assert_eq!(align_text("HELLO", 10, Alignment::Center), "  HELLO   ");
/// assert_eq!(align_text("HELLO", 10, Alignment::Right), "     HELLO");
/// ```
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let char_count = text.chars().count();

    if char_count >= width {
        return truncate_text(text, width);
    }

    let padding = width - char_count;

    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Drop control characters, replace non-ASCII with `?`, and trim.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_display_is_blank() {
        let display = VirtualDisplay::new(DISPLAY_LINES, DISPLAY_COLUMNS);

        assert_eq!(display.lines(), 8);
        assert_eq!(display.columns(), 21);
        assert!(display.get_all_lines().iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_set_line_out_of_bounds() {
        let mut display = VirtualDisplay::new(8, 21);
        let result = display.set_line(8, "x");

        assert!(matches!(result, Err(Error::InvalidLine { line: 8, max: 7 })));
        assert!(display.get_line(8).is_err());
    }

    #[test]
    fn test_long_text_truncated() {
        let mut display = VirtualDisplay::new(8, 21);
        display
            .set_line(0, "Connecting to an-unusually-long-ssid")
            .unwrap();

        assert_eq!(display.get_line(0).unwrap(), "Connecting to an-unus");
    }

    #[rstest]
    #[case("Jane Doe", "Jane Doe")]
    #[case("  padded  ", "padded")]
    #[case("Peña", "Pe?a")]
    #[case("tab\there", "tabhere")]
    #[case("📡", "?")]
    fn test_sanitize_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_text(input), expected);
    }

    #[test]
    fn test_animation_frames_wrap() {
        let frame = StatusFrame::ready_to_scan(ANIMATION_FRAMES + 3);
        assert_eq!(frame.frame, 3);
        assert_eq!(frame.animation, Some(Animation::Scan));
    }

    #[test]
    fn test_screens() {
        assert_eq!(StatusFrame::connecting("office").captions, ["Connecting to office"]);
        assert_eq!(StatusFrame::connecting("office").animation, None);
        assert_eq!(StatusFrame::database_ready(0).captions, ["Database Ready!"]);
        assert_eq!(
            StatusFrame::database_failed().captions,
            ["Database Failed", "Check Network"]
        );
        assert_eq!(StatusFrame::database_failed().animation, Some(Animation::Denied));
        assert_eq!(StatusFrame::verifying().animation, Some(Animation::Gears));
        assert_eq!(StatusFrame::denied().captions, ["Access Denied"]);
        assert_eq!(StatusFrame::granted("Jane Doe").animation, Some(Animation::Authorized));
    }

    #[test]
    fn test_status_display_layout() {
        let mut display = StatusDisplay::new();
        display.show(StatusFrame::database_failed());

        let panel = display.panel();
        assert_eq!(panel.get_line(ANIMATION_LINE).unwrap().trim(), "<denied 00>");
        assert_eq!(panel.get_line(CAPTION_LINE).unwrap().trim(), "Database Failed");
        assert_eq!(panel.get_line(CAPTION_LINE + 1).unwrap().trim(), "Check Network");
    }

    #[test]
    fn test_plain_screen_layout() {
        let mut display = StatusDisplay::new();
        display.show(StatusFrame::connecting("office"));

        let line = display.panel().get_line(PLAIN_LINE).unwrap();
        assert!(line.starts_with("Connecting to office"));
        assert!(display.panel().get_line(ANIMATION_LINE).unwrap().trim().is_empty());
    }

    #[test]
    fn test_show_replaces_previous_screen() {
        let mut display = StatusDisplay::new();
        display.show(StatusFrame::database_failed());
        display.show(StatusFrame::verifying());

        assert!(display.contains("Verifying..."));
        assert!(!display.contains("Check Network"));
        assert_eq!(display.current(), Some(&StatusFrame::verifying()));
        assert_eq!(display.history().len(), 2);
    }

    #[test]
    fn test_history_bounded() {
        let mut display = StatusDisplay::new();
        for frame in 0..(MAX_FRAME_HISTORY + 10) {
            display.show(StatusFrame::ready_to_scan(frame));
        }
        assert_eq!(display.history().len(), MAX_FRAME_HISTORY);
    }
}
