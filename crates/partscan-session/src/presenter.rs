//! Presentation boundary: what the session shows and what it accepts.

use crate::status::LookupStatus;
use partscan_core::{PartRecord, PartToken, Result, ScanEvent};
use serde::Serialize;
use url::Url;

/// Actions the user can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Start the scanner
    Start,
    /// Stop the scanner
    Stop,
    /// Toggle the camera facing
    SwitchCamera,
    /// Look a token up again
    ManualLookup(PartToken),
    /// Copy text to the clipboard
    Copy(String),
    /// Open a scanned text as a link
    OpenLink(String),
    /// End the session
    Shutdown,
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// Something the user should act on
    Destructive,
}

/// Short-lived message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Headline
    pub title: String,
    /// Details
    pub description: String,
    /// Severity
    pub level: NoticeLevel,
}

impl Notice {
    /// Informational notice.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
        }
    }

    /// Error notice.
    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Destructive,
        }
    }
}

/// Everything a presenter needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Most recent scan
    pub latest: Option<ScanEvent>,
    /// Recent scans, newest first
    pub history: Vec<ScanEvent>,
    /// Lookup status
    pub status: LookupStatus,
    /// Resolved record, if any
    pub record: Option<PartRecord>,
    /// Whether the scanner is running
    pub running: bool,
    /// Active camera mode ("Back Camera", "Basic Mode", ...)
    pub camera_label: String,
    /// Last fatal camera failure, cleared on start
    pub camera_error: Option<String>,
}

/// User-facing layer driven by the session.
pub trait Presenter: Send {
    /// Redraw after a state change.
    fn render(&mut self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Show a notice.
    fn notify(&mut self, notice: &Notice);

    /// Put `text` on the clipboard.
    fn copy_text(&mut self, text: &str) -> Result<()>;

    /// Open `url` outside the session.
    fn open_link(&mut self, url: &Url) -> Result<()>;
}
