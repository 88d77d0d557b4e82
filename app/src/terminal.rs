//! Terminal presenter for the interactive scan session.

use crate::input::ScanView;
use base64::Engine as _;
use partscan_core::{PartscanError, Result};
use partscan_session::{LookupStatus, Notice, NoticeLevel, Presenter, SessionSnapshot};
use std::io::Write;
use tokio::process::Command;
use tokio::sync::watch;
use url::Url;

/// Draws the session as text and publishes a [`ScanView`] for the input side.
pub struct TerminalPresenter<W> {
    out: W,
    view: watch::Sender<ScanView>,
    last: Option<SessionSnapshot>,
    opener: Vec<String>,
}

impl<W: Write + Send> TerminalPresenter<W> {
    /// Create a presenter writing to `out`.
    pub fn new(out: W, view: watch::Sender<ScanView>) -> Self {
        Self {
            out,
            view,
            last: None,
            opener: default_opener(),
        }
    }

    /// Replace the program (and leading arguments) used to open links.
    /// The URL is appended as the last argument.
    #[must_use]
    pub fn with_opener(mut self, opener: Vec<String>) -> Self {
        self.opener = opener;
        self
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }
}

/// Render a snapshot as the lines the terminal shows.
#[must_use]
pub fn render_lines(snapshot: &SessionSnapshot) -> Vec<String> {
    let state = if snapshot.running { "scanning" } else { "stopped" };
    let mut lines = vec![format!("[{}] {state}", snapshot.camera_label)];

    if let Some(error) = &snapshot.camera_error {
        lines.push(format!("  camera: {error}"));
    }

    match &snapshot.status {
        LookupStatus::Idle => lines.push("  waiting for a scan".to_string()),
        LookupStatus::InFlight { token } => lines.push(format!("  looking up {token}...")),
        LookupStatus::Resolved { record, .. } => {
            lines.push(format!("  ID:           {}", record.id));
            lines.push(format!("  Name:         {}", record.name));
            lines.push(format!("  Quantity:     {}", record.quantity));
            lines.push(format!("  Position:     {}", record.position));
            if !record.cad_assembly.is_empty() {
                lines.push(format!("  CAD Assembly: {}", record.cad_assembly));
            }
        }
        LookupStatus::NotFound { message, .. } => lines.push(format!("  no data: {message}")),
        LookupStatus::Failed { message, .. } => {
            lines.push(format!("  lookup failed: {message} (:retry to try again)"));
        }
    }

    for (n, scan) in snapshot.history.iter().enumerate() {
        lines.push(format!(
            "  {}. {} {}",
            n + 1,
            scan.scanned_at().format("%H:%M:%S"),
            scan.raw_text()
        ));
    }
    lines
}

/// OSC 52 escape sequence that asks the terminal to set the clipboard.
#[must_use]
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

fn default_opener() -> Vec<String> {
    #[cfg(target_os = "macos")]
    let opener = ["open"];
    #[cfg(target_os = "windows")]
    let opener = ["cmd", "/C", "start", ""];
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = ["xdg-open"];

    opener.iter().map(ToString::to_string).collect()
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn render(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        if self.last.as_ref() == Some(snapshot) {
            return Ok(());
        }

        self.view.send_replace(ScanView {
            history: snapshot
                .history
                .iter()
                .map(|scan| scan.raw_text().to_string())
                .collect(),
            token: snapshot.status.token().cloned(),
        });

        for line in render_lines(snapshot) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.last = Some(snapshot.clone());
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        let marker = match notice.level {
            NoticeLevel::Info => "*",
            NoticeLevel::Destructive => "!",
        };
        if let Err(e) = writeln!(self.out, "{marker} {}: {}", notice.title, notice.description) {
            tracing::warn!(error = %e, "Failed to write notice");
        }
    }

    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn open_link(&mut self, url: &Url) -> Result<()> {
        let Some((program, args)) = self.opener.split_first() else {
            return Err(PartscanError::Presentation(
                "no link opener configured".to_string(),
            ));
        };

        tracing::info!(url = %url, opener = %program, "Opening link");
        let mut child = Command::new(program)
            .args(args)
            .arg(url.as_str())
            .spawn()
            .map_err(|e| PartscanError::Presentation(format!("failed to open {url}: {e}")))?;

        // The session keeps running while the opener does its work.
        let url = url.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::warn!(url = %url, %status, "Link opener failed");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(url = %url, error = %e, "Link opener lost"),
            }
        });
        Ok(())
    }
}
