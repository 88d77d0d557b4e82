//! Line-oriented input for the interactive scan session.
//!
//! Each stdin line is either a decoded QR text, a `:` action, or a `!`
//! simulated camera failure. Decoded texts and failures feed a
//! [`LineDecoder`], actions go straight to the session runner.

use async_trait::async_trait;
use partscan_camera::{
    ConstraintProfile, DecoderAdapter, DecoderErrorKind, DecoderEvent, DecoderFailure,
};
use partscan_core::PartToken;
use partscan_session::UserAction;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};

/// What the input side needs to know about the session to resolve
/// `:copy N`, `:open N` and a bare `:retry`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanView {
    /// Raw scan texts, newest first
    pub history: Vec<String>,
    /// Token of the latest lookup
    pub token: Option<PartToken>,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// A user action
    Action(UserAction),
    /// A decoder frame or failure
    Frame(DecoderEvent),
    /// Something that could not be interpreted
    Invalid(String),
}

/// Interpret a stdin line. Blank lines yield `None`.
#[must_use]
pub fn parse_line(line: &str, view: &ScanView) -> Option<InputLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    if let Some(command) = line.strip_prefix(':') {
        return Some(parse_action(command.trim(), view));
    }
    if let Some(failure) = line.strip_prefix('!') {
        return Some(parse_failure(failure.trim()));
    }
    Some(InputLine::Frame(DecoderEvent::Decoded(line.to_string())))
}

fn parse_action(command: &str, view: &ScanView) -> InputLine {
    let (verb, arg) = match command.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (command, None),
    };

    let history_entry = |arg: Option<&str>| -> Result<String, String> {
        let index = match arg {
            Some(n) => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| format!("not a history position: {n}"))?,
            None => 1,
        };
        view.history
            .get(index - 1)
            .cloned()
            .ok_or_else(|| format!("no scan at position {index}"))
    };

    let action = match verb {
        "start" => UserAction::Start,
        "stop" => UserAction::Stop,
        "switch" => UserAction::SwitchCamera,
        "quit" | "q" => UserAction::Shutdown,
        "retry" => match arg.map(PartToken::new).or_else(|| view.token.clone()) {
            Some(token) => UserAction::ManualLookup(token),
            None => return InputLine::Invalid("nothing to retry yet".to_string()),
        },
        "copy" => match history_entry(arg) {
            Ok(text) => UserAction::Copy(text),
            Err(reason) => return InputLine::Invalid(reason),
        },
        "open" => match history_entry(arg) {
            Ok(text) => UserAction::OpenLink(text),
            Err(reason) => return InputLine::Invalid(reason),
        },
        other => return InputLine::Invalid(format!("unknown command :{other}")),
    };
    InputLine::Action(action)
}

fn parse_failure(name: &str) -> InputLine {
    let failure = match name {
        "denied" => DecoderFailure::new(
            DecoderErrorKind::PermissionDenied,
            "NotAllowedError: Permission denied",
        ),
        "nodevice" => DecoderFailure::new(
            DecoderErrorKind::NoDevice,
            "NotFoundError: Requested device not found",
        ),
        "overconstrained" => DecoderFailure::new(
            DecoderErrorKind::ConstraintIncompatible,
            "OverconstrainedError: Constraints could not be satisfied",
        ),
        "other" => DecoderFailure::new(DecoderErrorKind::Other, "AbortError: Stream aborted"),
        other => return InputLine::Invalid(format!("unknown failure !{other}")),
    };
    InputLine::Frame(DecoderEvent::Failed(failure))
}

/// Decoder whose frames arrive over a channel.
///
/// Opening always succeeds; simulated failures arrive as frames and are
/// reported by the controller like failures of a live stream. Lines typed
/// while no stream is held are discarded when the next stream opens.
pub struct LineDecoder {
    frames: mpsc::UnboundedReceiver<DecoderEvent>,
    open: bool,
}

impl LineDecoder {
    /// Create a decoder reading from `frames`.
    #[must_use]
    pub fn new(frames: mpsc::UnboundedReceiver<DecoderEvent>) -> Self {
        Self {
            frames,
            open: false,
        }
    }
}

#[async_trait]
impl DecoderAdapter for LineDecoder {
    async fn open(&mut self, profile: &ConstraintProfile) -> Result<(), DecoderFailure> {
        tracing::debug!(rank = profile.rank, mode = profile.mode_label(), "Opening line decoder");
        let mut stale = 0usize;
        while self.frames.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            tracing::debug!(stale, "Discarded frames received while closed");
        }
        self.open = true;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<DecoderEvent> {
        self.frames.recv().await
    }

    async fn close(&mut self) {
        if self.open {
            tracing::debug!("Closing line decoder");
        }
        self.open = false;
    }
}

/// Route lines from `reader` to the session until EOF or `:quit`.
pub async fn pump_lines<R>(
    reader: R,
    view: watch::Receiver<ScanView>,
    actions: mpsc::Sender<UserAction>,
    frames: mpsc::UnboundedSender<DecoderEvent>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let parsed = {
            let view = view.borrow();
            parse_line(&line, &view)
        };

        match parsed {
            None => {}
            Some(InputLine::Action(action)) => {
                let quit = action == UserAction::Shutdown;
                if actions.send(action).await.is_err() || quit {
                    return Ok(());
                }
            }
            Some(InputLine::Frame(frame)) => {
                if frames.send(frame).is_err() {
                    return Ok(());
                }
            }
            Some(InputLine::Invalid(reason)) => eprintln!("? {reason}"),
        }
    }

    // EOF ends the session.
    let _ = actions.send(UserAction::Shutdown).await;
    Ok(())
}
