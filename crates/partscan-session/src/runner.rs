//! Session event loop.

use crate::link::link_target;
use crate::presenter::{Notice, Presenter, SessionSnapshot, UserAction};
use crate::session::{LookupTicket, ScanSession};
use crate::status::LookupStatus;
use partscan_camera::{CameraController, CameraEvent, DecoderAdapter};
use partscan_core::{PartRecord, Result};
use partscan_lookup::{LookupError, LookupErrorKind, PartLookup};
use std::sync::Arc;
use tokio::sync::mpsc;

struct LookupCompletion {
    ticket: LookupTicket,
    result: std::result::Result<PartRecord, LookupError>,
}

/// Runs a [`ScanSession`] against a camera, a lookup and a presenter.
///
/// Events are handled one at a time on the calling task. Lookups are
/// spawned and their results re-enter the loop through a channel.
pub struct SessionRunner<D, P> {
    session: ScanSession,
    camera: CameraController<D>,
    lookup: Arc<dyn PartLookup>,
    presenter: P,
    camera_error: Option<String>,
}

impl<D, P> SessionRunner<D, P>
where
    D: DecoderAdapter,
    P: Presenter,
{
    /// Assemble a runner. The camera starts stopped.
    pub fn new(
        session: ScanSession,
        camera: CameraController<D>,
        lookup: Arc<dyn PartLookup>,
        presenter: P,
    ) -> Self {
        Self {
            session,
            camera,
            lookup,
            presenter,
            camera_error: None,
        }
    }

    /// The session state.
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The camera controller.
    pub fn camera(&self) -> &CameraController<D> {
        &self.camera
    }

    /// Current view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let history = self.session.history();
        SessionSnapshot {
            latest: history.latest().cloned(),
            history: history.iter().cloned().collect(),
            status: self.session.status().clone(),
            record: self.session.current_record().cloned(),
            running: self.camera.is_running(),
            camera_label: self.camera.mode_label().to_string(),
            camera_error: self.camera_error.clone(),
        }
    }

    /// Process events until `Shutdown` or until the action channel closes.
    ///
    /// Returns the runner so the final state can be inspected.
    ///
    /// # Errors
    /// Returns error if the presenter fails to render.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) -> Result<Self> {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<LookupCompletion>();
        self.presenter.render(&self.snapshot())?;

        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    None | Some(UserAction::Shutdown) => break,
                    Some(action) => self.handle_action(action, &done_tx).await,
                },
                Some(done) = done_rx.recv() => self.handle_completion(done),
                event = self.camera.next_event(), if self.camera.is_active() => {
                    self.handle_camera_event(event, &done_tx);
                }
            }
            self.presenter.render(&self.snapshot())?;
        }

        self.flush_camera(&done_tx).await;
        self.camera.stop().await;
        self.presenter.render(&self.snapshot())?;
        tracing::info!("Scan session ended");
        Ok(self)
    }

    async fn handle_action(
        &mut self,
        action: UserAction,
        done_tx: &mpsc::UnboundedSender<LookupCompletion>,
    ) {
        tracing::debug!(?action, "User action");
        if matches!(
            action,
            UserAction::Start | UserAction::Stop | UserAction::SwitchCamera
        ) {
            self.flush_camera(done_tx).await;
        }

        match action {
            UserAction::Start => {
                self.camera_error = None;
                self.camera.start();
            }
            UserAction::Stop => self.camera.stop().await,
            UserAction::SwitchCamera => self.camera.switch_camera().await,
            UserAction::ManualLookup(token) => {
                if let Some(ticket) = self.session.on_manual_lookup(token) {
                    self.spawn_lookup(ticket, done_tx);
                }
            }
            UserAction::Copy(text) => match self.presenter.copy_text(&text) {
                Ok(()) => self
                    .presenter
                    .notify(&Notice::info("Copied!", "Text copied to clipboard")),
                Err(e) => {
                    tracing::warn!(error = %e, "Copy failed");
                    self.presenter.notify(&Notice::destructive(
                        "Copy Failed",
                        "Failed to copy text to clipboard",
                    ));
                }
            },
            UserAction::OpenLink(text) => self.open_link(&text),
            UserAction::Shutdown => {}
        }
    }

    /// Deliver a camera outcome whose step was interrupted by another branch.
    async fn flush_camera(&mut self, done_tx: &mpsc::UnboundedSender<LookupCompletion>) {
        if let Some(event) = self.camera.flush().await {
            self.handle_camera_event(event, done_tx);
        }
    }

    fn open_link(&mut self, text: &str) {
        let Some(url) = link_target(text) else {
            self.presenter.notify(&Notice::destructive(
                "Invalid URL",
                "The scanned text is not a valid link",
            ));
            return;
        };

        if let Err(e) = self.presenter.open_link(&url) {
            tracing::warn!(url = %url, error = %e, "Failed to open link");
            self.presenter
                .notify(&Notice::destructive("Invalid URL", "Could not open the link"));
        }
    }

    fn handle_camera_event(
        &mut self,
        event: CameraEvent,
        done_tx: &mpsc::UnboundedSender<LookupCompletion>,
    ) {
        match event {
            CameraEvent::Started(profile) => {
                tracing::info!(rank = profile.rank, mode = profile.mode_label(), "Camera started");
            }
            CameraEvent::Decoded(text) => {
                if let Some(ticket) = self.session.on_decoded(&text) {
                    self.presenter
                        .notify(&Notice::info("QR Code Scanned!", "Successfully scanned QR code"));
                    self.spawn_lookup(ticket, done_tx);
                }
            }
            CameraEvent::Relaxed { from, next } => {
                tracing::warn!(from, to = next.rank, "Camera rejected constraints");
                let notice = if next.is_unconstrained() {
                    Notice::info("Using Basic Camera", "Falling back to basic camera settings")
                } else {
                    Notice::info("Switching Camera", "Trying different camera settings...")
                };
                self.presenter.notify(&notice);
            }
            CameraEvent::Fatal(err) => {
                tracing::error!(error = %err, "Scanner stopped on camera failure");
                let message = err.user_message().to_string();
                self.presenter
                    .notify(&Notice::destructive("Scanner Error", message.clone()));
                self.camera_error = Some(message);
            }
            CameraEvent::Ended => {
                tracing::info!("Decoder source ended");
                self.presenter
                    .notify(&Notice::info("Scanner Stopped", "The camera source ended"));
            }
        }
    }

    fn spawn_lookup(&self, ticket: LookupTicket, done_tx: &mpsc::UnboundedSender<LookupCompletion>) {
        let lookup = Arc::clone(&self.lookup);
        let done_tx = done_tx.clone();
        tracing::debug!(
            token = %ticket.token(),
            generation = ticket.generation(),
            lookup = lookup.lookup_id(),
            "Starting lookup"
        );

        tokio::spawn(async move {
            let result = lookup.resolve(ticket.token()).await;
            // The loop may already be gone; nothing to report then.
            let _ = done_tx.send(LookupCompletion { ticket, result });
        });
    }

    fn handle_completion(&mut self, done: LookupCompletion) {
        if !self.session.complete_lookup(&done.ticket, done.result) {
            return;
        }

        let notice = match self.session.status() {
            LookupStatus::Resolved { record, .. } => {
                Notice::info("Part Found", format!("{} ({})", record.name, record.id))
            }
            LookupStatus::NotFound { message, .. } => Notice::info("No Data", message.clone()),
            LookupStatus::Failed {
                kind: LookupErrorKind::Configuration,
                message,
                ..
            } => Notice::destructive("Data Source Error", message.clone()),
            LookupStatus::Failed { message, .. } => {
                Notice::destructive("Lookup Failed", message.clone())
            }
            LookupStatus::Idle | LookupStatus::InFlight { .. } => return,
        };
        self.presenter.notify(&notice);
    }
}
