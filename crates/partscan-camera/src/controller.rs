//! Decoder session control.
//!
//! [`CameraController`] owns the decoder and the negotiator and performs the
//! restart cycle: release the current stream, wait the settle delay, acquire
//! with the new profile. Only one stream is ever held at a time, and every
//! acquisition waits at least the settle delay after the last release.
//!
//! [`next_event`](CameraController::next_event) commits each state change
//! before it awaits the decoder. A failure's outcome is stored and the
//! release it requires is marked as owed, so a future dropped mid-release
//! finishes the release and delivers the event on the next call.

use crate::decoder::{DecoderAdapter, DecoderEvent, DecoderFailure};
use crate::error::CameraError;
use crate::negotiator::{NegotiationStep, Negotiator};
use crate::profile::ConstraintProfile;
use std::time::Duration;
use tokio::time::Instant;

/// Events surfaced to the scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    /// A stream was acquired with this profile
    Started(ConstraintProfile),
    /// Decoded QR text
    Decoded(String),
    /// The active profile was rejected; the next rung will be tried
    Relaxed {
        /// Rank that was rejected
        from: usize,
        /// Profile tried next
        next: ConstraintProfile,
    },
    /// The session stopped on a fatal failure
    Fatal(CameraError),
    /// The decoder source ended
    Ended,
}

/// Drives a [`DecoderAdapter`] according to a [`Negotiator`].
pub struct CameraController<D> {
    decoder: D,
    negotiator: Negotiator,
    settle_delay: Duration,
    needs_open: bool,
    /// The decoder may hold tracks (set before `open` is awaited)
    stream_held: bool,
    release_owed: bool,
    released_at: Option<Instant>,
    deferred: Option<CameraEvent>,
}

impl<D: DecoderAdapter> CameraController<D> {
    /// Create a stopped controller.
    #[must_use]
    pub fn new(decoder: D, negotiator: Negotiator, settle_delay: Duration) -> Self {
        Self {
            decoder,
            negotiator,
            settle_delay,
            needs_open: false,
            stream_held: false,
            release_owed: false,
            released_at: None,
            deferred: None,
        }
    }

    /// The negotiator, for state inspection.
    #[must_use]
    pub fn negotiator(&self) -> &Negotiator {
        &self.negotiator
    }

    /// The wrapped decoder.
    #[must_use]
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Whether the scanner is supposed to be running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.negotiator.is_running()
    }

    /// Whether [`next_event`](Self::next_event) has anything to do: the
    /// scanner runs, an event awaits delivery, or a release is owed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.negotiator.is_running() || self.deferred.is_some() || self.release_owed
    }

    /// Label for the active camera mode.
    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        self.negotiator.mode_label()
    }

    /// Start scanning at rank 0. No-op if already running.
    pub fn start(&mut self) {
        if self.negotiator.is_running() {
            return;
        }
        self.negotiator.start();
        self.needs_open = true;
        tracing::info!(facing = %self.negotiator.facing(), "Starting scanner");
    }

    /// Stop scanning, release the stream and reset to rank 0.
    ///
    /// An undelivered fatal or end event survives; see [`flush`](Self::flush).
    pub async fn stop(&mut self) {
        self.negotiator.stop();
        self.needs_open = false;
        self.drop_deferred_relaxation();
        self.release_owed = true;
        self.release().await;
        tracing::info!("Scanner stopped");
    }

    /// Toggle the camera facing. A running scanner is restarted at rank 0.
    pub async fn switch_camera(&mut self) {
        let facing = self.negotiator.switch_facing();
        tracing::info!(facing = %facing, "Switching camera");

        if self.negotiator.is_running() {
            self.needs_open = true;
            self.drop_deferred_relaxation();
            self.release_owed = true;
            self.release().await;
        }
    }

    /// Complete a step interrupted by a dropped [`next_event`](Self::next_event):
    /// perform the owed release and hand back the undelivered event, if any.
    pub async fn flush(&mut self) -> Option<CameraEvent> {
        self.release().await;
        self.deferred.take()
    }

    /// Wait for the next camera event.
    ///
    /// A stopped controller with nothing owed never yields. Dropping the
    /// returned future loses nothing: an outcome already decided is
    /// delivered by the next call or by [`flush`](Self::flush).
    pub async fn next_event(&mut self) -> CameraEvent {
        loop {
            self.release().await;
            if let Some(event) = self.deferred.take() {
                return event;
            }

            if !self.negotiator.is_running() {
                return std::future::pending().await;
            }

            if self.needs_open {
                // An interrupted acquisition may have left tracks behind.
                if self.stream_held {
                    self.release_owed = true;
                    continue;
                }
                if let Some(released_at) = self.released_at {
                    tokio::time::sleep_until(released_at + self.settle_delay).await;
                }

                let profile = self.negotiator.active_profile();
                tracing::debug!(rank = profile.rank, "Acquiring camera stream");
                self.stream_held = true;
                match self.decoder.open(&profile).await {
                    Ok(()) => {
                        self.needs_open = false;
                        return CameraEvent::Started(profile);
                    }
                    Err(failure) => self.record_failure(failure),
                }
                continue;
            }

            match self.decoder.next_event().await {
                Some(DecoderEvent::Decoded(text)) => return CameraEvent::Decoded(text),
                Some(DecoderEvent::Failed(failure)) => self.record_failure(failure),
                None => {
                    tracing::info!("Decoder source ended");
                    self.negotiator.stop();
                    self.needs_open = false;
                    self.defer(CameraEvent::Ended);
                }
            }
        }
    }

    fn record_failure(&mut self, failure: DecoderFailure) {
        let event = match self.negotiator.on_decoder_failure(failure) {
            NegotiationStep::Advance { from, .. } => {
                self.needs_open = true;
                CameraEvent::Relaxed {
                    from,
                    next: self.negotiator.active_profile(),
                }
            }
            NegotiationStep::Fatal(err) => {
                self.needs_open = false;
                CameraEvent::Fatal(err)
            }
            NegotiationStep::Ignored => {
                self.needs_open = false;
                CameraEvent::Ended
            }
        };
        self.defer(event);
    }

    fn defer(&mut self, event: CameraEvent) {
        self.deferred = Some(event);
        self.release_owed = true;
    }

    fn drop_deferred_relaxation(&mut self) {
        if matches!(self.deferred, Some(CameraEvent::Relaxed { .. })) {
            self.deferred = None;
        }
    }

    async fn release(&mut self) {
        if !self.release_owed {
            return;
        }
        if self.stream_held {
            self.decoder.close().await;
            self.stream_held = false;
            self.released_at = Some(Instant::now());
        }
        self.release_owed = false;
    }
}
