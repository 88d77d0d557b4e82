//! Constraint negotiation state machine.
//!
//! The negotiator is synchronous and owns no I/O: it answers "which profile
//! now" and "what to do about this failure". The controller performs the
//! resulting restarts.

use crate::decoder::{DecoderErrorKind, DecoderFailure};
use crate::error::CameraError;
use crate::profile::{ConstraintLadder, ConstraintProfile};
use partscan_core::FacingMode;
use serde::Serialize;

/// Observable negotiation state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NegotiationState {
    /// Current ladder rank
    pub active_rank: usize,
    /// Most recent decoder failure kind
    pub last_error: Option<DecoderErrorKind>,
    /// Whether the scanner is supposed to be running
    pub running: bool,
}

/// Decision taken for a decoder failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationStep {
    /// Restart the decoder with the next rung
    Advance {
        /// Rank that was rejected
        from: usize,
        /// Rank to try next
        to: usize,
    },
    /// Stop the session; the user must restart explicitly
    Fatal(CameraError),
    /// The scanner is not running; nothing to do
    Ignored,
}

/// Walks the constraint ladder on rejection.
#[derive(Debug, Clone)]
pub struct Negotiator {
    ladder: ConstraintLadder,
    facing: FacingMode,
    state: NegotiationState,
}

impl Negotiator {
    /// Create a stopped negotiator at rank 0.
    #[must_use]
    pub fn new(ladder: ConstraintLadder, facing: FacingMode) -> Self {
        Self {
            ladder,
            facing,
            state: NegotiationState::default(),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    /// Whether the scanner is supposed to be running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Current camera-facing preference.
    #[must_use]
    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// The ladder being walked.
    #[must_use]
    pub fn ladder(&self) -> &ConstraintLadder {
        &self.ladder
    }

    /// Profile for the active rank.
    #[must_use]
    pub fn active_profile(&self) -> ConstraintProfile {
        self.ladder.profile(self.state.active_rank, self.facing)
    }

    /// Label for the active camera mode.
    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        self.active_profile().mode_label()
    }

    /// Begin a session at rank 0.
    pub fn start(&mut self) {
        self.state = NegotiationState {
            active_rank: 0,
            last_error: None,
            running: true,
        };
    }

    /// Stop the session and reset to rank 0.
    pub fn stop(&mut self) {
        self.state = NegotiationState::default();
    }

    /// Toggle the camera facing and reset to rank 0, keeping the running flag.
    pub fn switch_facing(&mut self) -> FacingMode {
        self.facing = self.facing.toggled();
        self.state.active_rank = 0;
        self.state.last_error = None;
        self.facing
    }

    /// Decide how to react to a decoder failure.
    pub fn on_decoder_failure(&mut self, failure: DecoderFailure) -> NegotiationStep {
        if !self.state.running {
            return NegotiationStep::Ignored;
        }

        self.state.last_error = Some(failure.kind);
        let from = self.state.active_rank;

        if failure.kind == DecoderErrorKind::ConstraintIncompatible {
            if from < self.ladder.max_rank() {
                self.state.active_rank = from + 1;
                tracing::info!(from, to = from + 1, "Camera rejected constraints, relaxing");
                return NegotiationStep::Advance { from, to: from + 1 };
            }

            tracing::warn!(rank = from, "Camera rejected every constraint profile");
            self.state.running = false;
            return NegotiationStep::Fatal(CameraError::ConstraintsExhausted {
                attempts: self.ladder.len(),
            });
        }

        tracing::warn!(kind = %failure.kind, message = %failure.message, "Fatal camera failure");
        self.state.running = false;
        NegotiationStep::Fatal(failure.into_camera_error())
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new(ConstraintLadder::default(), FacingMode::Environment)
    }
}
