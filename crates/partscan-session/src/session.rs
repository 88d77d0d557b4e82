//! Scan session state machine.

use crate::history::ScanHistory;
use crate::status::LookupStatus;
use partscan_core::{PartRecord, PartToken, ScanEvent};
use partscan_extract::TokenExtractor;
use partscan_lookup::LookupError;

/// Handle for one started lookup.
///
/// The session only accepts the completion of the newest ticket it issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    token: PartToken,
}

impl LookupTicket {
    /// Sequence number of the request.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token to resolve.
    #[must_use]
    pub fn token(&self) -> &PartToken {
        &self.token
    }
}

/// History, current lookup status and the request sequence.
#[derive(Debug, Clone)]
pub struct ScanSession {
    history: ScanHistory,
    extractor: TokenExtractor,
    status: LookupStatus,
    generation: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::with_extractor(TokenExtractor::new())
    }

    /// Create an idle session using a custom extractor.
    #[must_use]
    pub fn with_extractor(extractor: TokenExtractor) -> Self {
        Self {
            history: ScanHistory::new(),
            extractor,
            status: LookupStatus::Idle,
            generation: 0,
        }
    }

    /// Handle a decoded text.
    ///
    /// Returns the lookup to run, or `None` when the text repeats the
    /// previous scan or is blank.
    pub fn on_decoded(&mut self, raw_text: &str) -> Option<LookupTicket> {
        if raw_text.trim().is_empty() {
            tracing::debug!("Ignoring blank decode");
            return None;
        }
        if self
            .history
            .latest()
            .is_some_and(|previous| previous.raw_text() == raw_text)
        {
            tracing::trace!("Ignoring repeated frame");
            return None;
        }

        self.history.push(ScanEvent::new(raw_text));
        let token = self.extractor.extract(raw_text);
        tracing::info!(token = %token, "QR code scanned");

        Some(self.begin_lookup(token))
    }

    /// Look `token` up again without a new decode.
    ///
    /// Returns `None` for an empty token.
    pub fn on_manual_lookup(&mut self, token: PartToken) -> Option<LookupTicket> {
        if token.is_empty() {
            return None;
        }
        tracing::info!(token = %token, "Manual lookup requested");
        Some(self.begin_lookup(token))
    }

    /// Retry the latest token, if any.
    pub fn retry(&mut self) -> Option<LookupTicket> {
        let token = self.status.token().cloned()?;
        self.on_manual_lookup(token)
    }

    /// Apply a lookup result.
    ///
    /// Returns false, leaving the session untouched, when a newer request
    /// was issued after `ticket`.
    pub fn complete_lookup(
        &mut self,
        ticket: &LookupTicket,
        result: Result<PartRecord, LookupError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                token = %ticket.token,
                generation = ticket.generation,
                current = self.generation,
                "Dropping superseded lookup result"
            );
            return false;
        }

        self.status = LookupStatus::from_outcome(ticket.token.clone(), result);
        true
    }

    /// Recent scans.
    #[must_use]
    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    /// Current lookup status.
    #[must_use]
    pub fn status(&self) -> &LookupStatus {
        &self.status
    }

    /// Current record, present only when the latest lookup resolved.
    #[must_use]
    pub fn current_record(&self) -> Option<&PartRecord> {
        self.status.record()
    }

    /// Sequence number of the newest request.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn begin_lookup(&mut self, token: PartToken) -> LookupTicket {
        self.generation += 1;
        self.status = LookupStatus::InFlight {
            token: token.clone(),
        };
        LookupTicket {
            generation: self.generation,
            token,
        }
    }
}
