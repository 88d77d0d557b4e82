//! Bounded, most-recent-first scan history.

use partscan_core::ScanEvent;
use std::collections::VecDeque;

/// Number of scans kept.
pub const CAPACITY: usize = 5;

/// Recent scans, newest first, never longer than [`CAPACITY`].
#[derive(Debug, Clone)]
pub struct ScanHistory {
    entries: VecDeque<ScanEvent>,
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(CAPACITY + 1),
        }
    }

    /// Insert at the front, returning the evicted oldest entry if full.
    pub fn push(&mut self, event: ScanEvent) -> Option<ScanEvent> {
        self.entries.push_front(event);
        if self.entries.len() > CAPACITY {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Most recent scan.
    #[must_use]
    pub fn latest(&self) -> Option<&ScanEvent> {
        self.entries.front()
    }

    /// Scan at `index`, 0 being the most recent.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScanEvent> {
        self.entries.get(index)
    }

    /// Scans, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ScanEvent> {
        self.entries.iter()
    }

    /// Number of stored scans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first scan.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
