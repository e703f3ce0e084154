//! Rolling analytics window.
//!
//! Fixed-capacity FIFO over `(event, flags)` entries. Flags are stamped at
//! ingestion and never revisited; the aggregate counts are window-scoped
//! sums that shrink as flagged entries age out.

use chrono::{DateTime, Utc};
use qoe_core::{DerivedFlags, TelemetryEvent, ValidationError, WindowEntry};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Anomaly counts over the current window contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCounts {
    pub buffering: u32,
    pub lost_packet: u32,
    pub signal_failure: u32,
}

pub struct AnalyticsWindow {
    capacity: usize,
    entries: VecDeque<WindowEntry>,
    counts: WindowCounts,
    last_sequence: Option<u64>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl AnalyticsWindow {
    /// Create a window retaining at most `capacity` entries. A capacity of 0
    /// is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            counts: WindowCounts::default(),
            last_sequence: None,
            last_timestamp: None,
        }
    }

    /// Ingest one event: validate, stamp flags, evict the oldest entry if at
    /// capacity, append, and recompute the window counts.
    ///
    /// A rejected event leaves the window, the sequence register, and the
    /// counts untouched; the next valid event is compared against the last
    /// accepted one.
    pub fn ingest(&mut self, event: &TelemetryEvent) -> Result<DerivedFlags, ValidationError> {
        event.validate(self.last_timestamp)?;

        let flags = DerivedFlags::compute(event, self.last_sequence);
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(WindowEntry {
            event: event.clone(),
            flags,
        });
        self.last_sequence = Some(event.sequence_id);
        self.last_timestamp = Some(event.timestamp);
        self.counts = self.recount();
        Ok(flags)
    }

    fn recount(&self) -> WindowCounts {
        let mut counts = WindowCounts::default();
        for entry in &self.entries {
            if entry.flags.buffering {
                counts.buffering += 1;
            }
            if entry.flags.lost_packet {
                counts.lost_packet += 1;
            }
            if entry.flags.signal_failure {
                counts.signal_failure += 1;
            }
        }
        counts
    }

    pub fn counts(&self) -> WindowCounts {
        self.counts
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    /// Cloned window contents in arrival order, oldest first.
    pub fn snapshot_entries(&self) -> Vec<WindowEntry> {
        self.entries.iter().cloned().collect()
    }
}
