use serde::{Deserialize, Serialize};

use crate::event::{EventKind, TelemetryEvent};

/// Per-event anomaly flags, computed once at ingestion and never recomputed
/// retroactively. Eviction from the window is the only way a stored flag
/// stops contributing to aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFlags {
    pub buffering: bool,
    pub lost_packet: bool,
    pub signal_failure: bool,
}

impl DerivedFlags {
    /// Latency threshold at which an ad segment counts as buffering.
    pub const BUFFERING_LATENCY_MS: f64 = 1000.0;

    /// Compute the flags for `event` against the last accepted sequence id.
    /// `prev_sequence` is `None` on the first ingestion of a session, in
    /// which case `lost_packet` is always false.
    pub fn compute(event: &TelemetryEvent, prev_sequence: Option<u64>) -> Self {
        Self {
            buffering: event.event_kind == EventKind::AdPlaying
                && event.latency_ms >= Self::BUFFERING_LATENCY_MS,
            lost_packet: prev_sequence
                .map_or(false, |prev| prev.wrapping_add(1) != event.sequence_id),
            signal_failure: event.event_kind == EventKind::Scte35Trigger
                && event.signal_payload.is_none(),
        }
    }

    pub fn any(&self) -> bool {
        self.buffering || self.lost_packet || self.signal_failure
    }
}

/// A retained window row: the event plus the flags stamped at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub event: TelemetryEvent,
    pub flags: DerivedFlags,
}
