use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Telemetry event kinds emitted by the stream simulator.
///
/// Transitions between kinds follow the splice state machine: `scte35_trigger`
/// opens an ad break, `ad_playing` fills it, `ad_complete` closes it, and
/// `content_playing` covers everything in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ContentPlaying,
    AdPlaying,
    AdComplete,
    Scte35Trigger,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ContentPlaying => "content_playing",
            EventKind::AdPlaying => "ad_playing",
            EventKind::AdComplete => "ad_complete",
            EventKind::Scte35Trigger => "scte35_trigger",
        }
    }

    /// True for the ad-break family: the splice trigger, ad segments, and the
    /// completion marker.
    pub fn is_ad_family(&self) -> bool {
        matches!(
            self,
            EventKind::AdPlaying | EventKind::AdComplete | EventKind::Scte35Trigger
        )
    }
}

/// One telemetry sample, produced once per tick and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub stream_id: String,
    pub timestamp: DateTime<Utc>,

    /// Monotonic counter starting at 0; a gap signals packet loss downstream.
    pub sequence_id: u64,

    pub event_kind: EventKind,

    /// Present only on successful `scte35_trigger` events. `None` on a
    /// trigger models signal failure ("dead air").
    pub signal_payload: Option<String>,

    /// Non-negative, finite latency sample for this tick.
    pub latency_ms: f64,
}

impl TelemetryEvent {
    /// Validate field-level invariants before ingestion.
    ///
    /// `prev_timestamp` is the timestamp of the last accepted event, if any;
    /// an earlier timestamp on this event is a contract violation by the
    /// producer. Rejected events must not be processed further.
    pub fn validate(&self, prev_timestamp: Option<DateTime<Utc>>) -> Result<(), ValidationError> {
        if !self.latency_ms.is_finite() {
            return Err(ValidationError::NonFiniteLatency(self.latency_ms));
        }
        if self.latency_ms < 0.0 {
            return Err(ValidationError::NegativeLatency(self.latency_ms));
        }
        if self.signal_payload.is_some() && self.event_kind != EventKind::Scte35Trigger {
            return Err(ValidationError::PayloadOutsideTrigger(self.event_kind));
        }
        if let Some(prev) = prev_timestamp {
            if self.timestamp < prev {
                return Err(ValidationError::TimestampRegression {
                    prev,
                    got: self.timestamp,
                });
            }
        }
        Ok(())
    }
}
