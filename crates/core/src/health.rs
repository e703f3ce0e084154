use serde::{Deserialize, Serialize};

use crate::event::EventKind;

/// Stream health, evaluated once per tick. Priority order: buffering on the
/// current event wins over a degraded viewer count, which wins over healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Critical,
    Degraded,
    Healthy,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Critical => "critical",
            HealthState::Degraded => "degraded",
            HealthState::Healthy => "healthy",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthState::Healthy)
    }
}

/// Health state plus the operator-facing message that goes with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub state: HealthState,
    pub message: String,
}

/// Whether the stream is currently inside the ad-break family of events.
/// Reported alongside health for the presentation layer; never feeds into
/// the health priority itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    AdBreak,
    Content,
}

impl PlaybackPhase {
    pub fn from_kind(kind: EventKind) -> Self {
        if kind.is_ad_family() {
            PlaybackPhase::AdBreak
        } else {
            PlaybackPhase::Content
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackPhase::AdBreak => "ad_break",
            PlaybackPhase::Content => "content",
        }
    }
}
