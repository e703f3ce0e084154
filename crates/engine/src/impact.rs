//! Business-impact accumulator and alert derivation.
//!
//! Session-lifetime state, distinct from the window-scoped anomaly counts:
//! revenue at risk keeps growing for the whole session while the window
//! counts decay as entries age out.

use qoe_core::{Alert, DerivedFlags, HealthState, SessionConfig, TelemetryEvent};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::warn;

/// What one tick did to the accumulator.
#[derive(Debug, Clone)]
pub struct TickImpact {
    /// Viewers lost to churn this tick, when the event buffered.
    pub churned_viewers: Option<u32>,
    pub live_viewers: i64,
    pub revenue_at_risk: f64,
    pub alert: Alert,
}

/// Viewer and revenue state for one session. Created once at session start,
/// updated once per ingested event, never reset.
pub struct BusinessImpactAccumulator {
    live_viewers: i64,
    revenue_at_risk: f64,
    baseline_viewers: i64,
    low_water_viewers: i64,
    churn_viewers: (u32, u32),
    recovery_viewers: (u32, u32),
    revenue_per_lost_viewer: f64,
}

impl BusinessImpactAccumulator {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            live_viewers: config.baseline_viewers,
            revenue_at_risk: 0.0,
            baseline_viewers: config.baseline_viewers,
            low_water_viewers: config.low_water_viewers,
            churn_viewers: (
                config.churn_viewers_min,
                config.churn_viewers_max.max(config.churn_viewers_min),
            ),
            recovery_viewers: (
                config.recovery_viewers_min,
                config.recovery_viewers_max.max(config.recovery_viewers_min),
            ),
            revenue_per_lost_viewer: config.revenue_per_lost_viewer,
        }
    }

    /// Apply one ingested event. Total over valid events: every branch
    /// returns an outcome, and `revenue_at_risk` never decreases.
    ///
    /// A buffering tick churns viewers and books the matching revenue risk.
    /// A clean tick below baseline regains a small increment; there is no
    /// floor under `live_viewers` and no ceiling on the recovery target
    /// beyond the baseline check itself.
    pub fn apply(
        &mut self,
        event: &TelemetryEvent,
        flags: DerivedFlags,
        rng: &mut StdRng,
    ) -> TickImpact {
        let churned_viewers = if flags.buffering {
            let (lo, hi) = self.churn_viewers;
            let churn = rng.gen_range(lo..=hi);
            self.live_viewers -= i64::from(churn);
            self.revenue_at_risk += f64::from(churn) * self.revenue_per_lost_viewer;
            warn!(
                stream = %event.stream_id,
                seq = event.sequence_id,
                churn,
                viewers = self.live_viewers,
                "ad buffering churn"
            );
            Some(churn)
        } else {
            if self.live_viewers < self.baseline_viewers {
                let (lo, hi) = self.recovery_viewers;
                self.live_viewers += i64::from(rng.gen_range(lo..=hi));
            }
            None
        };

        TickImpact {
            churned_viewers,
            live_viewers: self.live_viewers,
            revenue_at_risk: self.revenue_at_risk,
            alert: self.derive_alert(churned_viewers),
        }
    }

    /// First match wins: churn on the current event, then the low-water
    /// viewer mark, then healthy.
    fn derive_alert(&self, churned_viewers: Option<u32>) -> Alert {
        if let Some(churn) = churned_viewers {
            Alert {
                state: HealthState::Critical,
                message: format!("Churn risk: ad buffering, {churn} viewers exited"),
            }
        } else if self.live_viewers < self.low_water_viewers {
            Alert {
                state: HealthState::Degraded,
                message: "Viewer count dropped after poor ad experience".to_string(),
            }
        } else {
            Alert {
                state: HealthState::Healthy,
                message: "Ad experience optimal".to_string(),
            }
        }
    }

    /// Standing alert between ticks, with no churn in flight.
    pub fn current_alert(&self) -> Alert {
        self.derive_alert(None)
    }

    pub fn live_viewers(&self) -> i64 {
        self.live_viewers
    }

    pub fn revenue_at_risk(&self) -> f64 {
        self.revenue_at_risk
    }
}
