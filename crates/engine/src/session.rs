//! Session state machine.
//!
//! `StreamSession` owns the simulator, the analytics window, and the
//! business-impact accumulator, and advances them as one unit: simulate,
//! ingest, apply, derive. There is a single writer and no ambient state;
//! readers get cloned snapshots taken between ticks.

use chrono::{DateTime, Utc};
use qoe_core::{
    Alert, DerivedFlags, PlaybackPhase, SessionConfig, TelemetryEvent, ValidationError,
    WindowEntry,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::impact::BusinessImpactAccumulator;
use crate::simulator::StreamSimulator;
use crate::window::{AnalyticsWindow, WindowCounts};

/// The per-tick "just happened" descriptor handed to sinks and the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub event: TelemetryEvent,
    pub flags: DerivedFlags,
    pub churned_viewers: Option<u32>,
    pub live_viewers: i64,
    pub revenue_at_risk: f64,
    pub alert: Alert,
    pub phase: PlaybackPhase,
}

/// Immutable view of the session, safe to hand to a concurrent reader.
/// Always taken after a complete tick, never mid-update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub stream_id: String,
    pub taken_at: DateTime<Utc>,

    /// Window contents in arrival order, oldest first.
    pub entries: Vec<WindowEntry>,
    pub counts: WindowCounts,

    pub live_viewers: i64,
    pub revenue_at_risk: f64,
    pub alert: Alert,
    pub phase: PlaybackPhase,
}

pub struct StreamSession {
    config: SessionConfig,
    simulator: StreamSimulator,
    window: AnalyticsWindow,
    impact: BusinessImpactAccumulator,
    impact_rng: StdRng,
    last_alert: Alert,
    last_phase: PlaybackPhase,
}

impl StreamSession {
    pub fn new(config: SessionConfig) -> Self {
        let simulator = StreamSimulator::new(&config);
        let window = AnalyticsWindow::new(config.window_capacity);
        let impact = BusinessImpactAccumulator::new(&config);
        // churn/recovery draws use their own stream so externally injected
        // events cannot shift the simulator's sequence
        let impact_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let last_alert = impact.current_alert();

        Self {
            config,
            simulator,
            window,
            impact,
            impact_rng,
            last_alert,
            last_phase: PlaybackPhase::Content,
        }
    }

    /// Advance one tick: simulate the next event, then run it through the
    /// full ingest path.
    pub fn tick(&mut self) -> Result<TickReport, ValidationError> {
        let event = self.simulator.tick();
        self.ingest(event)
    }

    /// Ingest one event, simulated or externally injected. A rejected event
    /// leaves every piece of session state untouched and later calls keep
    /// working.
    pub fn ingest(&mut self, event: TelemetryEvent) -> Result<TickReport, ValidationError> {
        let flags = self.window.ingest(&event)?;
        let impact = self.impact.apply(&event, flags, &mut self.impact_rng);
        let phase = PlaybackPhase::from_kind(event.event_kind);

        self.last_alert = impact.alert.clone();
        self.last_phase = phase;

        Ok(TickReport {
            event,
            flags,
            churned_viewers: impact.churned_viewers,
            live_viewers: impact.live_viewers,
            revenue_at_risk: impact.revenue_at_risk,
            alert: impact.alert,
            phase,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stream_id: self.config.stream_id.clone(),
            taken_at: Utc::now(),
            entries: self.window.snapshot_entries(),
            counts: self.window.counts(),
            live_viewers: self.impact.live_viewers(),
            revenue_at_risk: self.impact.revenue_at_risk(),
            alert: self.last_alert.clone(),
            phase: self.last_phase,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
