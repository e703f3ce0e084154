use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Full configuration surface for one simulated session.
///
/// Every knob the simulator and the analytics side consult lives here, so a
/// test can pin the stream down to a deterministic or deliberately stressed
/// shape. Defaults mirror the live demo parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Stream identifier, constant for the session.
    pub stream_id: String,

    /// Pacing between emissions. Also the per-tick time delta charged
    /// against a running ad break.
    pub tick_period: Duration,

    /// Wall-time length of an ad break once triggered.
    pub ad_break_duration: Duration,

    /// Retained event count in the analytics window. Must be at least 1;
    /// the window clamps 0 up to 1.
    pub window_capacity: usize,

    /// Enables failure injection: absent SCTE-35 payloads and ad latency
    /// spikes.
    pub chaos_mode: bool,

    /// Probability per content tick of triggering an ad break.
    pub trigger_probability: f64,

    /// Probability that a triggered break carries no signal payload
    /// (chaos mode only).
    pub signal_fail_probability: f64,

    /// Probability of an added latency penalty on a tick inside an ad break
    /// (chaos mode only). Rolled independently of the signal-failure draw.
    pub latency_chaos_probability: f64,

    /// Viewers lost on a buffering tick, drawn uniformly from this range.
    pub churn_viewers_min: u32,
    pub churn_viewers_max: u32,

    /// Dollars of revenue put at risk per churned viewer.
    pub revenue_per_lost_viewer: f64,

    /// Viewers regained on a clean tick while below baseline, drawn
    /// uniformly from this range.
    pub recovery_viewers_min: u32,
    pub recovery_viewers_max: u32,

    /// Gaussian latency model for every tick, in milliseconds.
    pub latency_mean_ms: f64,
    pub latency_std_dev_ms: f64,

    /// Flat latency added when the ad-break chaos roll hits.
    pub latency_penalty_ms: f64,

    /// Viewer count at session start; recovery stops once it is regained.
    pub baseline_viewers: i64,

    /// Below this mark the stream reports degraded health.
    pub low_water_viewers: i64,

    /// Seed for every random draw in the session. Equal seed and config
    /// reproduce the event sequence byte for byte.
    pub seed: u64,

    /// Logical start-of-stream instant; event `n` is stamped
    /// `origin + n * tick_period`.
    pub origin: DateTime<Utc>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stream_id: "nflx_live_event_superbowl_v1".to_string(),
            tick_period: Duration::from_secs(2),
            ad_break_duration: Duration::from_secs(30),
            window_capacity: 50,
            chaos_mode: true,
            trigger_probability: 0.10,
            signal_fail_probability: 0.20,
            latency_chaos_probability: 0.30,
            churn_viewers_min: 50,
            churn_viewers_max: 150,
            revenue_per_lost_viewer: 0.05,
            recovery_viewers_min: 5,
            recovery_viewers_max: 20,
            latency_mean_ms: 200.0,
            latency_std_dev_ms: 20.0,
            latency_penalty_ms: 2000.0,
            baseline_viewers: 10_000,
            low_water_viewers: 9_000,
            seed: 42,
            origin: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_demo_parameters() {
        let config = SessionConfig::default();

        assert_eq!(config.stream_id, "nflx_live_event_superbowl_v1");
        assert_eq!(config.tick_period, Duration::from_secs(2));
        assert_eq!(config.ad_break_duration, Duration::from_secs(30));
        assert_eq!(config.window_capacity, 50);
        assert!(config.chaos_mode);
        assert_eq!(config.trigger_probability, 0.10);
        assert_eq!(config.signal_fail_probability, 0.20);
        assert_eq!(config.latency_chaos_probability, 0.30);
        assert_eq!(config.churn_viewers_min, 50);
        assert_eq!(config.churn_viewers_max, 150);
        assert_eq!(config.revenue_per_lost_viewer, 0.05);
        assert_eq!(config.baseline_viewers, 10_000);
        assert_eq!(config.low_water_viewers, 9_000);
    }
}
