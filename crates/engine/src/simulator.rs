//! Single-stream telemetry source.
//!
//! Two macro-states, `Content` and `AdBreak`, advancing exactly one step per
//! tick. Ad breaks open on a probabilistic SCTE-35 trigger and run down a
//! fixed duration; chaos mode injects absent signal payloads and ad latency
//! spikes. All randomness flows through one seeded `StdRng`, so equal seed
//! and config reproduce the event sequence byte for byte.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use qoe_core::{EventKind, SessionConfig, TelemetryEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SpliceState {
    Content,
    AdBreak { remaining_ms: f64 },
}

pub struct StreamSimulator {
    stream_id: String,
    state: SpliceState,
    sequence_id: u64,
    next_timestamp: DateTime<Utc>,
    tick_step: TimeDelta,
    tick_ms: f64,
    ad_break_ms: f64,
    chaos_mode: bool,
    trigger_probability: f64,
    signal_fail_probability: f64,
    latency_chaos_probability: f64,
    latency: Normal<f64>,
    latency_penalty_ms: f64,
    rng: StdRng,
}

impl StreamSimulator {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(config.seed))
    }

    /// Build with an explicit random source. Two simulators constructed from
    /// the same config and rng state emit identical event sequences.
    pub fn with_rng(config: &SessionConfig, rng: StdRng) -> Self {
        let mean = if config.latency_mean_ms.is_finite() {
            config.latency_mean_ms
        } else {
            200.0
        };
        let std_dev = if config.latency_std_dev_ms.is_finite() {
            config.latency_std_dev_ms.max(0.0)
        } else {
            20.0
        };
        let latency = Normal::new(mean, std_dev).expect("sanitized latency model parameters");

        Self {
            stream_id: config.stream_id.clone(),
            state: SpliceState::Content,
            sequence_id: 0,
            next_timestamp: config.origin,
            tick_step: TimeDelta::milliseconds(config.tick_period.as_millis() as i64),
            tick_ms: config.tick_period.as_millis() as f64,
            ad_break_ms: config.ad_break_duration.as_millis() as f64,
            chaos_mode: config.chaos_mode,
            trigger_probability: config.trigger_probability.clamp(0.0, 1.0),
            signal_fail_probability: config.signal_fail_probability.clamp(0.0, 1.0),
            latency_chaos_probability: config.latency_chaos_probability.clamp(0.0, 1.0),
            latency,
            latency_penalty_ms: config.latency_penalty_ms,
            rng,
        }
    }

    /// Advance one tick and emit the next event.
    ///
    /// Content ticks may open an ad break (`scte35_trigger`); ad-break ticks
    /// burn down the remaining duration and the tick that exhausts it emits
    /// `ad_complete` while transitioning back to content. The latency spike
    /// roll only applies to ticks that started inside an ad break, so the
    /// trigger tick itself is not eligible.
    pub fn tick(&mut self) -> TelemetryEvent {
        let started_in_ad_break = matches!(self.state, SpliceState::AdBreak { .. });

        let (event_kind, signal_payload) = match self.state {
            SpliceState::Content => {
                if self.rng.gen_bool(self.trigger_probability) {
                    self.state = SpliceState::AdBreak {
                        remaining_ms: self.ad_break_ms,
                    };
                    let payload = self.splice_payload();
                    if payload.is_none() {
                        debug!(
                            stream = %self.stream_id,
                            seq = self.sequence_id,
                            "scte35 trigger without payload"
                        );
                    }
                    (EventKind::Scte35Trigger, payload)
                } else {
                    (EventKind::ContentPlaying, None)
                }
            }
            SpliceState::AdBreak { remaining_ms } => {
                let remaining_ms = remaining_ms - self.tick_ms;
                if remaining_ms <= 0.0 {
                    self.state = SpliceState::Content;
                    (EventKind::AdComplete, None)
                } else {
                    self.state = SpliceState::AdBreak { remaining_ms };
                    (EventKind::AdPlaying, None)
                }
            }
        };

        let mut latency_ms = self.latency.sample(&mut self.rng).max(0.0);
        if self.chaos_mode
            && started_in_ad_break
            && self.rng.gen_bool(self.latency_chaos_probability)
        {
            latency_ms += self.latency_penalty_ms;
        }

        let event = TelemetryEvent {
            stream_id: self.stream_id.clone(),
            timestamp: self.next_timestamp,
            sequence_id: self.sequence_id,
            event_kind,
            signal_payload,
            latency_ms,
        };

        self.sequence_id += 1;
        self.next_timestamp = self.next_timestamp + self.tick_step;
        event
    }

    pub fn in_ad_break(&self) -> bool {
        matches!(self.state, SpliceState::AdBreak { .. })
    }

    fn splice_payload(&mut self) -> Option<String> {
        if self.chaos_mode && self.rng.gen_bool(self.signal_fail_probability) {
            return None;
        }
        Some(self.mock_payload())
    }

    // Mock SCTE-35 token: splice_info_section table id prefix plus 8 random
    // hex chars. Nothing downstream parses it, presence is all that matters.
    fn mock_payload(&mut self) -> String {
        const HEX: &[u8] = b"0123456789ABCDEF";
        let mut token = String::from("0xFC30");
        for _ in 0..8 {
            let idx = self.rng.gen_range(0..HEX.len());
            token.push(HEX[idx] as char);
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn test_config() -> SessionConfig {
        SessionConfig {
            origin: Utc.with_ymd_and_hms(2026, 2, 8, 23, 30, 0).unwrap(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn identical_seeds_reproduce_the_event_sequence() {
        let config = test_config();
        let mut a = StreamSimulator::new(&config);
        let mut b = StreamSimulator::new(&config);

        for _ in 0..200 {
            let ea = a.tick();
            let eb = b.tick();
            assert_eq!(
                serde_json::to_string(&ea).unwrap(),
                serde_json::to_string(&eb).unwrap()
            );
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let config = test_config();
        let mut a = StreamSimulator::new(&config);
        let mut b = StreamSimulator::new(&SessionConfig {
            seed: config.seed + 1,
            ..config.clone()
        });

        let diverged = (0..200).any(|_| {
            let ea = a.tick();
            let eb = b.tick();
            ea.event_kind != eb.event_kind || ea.latency_ms != eb.latency_ms
        });
        assert!(diverged);
    }

    #[test]
    fn sequence_ids_and_timestamps_step_uniformly() {
        let config = test_config();
        let mut sim = StreamSimulator::new(&config);

        for n in 0..50u64 {
            let event = sim.tick();
            assert_eq!(event.sequence_id, n);
            assert_eq!(
                event.timestamp,
                config.origin + TimeDelta::milliseconds(2_000 * n as i64)
            );
            assert_eq!(event.stream_id, config.stream_id);
        }
    }

    #[test]
    fn forced_trigger_runs_a_full_ad_break() {
        let config = SessionConfig {
            trigger_probability: 1.0,
            chaos_mode: false,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        let trigger = sim.tick();
        assert_eq!(trigger.event_kind, EventKind::Scte35Trigger);
        assert!(trigger.signal_payload.is_some());
        assert!(sim.in_ad_break());

        // 30 s break at a 2 s tick: 14 ad segments, then completion
        for _ in 0..14 {
            assert_eq!(sim.tick().event_kind, EventKind::AdPlaying);
        }
        let complete = sim.tick();
        assert_eq!(complete.event_kind, EventKind::AdComplete);
        assert!(!sim.in_ad_break());

        // immediately retriggers with probability one
        assert_eq!(sim.tick().event_kind, EventKind::Scte35Trigger);
    }

    #[test]
    fn content_only_stream_without_triggers() {
        let config = SessionConfig {
            trigger_probability: 0.0,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        for _ in 0..100 {
            let event = sim.tick();
            assert_eq!(event.event_kind, EventKind::ContentPlaying);
            assert!(event.signal_payload.is_none());
        }
    }

    #[test]
    fn payload_token_shape() {
        let config = SessionConfig {
            trigger_probability: 1.0,
            chaos_mode: false,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        let payload = sim.tick().signal_payload.unwrap();
        assert!(payload.starts_with("0xFC30"));
        assert_eq!(payload.len(), 14);
        assert!(payload[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn chaos_drops_every_payload_at_probability_one() {
        let config = SessionConfig {
            trigger_probability: 1.0,
            chaos_mode: true,
            signal_fail_probability: 1.0,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        let trigger = sim.tick();
        assert_eq!(trigger.event_kind, EventKind::Scte35Trigger);
        assert!(trigger.signal_payload.is_none());
    }

    #[test]
    fn chaos_off_never_drops_payloads() {
        let config = SessionConfig {
            trigger_probability: 1.0,
            chaos_mode: false,
            signal_fail_probability: 1.0,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        assert!(sim.tick().signal_payload.is_some());
    }

    #[test]
    fn latency_penalty_hits_ad_ticks_but_not_the_trigger() {
        let config = SessionConfig {
            trigger_probability: 1.0,
            chaos_mode: true,
            signal_fail_probability: 0.0,
            latency_chaos_probability: 1.0,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        let trigger = sim.tick();
        assert_eq!(trigger.event_kind, EventKind::Scte35Trigger);
        assert!(trigger.latency_ms < config.latency_penalty_ms);

        for _ in 0..14 {
            let ad = sim.tick();
            assert_eq!(ad.event_kind, EventKind::AdPlaying);
            assert!(ad.latency_ms >= config.latency_penalty_ms);
        }
    }

    #[test]
    fn latency_is_never_negative() {
        let config = SessionConfig {
            latency_mean_ms: 0.0,
            latency_std_dev_ms: 500.0,
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        for _ in 0..500 {
            assert!(sim.tick().latency_ms >= 0.0);
        }
    }

    #[test]
    fn short_ad_break_completes_on_first_ad_tick() {
        let config = SessionConfig {
            trigger_probability: 1.0,
            chaos_mode: false,
            ad_break_duration: Duration::from_secs(2),
            ..test_config()
        };
        let mut sim = StreamSimulator::new(&config);

        assert_eq!(sim.tick().event_kind, EventKind::Scte35Trigger);
        assert_eq!(sim.tick().event_kind, EventKind::AdComplete);
    }
}
