//! Tick fan-out and the paced driving loop.
//!
//! Sinks receive every `TickReport`; the runner owns the session, ticks it
//! on the configured period, and honors a stop request between ticks only,
//! so no event is ever half-processed.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::session::{SessionSnapshot, StreamSession, TickReport};

/// Per-tick delivery to the presentation layer.
pub trait TickSink: Send + Sync {
    /// Deliver one tick report.
    fn send(&self, report: &TickReport) -> Result<(), String>;

    /// Flush anything buffered.
    fn flush(&self) -> Result<(), String>;
}

/// In-memory sink for tests and polling readers.
pub struct MemorySink {
    reports: Mutex<Vec<TickReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
        }
    }

    pub fn reports(&self) -> Vec<TickReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.reports.lock().unwrap().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSink for MemorySink {
    fn send(&self, report: &TickReport) -> Result<(), String> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Sink that narrates each tick through tracing.
pub struct LogSink;

impl TickSink for LogSink {
    fn send(&self, report: &TickReport) -> Result<(), String> {
        info!(
            stream = %report.event.stream_id,
            seq = report.event.sequence_id,
            kind = report.event.event_kind.as_str(),
            latency_ms = report.event.latency_ms,
            viewers = report.live_viewers,
            health = report.alert.state.as_str(),
            "tick"
        );
        Ok(())
    }

    fn flush(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Paced driving loop around a `StreamSession`.
///
/// `start` spawns a task that ticks the session on its configured period and
/// fans each report out to the sinks. `stop` (or dropping the runner) ends
/// the loop after the in-flight tick; the join handle yields the final
/// snapshot once the sinks are flushed.
pub struct SessionRunner {
    stop_tx: watch::Sender<bool>,
}

impl SessionRunner {
    pub fn start(
        mut session: StreamSession,
        sinks: Vec<Arc<dyn TickSink>>,
        max_ticks: Option<u64>,
    ) -> (Self, JoinHandle<SessionSnapshot>) {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let period = session.config().tick_period;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut ticks: u64 = 0;

            loop {
                if max_ticks.is_some_and(|max| ticks >= max) {
                    break;
                }
                tokio::select! {
                    _ = ticker.tick() => {
                        match session.tick() {
                            Ok(report) => {
                                for sink in &sinks {
                                    if let Err(e) = sink.send(&report) {
                                        error!(error = %e, "tick sink failed");
                                    }
                                }
                            }
                            Err(e) => error!(error = %e, "tick rejected"),
                        }
                        ticks += 1;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            for sink in &sinks {
                if let Err(e) = sink.flush() {
                    error!(error = %e, "tick sink flush failed");
                }
            }
            info!(ticks, "session loop stopped");
            session.snapshot()
        });

        (Self { stop_tx }, handle)
    }

    /// Request a stop. Takes effect between ticks.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}
