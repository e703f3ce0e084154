//! stream_run - drive one simulated QoE session from the terminal.
//!
//! Stands in for the dashboard layer: one JSON line per tick on stdout and a
//! final session snapshot when the loop ends. Logs go to stderr. Configured
//! through environment variables:
//!
//! - `QOE_STREAM_ID`  stream identifier
//! - `QOE_SEED`       random seed (default 42)
//! - `QOE_TICKS`      stop after this many ticks (default: run until Ctrl-C)
//! - `QOE_TICK_MS`    tick period in milliseconds (default 2000)
//! - `QOE_CHAOS`      true/false, failure injection (default true)

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use qoe_core::SessionConfig;
use qoe_engine::{SessionRunner, StreamSession, TickReport, TickSink};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Prints one JSON line per tick, the contract the excluded presentation
/// layer consumes.
struct JsonLineSink;

impl TickSink for JsonLineSink {
    fn send(&self, report: &TickReport) -> Result<(), String> {
        let line = serde_json::to_string(report).map_err(|e| e.to_string())?;
        println!("{line}");
        Ok(())
    }

    fn flush(&self) -> Result<(), String> {
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = SessionConfig::default();
    if let Ok(stream_id) = env::var("QOE_STREAM_ID") {
        config.stream_id = stream_id;
    }
    if let Some(seed) = env_parse::<u64>("QOE_SEED") {
        config.seed = seed;
    }
    if let Some(chaos) = env_parse::<bool>("QOE_CHAOS") {
        config.chaos_mode = chaos;
    }
    if let Some(tick_ms) = env_parse::<u64>("QOE_TICK_MS") {
        config.tick_period = Duration::from_millis(tick_ms);
    }
    let max_ticks = env_parse::<u64>("QOE_TICKS");

    info!(
        stream = %config.stream_id,
        seed = config.seed,
        chaos = config.chaos_mode,
        tick_ms = config.tick_period.as_millis() as u64,
        ticks = max_ticks,
        "starting session"
    );

    let session = StreamSession::new(config);
    let (runner, handle) = SessionRunner::start(session, vec![Arc::new(JsonLineSink)], max_ticks);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("stop requested");
            runner.stop();
        }
    });

    match handle.await {
        Ok(snapshot) => {
            info!(
                viewers = snapshot.live_viewers,
                revenue_at_risk = snapshot.revenue_at_risk,
                health = snapshot.alert.state.as_str(),
                window = snapshot.entries.len(),
                "session complete"
            );
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => error!(error = %e, "snapshot serialization failed"),
            }
        }
        Err(e) => error!(error = %e, "session task failed"),
    }
}
