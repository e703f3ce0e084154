use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::EventKind;

/// Ingestion-time validation failures.
///
/// These cover externally injected events only; the simulator produces
/// well-formed events by construction. A rejected event is reported to the
/// caller and dropped, never silently converted into a neutral event, and
/// never stops later events from being processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("negative latency sample: {0} ms")]
    NegativeLatency(f64),

    #[error("non-finite latency sample: {0}")]
    NonFiniteLatency(f64),

    #[error("signal payload present on {} event", .0.as_str())]
    PayloadOutsideTrigger(EventKind),

    #[error("timestamp regression: {got} is earlier than {prev}")]
    TimestampRegression {
        prev: DateTime<Utc>,
        got: DateTime<Utc>,
    },
}
