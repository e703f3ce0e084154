//! Ad-insertion QoE simulation and analytics engine.
//!
//! The engine crate provides the stream simulator, the rolling analytics
//! window, and the business-impact layer that turns raw telemetry into
//! health states and alerts.
//!
//! ## Architecture
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────────┐
//!  │                      StreamSession                        │
//!  │                                                           │
//!  │  ┌─────────────┐   ┌────────────────┐   ┌─────────────┐  │
//!  │  │  Simulator  │──▶│ AnalyticsWindow│──▶│   Impact    │  │
//!  │  │ (one event  │   │ (flags + FIFO  │   │ (viewers,   │  │
//!  │  │  per tick)  │   │  aggregates)   │   │  revenue,   │  │
//!  │  └─────────────┘   └────────────────┘   │  alerts)    │  │
//!  │                                          └──────┬──────┘  │
//!  └─────────────────────────────────────────────────┼─────────┘
//!                                                    │ TickReport
//!                                                    ▼
//!                                             ┌─────────────┐
//!                                             │  TickSinks  │
//!                                             │ (present /  │
//!                                             │  inspect)   │
//!                                             └─────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use qoe_core::SessionConfig;
//! use qoe_engine::{MemorySink, SessionRunner, StreamSession};
//! use std::sync::Arc;
//!
//! let session = StreamSession::new(SessionConfig::default());
//! let sink = Arc::new(MemorySink::new());
//! let (runner, handle) = SessionRunner::start(session, vec![sink], None);
//! // ... later:
//! runner.stop();
//! let final_snapshot = handle.await?;
//! ```

pub mod impact;
pub mod pipeline;
pub mod session;
pub mod simulator;
pub mod window;

pub use impact::{BusinessImpactAccumulator, TickImpact};
pub use pipeline::{LogSink, MemorySink, SessionRunner, TickSink};
pub use session::{SessionSnapshot, StreamSession, TickReport};
pub use simulator::StreamSimulator;
pub use window::{AnalyticsWindow, WindowCounts};
