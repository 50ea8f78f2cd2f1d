//! # Flowtuple Telemetry
//!
//! Crate for logging and metrics around flowtuple decoding.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
