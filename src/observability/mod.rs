//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (OpenTelemetry spans, header propagation)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Trace collector (OTLP), one trace per message across the ring
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;
