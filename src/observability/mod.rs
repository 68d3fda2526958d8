//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! exchange gate, upstream handler
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout log collection
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every gate log line
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
