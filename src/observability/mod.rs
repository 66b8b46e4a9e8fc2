//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay + HTTP layers produce:
//!     → logging.rs (structured log events, stdout + rotated file)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log files / stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every HTTP span
//! - Access tokens never appear in log fields

pub mod logging;
pub mod metrics;
