//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bridge + responders produce:
//!     → tracing events inside a per-invocation span
//!       (request_id, method, path, status)
//!
//! Consumers:
//!     → the host's log pipeline (stdout)
//! ```
//!
//! # Design Decisions
//! - Structured events over free-form lines, for machine parsing
//! - The request id flows through the invocation span
//! - No metrics endpoint: the host owns process-level metrics

pub mod logging;
