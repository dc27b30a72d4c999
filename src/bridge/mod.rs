//! Invocation bridge subsystem.
//!
//! # Data Flow
//! ```text
//! host event
//!     → handler.rs (origin → canonical request → size policy
//!       → address-header presence → responder chain → materializer)
//!     → host response
//! ```
//!
//! # Design Decisions
//! - One inbound request per invocation; the bridge owns the event for
//!   its duration
//! - Request errors collapse to a fixed 400; configuration and transport
//!   errors propagate, because the host owns failure reporting and retry

pub mod handler;

pub use handler::Bridge;
