//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at process start
//! - Honor `RUST_LOG` when set, falling back to a sane default
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Invocation-scoped fields (request id, method, path) come from the
//!   bridge's span, not from ambient state

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber.
///
/// `default_directive` applies when `RUST_LOG` is unset, e.g.
/// `"serverless_bridge=info"`.
pub fn init(default_directive: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
