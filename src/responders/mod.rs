//! Responder subsystem.
//!
//! # Data Flow
//! ```text
//! CanonicalRequest + InvocationContext
//!     → chain.rs (ordered list, linear scan)
//!         → assets.rs (client build, static files, prerendered pages)
//!         → render.rs (application render entry point, always last)
//!     → first non-decline Response wins
//! ```
//!
//! # Design Decisions
//! - Declining is the normal, silent path; only genuine faults return Err
//! - Order is fixed at construction: prerendered/static content is
//!   authoritative once built, so asset roots come before the renderer
//! - Client-address resolution is deferred: only computed when the
//!   renderer asks for it

pub mod assets;
pub mod chain;
pub mod render;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::Response;

use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::event::TransportInfo;
use crate::http::CanonicalRequest;

pub use assets::AssetRoot;
pub use chain::ResponderChain;
pub use render::{ClientAddress, Render, RenderResponder};

/// Per-invocation state a responder may need beyond the request itself.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Process-wide trust configuration.
    pub config: Arc<BridgeConfig>,
    /// Raw transport metadata from the host event.
    pub transport: TransportInfo,
    /// Host-assigned or minted invocation id, for log correlation.
    pub request_id: String,
}

/// A unit that can produce a response for a request, or decline.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short name for dispatch logging.
    fn name(&self) -> &str;

    /// Handle the request or decline with `Ok(None)`. Declining is not an
    /// error; `Err` is reserved for internal faults.
    async fn respond(
        &self,
        request: &CanonicalRequest,
        ctx: &InvocationContext,
    ) -> BridgeResult<Option<Response<Body>>>;
}
