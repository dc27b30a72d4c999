//! The dynamic render responder.
//!
//! # Responsibilities
//! - Hand the canonical request to the application's render entry point
//! - Provide the renderer a deferred client-address handle
//!
//! # Design Decisions
//! - The renderer never declines; it is the chain's terminal responder and
//!   owns error pages for unmatched routes
//! - Address resolution happens inside `ClientAddress::resolve`, so its
//!   cost (and its hard trust failures) only occur when the application
//!   actually reads the address

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::header::HeaderMap;
use http::{Request, Response};

use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::event::TransportInfo;
use crate::http::CanonicalRequest;
use crate::responders::{InvocationContext, Responder};
use crate::trust;

/// The application's render entry point.
///
/// Implemented over the compiled server bundle of the application; the
/// bridge only assumes "request in, streaming response out".
#[async_trait]
pub trait Render: Send + Sync {
    async fn render(
        &self,
        request: Request<Body>,
        client: ClientAddress,
    ) -> BridgeResult<Response<Body>>;
}

/// Deferred client-address resolution, bound to one request's headers and
/// transport metadata.
#[derive(Debug, Clone)]
pub struct ClientAddress {
    headers: HeaderMap,
    transport: TransportInfo,
    config: Arc<BridgeConfig>,
}

impl ClientAddress {
    pub fn new(headers: HeaderMap, transport: TransportInfo, config: Arc<BridgeConfig>) -> Self {
        Self {
            headers,
            transport,
            config,
        }
    }

    /// Resolve the logical client address under the trust configuration.
    /// Misconfiguration (bad depth, depth beyond the chain) fails hard.
    pub fn resolve(&self) -> BridgeResult<String> {
        trust::resolve_client_address(&self.headers, &self.transport, &self.config)
    }
}

/// Terminal responder delegating to the application renderer.
pub struct RenderResponder {
    renderer: Arc<dyn Render>,
}

impl RenderResponder {
    pub fn new(renderer: impl Render + 'static) -> Self {
        Self {
            renderer: Arc::new(renderer),
        }
    }

    pub fn from_arc(renderer: Arc<dyn Render>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl Responder for RenderResponder {
    fn name(&self) -> &str {
        "render"
    }

    async fn respond(
        &self,
        request: &CanonicalRequest,
        ctx: &InvocationContext,
    ) -> BridgeResult<Option<Response<Body>>> {
        let http_request = request.to_http_request()?;
        let client = ClientAddress::new(
            request.headers.clone(),
            ctx.transport.clone(),
            ctx.config.clone(),
        );

        let response = self.renderer.render(http_request, client).await?;
        Ok(Some(response))
    }
}
