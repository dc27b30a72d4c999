//! Per-invocation request handling.
//!
//! # Responsibilities
//! - Drive one host event through the full pipeline: origin resolution,
//!   canonical request construction, dispatch, materialization
//! - Recover request errors into the fixed early rejection
//! - Let configuration and transport errors propagate to the host
//!
//! # Design Decisions
//! - Steps run in strict sequence; the only suspension points are I/O
//!   waits inside responders and the drain
//! - The configured address header is checked eagerly even though address
//!   resolution itself is lazy, so misconfiguration surfaces on every
//!   request instead of only when the renderer reads the address

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::event::{HostResponse, InvocationEvent};
use crate::http::{materialize, CanonicalRequest};
use crate::responders::{InvocationContext, ResponderChain};
use crate::trust;

/// The entry point invoked once per host event.
pub struct Bridge {
    config: Arc<BridgeConfig>,
    chain: ResponderChain,
}

impl Bridge {
    pub fn new(config: BridgeConfig, chain: ResponderChain) -> Self {
        Self {
            config: Arc::new(config),
            chain,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handle one invocation. Two terminal outcomes: an early rejection
    /// (400, plain text, no responder invoked) for requests that fail
    /// construction, or the materialized result of the responder chain.
    /// Anything else is an `Err` for the host's failure channel.
    pub async fn handle(&self, event: InvocationEvent) -> BridgeResult<HostResponse> {
        let request_id = event
            .request_context
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "invocation",
            request_id = %request_id,
            method = %event.http_method,
            path = %event.path,
        );

        self.handle_inner(event, request_id).instrument(span).await
    }

    async fn handle_inner(
        &self,
        event: InvocationEvent,
        request_id: String,
    ) -> BridgeResult<HostResponse> {
        let request = match self.canonicalize(&event) {
            Ok(request) => request,
            Err(BridgeError::Request(err)) => {
                tracing::warn!(error = %err, "rejecting request");
                return Ok(HostResponse::invalid_request_body());
            }
            Err(other) => return Err(other),
        };

        trust::require_address_header(&request.headers, &self.config)?;

        let ctx = InvocationContext {
            config: self.config.clone(),
            transport: event.request_context.identity.clone(),
            request_id,
        };

        let response = self.chain.dispatch(&request, &ctx).await?;
        let materialized = materialize(response).await?;

        tracing::info!(status = %materialized.status, "invocation complete");

        Ok(HostResponse::new(
            materialized.status.as_u16(),
            materialized.headers,
            materialized.body,
        ))
    }

    fn canonicalize(&self, event: &InvocationEvent) -> BridgeResult<CanonicalRequest> {
        let headers = event.header_map()?;
        let origin = trust::resolve_origin(&headers, &self.config)?;
        CanonicalRequest::from_event(event, headers, &origin, self.config.body_size_limit)
            .map_err(Into::into)
    }
}
