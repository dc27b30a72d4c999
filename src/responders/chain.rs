//! Ordered responder dispatch.
//!
//! # Responsibilities
//! - Try responders strictly in configured order
//! - Short-circuit on the first produced response
//!
//! # Design Decisions
//! - A plain linear scan with early return; the set is tiny and fixed
//! - An exhausted chain is a deployment/programming error, not a 404:
//!   a correct chain always ends in the dynamic renderer

use axum::body::Body;
use http::Response;

use crate::error::{BridgeError, BridgeResult};
use crate::http::CanonicalRequest;
use crate::responders::{InvocationContext, Responder};

/// The fixed, ordered list of candidate responders.
pub struct ResponderChain {
    responders: Vec<Box<dyn Responder>>,
}

impl ResponderChain {
    pub fn new() -> Self {
        Self {
            responders: Vec::new(),
        }
    }

    /// Append a responder. Order of calls is dispatch order.
    pub fn with(mut self, responder: impl Responder + 'static) -> Self {
        self.responders.push(Box::new(responder));
        self
    }

    /// Append a responder that may not exist (e.g. an asset root whose
    /// directory was never built).
    pub fn with_maybe(self, responder: Option<impl Responder + 'static>) -> Self {
        match responder {
            Some(responder) => self.with(responder),
            None => self,
        }
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// Ask each responder in order; the first non-decline wins and the
    /// remaining responders are never invoked.
    pub async fn dispatch(
        &self,
        request: &CanonicalRequest,
        ctx: &InvocationContext,
    ) -> BridgeResult<Response<Body>> {
        for responder in &self.responders {
            if let Some(response) = responder.respond(request, ctx).await? {
                tracing::debug!(
                    request_id = %ctx.request_id,
                    responder = responder.name(),
                    status = %response.status(),
                    path = request.path(),
                    "responder matched"
                );
                return Ok(response);
            }
        }

        Err(BridgeError::Configuration(
            "responder chain exhausted: no responder produced a response".to_string(),
        ))
    }
}

impl Default for ResponderChain {
    fn default() -> Self {
        Self::new()
    }
}
