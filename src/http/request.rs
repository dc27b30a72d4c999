//! Canonical request construction.
//!
//! # Responsibilities
//! - Turn one host event into a canonical HTTP request (method, absolute
//!   URL, headers, buffered body)
//! - Enforce the configured body size limit before any responder runs
//!
//! # Design Decisions
//! - The URL is absolute: origin resolution happens first, so responders
//!   and the render entry point never re-derive scheme/host
//! - A request that fails construction never reaches the chain

use axum::body::Body;
use bytes::Bytes;
use http::header::HeaderMap;
use http::{Method, Request, Uri};
use url::Url;

use crate::error::RequestError;
use crate::event::InvocationEvent;

/// One canonical HTTP request, scoped to a single invocation.
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl CanonicalRequest {
    /// Build the canonical request from a host event.
    ///
    /// `headers` is the event's already-normalized header map and `origin`
    /// the resolved scheme+host for this request. Fails when the method is
    /// not valid HTTP, the body cannot be decoded, or the body exceeds
    /// `body_size_limit`.
    pub fn from_event(
        event: &InvocationEvent,
        headers: HeaderMap,
        origin: &Url,
        body_size_limit: usize,
    ) -> Result<Self, RequestError> {
        let method = Method::from_bytes(event.http_method.as_bytes())
            .map_err(|_| RequestError::InvalidMethod(event.http_method.clone()))?;

        let mut url = origin.clone();
        url.set_path(&event.path);
        url.set_query(event.query_string.as_deref());

        let body = event.body_bytes()?;
        if let Some(bytes) = &body {
            if bytes.len() > body_size_limit {
                return Err(RequestError::BodyTooLarge {
                    size: bytes.len(),
                    limit: body_size_limit,
                });
            }
        }

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }

    /// The request path, without query.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Reassemble an `http::Request` for the render entry point.
    pub fn to_http_request(&self) -> Result<Request<Body>, RequestError> {
        let uri = Uri::try_from(self.url.as_str())
            .map_err(|_| RequestError::InvalidUrl(self.url.to_string()))?;

        let mut builder = Request::builder().method(self.method.clone()).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers.clone();
        }

        let body = match &self.body {
            Some(bytes) => Body::from(bytes.clone()),
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|_| RequestError::InvalidUrl(self.url.to_string()))
    }
}
