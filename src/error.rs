//! Bridge-wide error definitions.

use thiserror::Error;

/// Errors that can occur while handling one host invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The deployment is set up incorrectly (bad forwarded-for depth,
    /// configured address header absent, exhausted responder chain).
    /// Never recovered per-request; propagates to the host's failure channel.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The inbound request could not be turned into a canonical request.
    /// Recovered locally into a fixed 400 response.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// A response body stream failed mid-drain.
    #[error("response stream failed: {0}")]
    Transport(#[from] axum::Error),

    /// The application's render entry point failed internally.
    #[error("render failed: {0}")]
    Render(String),
}

/// Per-request construction failures. All of these map to the early
/// rejection (400, plain text) without invoking any responder.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request body exceeds the configured size limit.
    #[error("request body is {size} bytes, limit is {limit}")]
    BodyTooLarge { size: usize, limit: usize },

    /// Body could not be decoded (bad base64 payload).
    #[error("request body could not be decoded")]
    InvalidBody,

    /// Method string is not a valid HTTP method.
    #[error("invalid request method: {0}")]
    InvalidMethod(String),

    /// No host header present and no origin override configured.
    #[error("request carries no {0} header and no origin is configured")]
    MissingHost(String),

    /// A header name or value in the event is not valid HTTP.
    #[error("invalid header in request: {0}")]
    InvalidHeader(String),

    /// The resolved origin and path do not form a usable request URL.
    #[error("could not construct request URL from {0}")]
    InvalidUrl(String),
}

/// Result type for invocation handling.
pub type BridgeResult<T> = Result<T, BridgeError>;
