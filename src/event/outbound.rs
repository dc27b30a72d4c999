//! Host response shape.
//!
//! # Responsibilities
//! - Serialize the final, fully-buffered response for the host
//! - Carry multi-valued headers (`set-cookie`) as lists, never joined
//! - Encode non-UTF-8 bodies as base64 with the flag set
//!
//! # Design Decisions
//! - An absent body stays absent on the wire; a zero-length-but-present
//!   buffer is a different (and never produced) case
//! - Header names are lowercased so the host map has one canonical key
//!   per header

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;

/// One header slot in the host response: most headers carry a single
/// string, cookie-setting headers carry an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum HeaderValues {
    Single(String),
    Multiple(Vec<String>),
}

/// The fully-buffered response returned to the host.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostResponse {
    pub status_code: u16,

    pub headers: BTreeMap<String, HeaderValues>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    pub is_base64_encoded: bool,
}

impl HostResponse {
    /// Assemble a host response from flattened parts, choosing the body
    /// encoding: UTF-8 passes through as text, anything else is base64.
    pub fn new(
        status_code: u16,
        headers: impl IntoIterator<Item = (String, HeaderValues)>,
        body: Option<Bytes>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, values)| (name.to_lowercase(), values))
            .collect();

        let (body, is_base64_encoded) = match body {
            None => (None, false),
            Some(raw) => match std::str::from_utf8(&raw) {
                Ok(text) => (Some(text.to_string()), false),
                Err(_) => (Some(BASE64.encode(&raw)), true),
            },
        };

        Self {
            status_code,
            headers,
            body,
            is_base64_encoded,
        }
    }

    /// The fixed early rejection for requests that never reach a responder.
    pub fn invalid_request_body() -> Self {
        Self::new(
            400,
            [(
                "content-type".to_string(),
                HeaderValues::Single("text/plain".to_string()),
            )],
            Some(Bytes::from_static(b"Invalid request body")),
        )
    }

    /// Serialize for the host's JSON transport.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
