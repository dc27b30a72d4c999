//! Host invocation event shape.
//!
//! # Responsibilities
//! - Deserialize the host-native representation of one HTTP request
//! - Normalize single- and multi-valued header maps into one `HeaderMap`
//! - Decode the buffered body (plain text or base64)
//! - Expose the transport peer address with field-priority fallback
//!
//! # Design Decisions
//! - The event is immutable; the bridge owns it for one invocation
//! - Header normalization fails hard on names/values that are not valid
//!   HTTP rather than silently dropping them

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::RequestError;

/// The host-native representation of one HTTP request.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    /// Request method, e.g. `"GET"`.
    pub http_method: String,

    /// Request path, without query string.
    pub path: String,

    /// Raw query string, without the leading `?`.
    #[serde(default)]
    pub query_string: Option<String>,

    /// Single-valued headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Multi-valued headers. Merged with `headers` during normalization;
    /// hosts populate one or both depending on integration age.
    #[serde(default)]
    pub multi_value_headers: HashMap<String, Vec<String>>,

    /// Fully-buffered body, if any.
    #[serde(default)]
    pub body: Option<String>,

    /// Whether `body` is base64-encoded binary rather than text.
    #[serde(default)]
    pub is_base64_encoded: bool,

    /// Transport metadata attached by the host.
    #[serde(default)]
    pub request_context: RequestContext,
}

/// Invocation metadata the host attaches outside the HTTP request itself.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Host-assigned invocation id, when provided.
    #[serde(default)]
    pub request_id: Option<String>,

    /// Peer socket identity, when the host exposes one.
    #[serde(default)]
    pub identity: TransportInfo,
}

/// Raw transport peer metadata.
///
/// Hosts disagree on the field name; all known spellings are modeled and
/// [`TransportInfo::peer`] picks the first present in priority order.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportInfo {
    #[serde(default)]
    pub source_ip: Option<String>,

    #[serde(default)]
    pub remote_addr: Option<String>,

    #[serde(default)]
    pub peer_addr: Option<String>,
}

impl TransportInfo {
    /// The raw peer address, trying each known field in priority order.
    pub fn peer(&self) -> Option<&str> {
        self.source_ip
            .as_deref()
            .or(self.remote_addr.as_deref())
            .or(self.peer_addr.as_deref())
    }
}

impl Default for InvocationEvent {
    fn default() -> Self {
        Self {
            http_method: "GET".to_string(),
            path: "/".to_string(),
            query_string: None,
            headers: HashMap::new(),
            multi_value_headers: HashMap::new(),
            body: None,
            is_base64_encoded: false,
            request_context: RequestContext::default(),
        }
    }
}

impl InvocationEvent {
    /// Parse an event from the host's JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Merge `headers` and `multi_value_headers` into one case-insensitive
    /// multi-map. Multi-values keep their order; the single-valued map is
    /// appended after, skipping names the multi-map already carries (hosts
    /// that populate both duplicate the first value).
    pub fn header_map(&self) -> Result<HeaderMap, RequestError> {
        let mut map = HeaderMap::new();

        for (name, values) in &self.multi_value_headers {
            let name = parse_name(name)?;
            for value in values {
                map.append(name.clone(), parse_value(value)?);
            }
        }

        for (name, value) in &self.headers {
            let name = parse_name(name)?;
            if !map.contains_key(&name) {
                map.insert(name, parse_value(value)?);
            }
        }

        Ok(map)
    }

    /// Decode the buffered body into bytes. `None` when the event carried
    /// no body at all.
    pub fn body_bytes(&self) -> Result<Option<Bytes>, RequestError> {
        match &self.body {
            None => Ok(None),
            Some(text) if self.is_base64_encoded => BASE64
                .decode(text)
                .map(|raw| Some(Bytes::from(raw)))
                .map_err(|_| RequestError::InvalidBody),
            Some(text) => Ok(Some(Bytes::copy_from_slice(text.as_bytes()))),
        }
    }
}

fn parse_name(name: &str) -> Result<HeaderName, RequestError> {
    HeaderName::try_from(name).map_err(|_| RequestError::InvalidHeader(name.to_string()))
}

fn parse_value(value: &str) -> Result<HeaderValue, RequestError> {
    HeaderValue::try_from(value).map_err(|_| RequestError::InvalidHeader(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_merge_is_case_insensitive() {
        let mut event = InvocationEvent::default();
        event
            .multi_value_headers
            .insert("X-Custom".to_string(), vec!["a".into(), "b".into()]);
        event
            .headers
            .insert("x-custom".to_string(), "a".to_string());
        event
            .headers
            .insert("Host".to_string(), "example.com".to_string());

        let map = event.header_map().unwrap();
        let values: Vec<_> = map.get_all("x-custom").iter().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(map.get("host").unwrap(), "example.com");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut event = InvocationEvent::default();
        event
            .headers
            .insert("bad name".to_string(), "v".to_string());
        assert!(matches!(
            event.header_map(),
            Err(RequestError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_body_decoding() {
        let event = InvocationEvent {
            body: Some("hello".to_string()),
            ..InvocationEvent::default()
        };
        assert_eq!(event.body_bytes().unwrap().unwrap().as_ref(), b"hello");

        let event = InvocationEvent {
            body: Some("aGVsbG8=".to_string()),
            is_base64_encoded: true,
            ..InvocationEvent::default()
        };
        assert_eq!(event.body_bytes().unwrap().unwrap().as_ref(), b"hello");

        let event = InvocationEvent {
            body: Some("!!! not base64 !!!".to_string()),
            is_base64_encoded: true,
            ..InvocationEvent::default()
        };
        assert!(matches!(
            event.body_bytes(),
            Err(RequestError::InvalidBody)
        ));

        let event = InvocationEvent::default();
        assert!(event.body_bytes().unwrap().is_none());
    }

    #[test]
    fn test_transport_peer_priority() {
        let info = TransportInfo {
            source_ip: Some("1.1.1.1".into()),
            remote_addr: Some("2.2.2.2".into()),
            peer_addr: Some("3.3.3.3".into()),
        };
        assert_eq!(info.peer(), Some("1.1.1.1"));

        let info = TransportInfo {
            source_ip: None,
            remote_addr: Some("2.2.2.2".into()),
            peer_addr: Some("3.3.3.3".into()),
        };
        assert_eq!(info.peer(), Some("2.2.2.2"));

        let info = TransportInfo {
            source_ip: None,
            remote_addr: None,
            peer_addr: Some("3.3.3.3".into()),
        };
        assert_eq!(info.peer(), Some("3.3.3.3"));

        assert_eq!(TransportInfo::default().peer(), None);
    }

    #[test]
    fn test_event_from_json() {
        let event = InvocationEvent::from_json(
            r#"{
                "httpMethod": "POST",
                "path": "/submit",
                "queryString": "a=1",
                "headers": {"host": "example.com"},
                "body": "x=y",
                "requestContext": {
                    "requestId": "abc-123",
                    "identity": {"sourceIp": "10.0.0.5"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(event.http_method, "POST");
        assert_eq!(event.path, "/submit");
        assert_eq!(event.query_string.as_deref(), Some("a=1"));
        assert_eq!(event.request_context.request_id.as_deref(), Some("abc-123"));
        assert_eq!(event.request_context.identity.peer(), Some("10.0.0.5"));
    }
}
