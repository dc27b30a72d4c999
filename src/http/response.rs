//! Response materialization.
//!
//! # Responsibilities
//! - Drain a streaming response body into one buffered payload
//! - Flatten the header multi-map into the host's single-or-list shape
//! - Split combined `set-cookie` lines into individual values
//!
//! # Design Decisions
//! - The rendering pipeline stays stream-oriented; only this final boundary
//!   collects eagerly, because the host cannot deliver chunks
//! - A response that never yields a data frame materializes with an absent
//!   body, distinct from an empty one
//! - No cancellation point: the drain runs to completion or fails with the
//!   underlying stream error

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use http::header::{HeaderMap, SET_COOKIE};
use http::Response;
use http_body_util::BodyExt;

use crate::error::BridgeResult;
use crate::event::HeaderValues;
use crate::http::cookies::split_set_cookie;

/// A response reduced to host-acceptable parts.
#[derive(Debug, Clone)]
pub struct MaterializedResponse {
    pub status: http::StatusCode,
    pub headers: Vec<(String, HeaderValues)>,
    pub body: Option<Bytes>,
}

/// Buffer a streaming response for the host boundary.
pub async fn materialize(response: Response<Body>) -> BridgeResult<MaterializedResponse> {
    let (parts, body) = response.into_parts();

    Ok(MaterializedResponse {
        status: parts.status,
        headers: flatten_headers(&parts.headers),
        body: drain(body).await?,
    })
}

/// Pull every frame from the body, concatenating data frames in order.
/// `None` when the stream yields no data frames at all.
async fn drain(mut body: Body) -> BridgeResult<Option<Bytes>> {
    let mut buffer = BytesMut::new();
    let mut saw_data = false;

    while let Some(frame) = body.frame().await {
        let frame = frame?;
        if let Ok(data) = frame.into_data() {
            saw_data = true;
            buffer.extend_from_slice(&data);
        }
    }

    Ok(saw_data.then(|| buffer.freeze()))
}

/// Flatten the multi-map: one entry per header name, with `set-cookie`
/// carried as an ordered list of individual cookies and everything else
/// joined with `", "` per ordinary HTTP list semantics.
fn flatten_headers(headers: &HeaderMap) -> Vec<(String, HeaderValues)> {
    let mut flat = Vec::new();

    for name in headers.keys() {
        let raw: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();

        if *name == SET_COOKIE {
            let cookies: Vec<String> = raw
                .iter()
                .flat_map(|value| split_set_cookie(value))
                .collect();
            flat.push((name.as_str().to_string(), HeaderValues::Multiple(cookies)));
        } else {
            flat.push((name.as_str().to_string(), HeaderValues::Single(raw.join(", "))));
        }
    }

    flat
}
