//! Filesystem-backed asset responders.
//!
//! # Responsibilities
//! - Serve one root directory (client build, static files, or prerendered
//!   pages) through `tower-http`'s `ServeDir`
//! - Decline misses so the next responder gets its turn
//! - Stamp immutable cache headers on version-hashed client assets
//!
//! # Design Decisions
//! - A root that does not exist on disk never joins the chain; builds that
//!   produce no prerendered pages are common
//! - Precompressed `.gz`/`.br` siblings are preferred when the client
//!   accepts them
//! - Only GET/HEAD are served; everything else belongs to the renderer

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Body;
use http::header::{HeaderValue, CACHE_CONTROL};
use http::{Method, Request, Response, StatusCode, Uri};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::error::BridgeResult;
use crate::http::CanonicalRequest;
use crate::responders::{InvocationContext, Responder};

fn immutable_cache_value() -> HeaderValue {
    HeaderValue::from_static("public,max-age=31536000,immutable")
}

/// One static root consulted by the chain.
pub struct AssetRoot {
    name: String,
    root: PathBuf,
    service: ServeDir,
    immutable_prefix: Option<String>,
    html_fallback: bool,
}

impl AssetRoot {
    /// Wrap a root directory. Returns `None` when the directory is absent,
    /// dropping this root out of the chain entirely.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Option<Self> {
        let name = name.into();
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            tracing::debug!(root = %root.display(), responder = %name, "asset root absent, skipping");
            return None;
        }

        let service = ServeDir::new(&root)
            .precompressed_gzip()
            .precompressed_br();

        Some(Self {
            name,
            root,
            service,
            immutable_prefix: None,
            html_fallback: false,
        })
    }

    /// Stamp long-lived immutable cache headers on content under the
    /// version-hashed subpath `/{app_dir}/immutable/`.
    pub fn with_immutable_cache(mut self, app_dir: &str) -> Self {
        self.immutable_prefix = Some(format!("/{app_dir}/immutable/"));
        self
    }

    /// Retry an extensionless miss with `.html` appended. Prerendered pages
    /// are written as `<path>.html` next to their route.
    pub fn with_html_fallback(mut self) -> Self {
        self.html_fallback = true;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn lookup(
        &self,
        path: &str,
        request: &CanonicalRequest,
    ) -> Option<Response<Body>> {
        let uri = Uri::builder().path_and_query(path).build().ok()?;

        let mut probe = Request::builder().method(request.method.clone()).uri(uri);
        if let Some(headers) = probe.headers_mut() {
            // Conditional and accept-encoding headers drive 304s and
            // precompressed selection inside ServeDir.
            *headers = request.headers.clone();
        }
        let probe = probe.body(Body::empty()).ok()?;

        match self.service.clone().oneshot(probe).await {
            Ok(response) => Some(response.map(Body::new)),
            Err(infallible) => match infallible {},
        }
    }
}

#[async_trait]
impl Responder for AssetRoot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn respond(
        &self,
        request: &CanonicalRequest,
        _ctx: &InvocationContext,
    ) -> BridgeResult<Option<Response<Body>>> {
        if request.method != Method::GET && request.method != Method::HEAD {
            return Ok(None);
        }

        let path = request.path();
        let mut response = match self.lookup(path, request).await {
            Some(response) => response,
            None => return Ok(None),
        };

        if response.status() == StatusCode::NOT_FOUND && self.html_fallback {
            if let Some(fallback) = html_fallback_path(path) {
                if let Some(retry) = self.lookup(&fallback, request).await {
                    response = retry;
                }
            }
        }

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if let Some(prefix) = &self.immutable_prefix {
            if response.status().is_success() && path.starts_with(prefix.as_str()) {
                response
                    .headers_mut()
                    .insert(CACHE_CONTROL, immutable_cache_value());
            }
        }

        Ok(Some(response))
    }
}

/// `"/about"` → `"/about.html"`; paths that already carry an extension or
/// end in `/` have no fallback.
fn html_fallback_path(path: &str) -> Option<String> {
    if path.ends_with('/') {
        return None;
    }
    let last = path.rsplit('/').next().unwrap_or(path);
    if last.is_empty() || last.contains('.') {
        return None;
    }
    Some(format!("{path}.html"))
}
