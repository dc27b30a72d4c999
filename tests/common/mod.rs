//! Shared utilities for integration testing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::{fs, process};

use async_trait::async_trait;
use axum::body::Body;
use http::{Request, Response};
use serverless_bridge::responders::ClientAddress;
use serverless_bridge::{AssetRoot, BridgeResult, InvocationEvent, Render, RenderResponder, ResponderChain};

/// Create a throwaway build-output directory with the three asset roots a
/// built site produces, plus a few representative files.
pub fn site_fixture(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "serverless-bridge-test-{}-{}",
        process::id(),
        name
    ));
    if root.exists() {
        fs::remove_dir_all(&root).unwrap();
    }

    fs::create_dir_all(root.join("client/_app/immutable/chunks")).unwrap();
    fs::write(
        root.join("client/_app/immutable/chunks/entry.js"),
        "export const start = () => {};\n",
    )
    .unwrap();
    fs::write(root.join("client/favicon.svg"), "<svg></svg>\n").unwrap();

    fs::create_dir_all(root.join("static")).unwrap();
    fs::write(root.join("static/robots.txt"), "User-agent: *\n").unwrap();

    fs::create_dir_all(root.join("prerendered")).unwrap();
    fs::write(root.join("prerendered/index.html"), "<h1>Home</h1>").unwrap();
    fs::write(root.join("prerendered/about.html"), "<h1>About</h1>").unwrap();

    root
}

/// Renderer that counts invocations, echoes the resolved client address in
/// a header, and emits any configured cookies.
pub struct EchoRender {
    hits: Arc<AtomicU32>,
    cookies: Vec<&'static str>,
}

impl EchoRender {
    pub fn new() -> (Self, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        (
            Self {
                hits: hits.clone(),
                cookies: Vec::new(),
            },
            hits,
        )
    }

    #[allow(dead_code)]
    pub fn with_cookies(mut self, cookies: Vec<&'static str>) -> Self {
        self.cookies = cookies;
        self
    }
}

#[async_trait]
impl Render for EchoRender {
    async fn render(
        &self,
        _request: Request<Body>,
        client: ClientAddress,
    ) -> BridgeResult<Response<Body>> {
        self.hits.fetch_add(1, Ordering::SeqCst);

        let mut builder = Response::builder()
            .status(200)
            .header("content-type", "text/html")
            .header("x-client-address", client.resolve()?);
        for cookie in &self.cookies {
            builder = builder.header("set-cookie", *cookie);
        }

        Ok(builder.body(Body::from("dynamic")).unwrap())
    }
}

/// The production chain shape: client assets, static files, prerendered
/// pages, renderer last.
pub fn site_chain(root: &Path, renderer: EchoRender) -> ResponderChain {
    ResponderChain::new()
        .with_maybe(
            AssetRoot::new("client", root.join("client"))
                .map(|r| r.with_immutable_cache("_app")),
        )
        .with_maybe(AssetRoot::new("static", root.join("static")))
        .with_maybe(
            AssetRoot::new("prerendered", root.join("prerendered"))
                .map(AssetRoot::with_html_fallback),
        )
        .with(RenderResponder::new(renderer))
}

/// A GET event for `path` with a host header set.
pub fn get_event(path: &str) -> InvocationEvent {
    let mut event = InvocationEvent::default();
    event.path = path.to_string();
    event
        .headers
        .insert("host".to_string(), "example.com".to_string());
    event
}
