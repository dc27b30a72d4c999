//! Local development server for the serverless bridge.
//!
//! The deployed artifact is invoked by the host once per buffered event;
//! this binary puts the same bridge behind a plain HTTP listener so a built
//! site can be exercised locally:
//!
//! ```text
//!     HTTP request
//!         → event conversion (buffer body, capture peer address)
//!         → Bridge::handle (origin, canonical request, responder chain,
//!           materializer)
//!         → HostResponse re-encoded as an HTTP response
//! ```
//!
//! The dynamic responder here is a placeholder page; in a deployment the
//! application's compiled server bundle implements [`Render`].

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::Parser;
use http::{Request, Response, StatusCode};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use serverless_bridge::event::{HeaderValues, HostResponse, InvocationEvent};
use serverless_bridge::responders::ClientAddress;
use serverless_bridge::{AssetRoot, Bridge, BridgeResult, Render, RenderResponder, ResponderChain};

#[derive(Parser)]
#[command(name = "serverless-bridge")]
#[command(about = "Serve a built site through the invocation bridge", long_about = None)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,

    /// Build output directory holding client/, static/ and prerendered/.
    #[arg(long, default_value = "build")]
    out: PathBuf,

    /// Application directory name under which hashed assets live.
    #[arg(long, default_value = "_app")]
    app_dir: String,

    /// Prefix applied to every configuration variable name.
    #[arg(long, default_value = "")]
    env_prefix: String,
}

/// Stand-in for the application's compiled server bundle.
struct PlaceholderRender;

#[async_trait]
impl Render for PlaceholderRender {
    async fn render(
        &self,
        request: Request<Body>,
        client: ClientAddress,
    ) -> BridgeResult<Response<Body>> {
        let address = client.resolve()?;
        let page = format!(
            "<!doctype html><html><body><h1>serverless-bridge</h1>\
             <p>{} {} from {}</p></body></html>",
            request.method(),
            request.uri(),
            address,
        );

        let response = Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "text/html; charset=utf-8")
            .body(Body::from(page))
            .map_err(|e| serverless_bridge::BridgeError::Render(e.to_string()))?;
        Ok(response)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    serverless_bridge::observability::logging::init("serverless_bridge=debug,tower_http=debug");

    let args = Args::parse();

    tracing::info!("serverless-bridge v0.1.0 starting");

    // Fail fast: an invalid or oversized configuration refuses startup.
    let config = serverless_bridge::config::from_env(&args.env_prefix)?;

    tracing::info!(
        xff_depth = config.xff_depth,
        address_header = config.address_header.as_deref().unwrap_or("<none>"),
        body_size_limit = config.body_size_limit,
        origin = config.origin.as_ref().map(|o| o.as_str()).unwrap_or("<derived>"),
        "Configuration loaded"
    );

    let chain = ResponderChain::new()
        .with_maybe(
            AssetRoot::new("client", args.out.join("client"))
                .map(|root| root.with_immutable_cache(&args.app_dir)),
        )
        .with_maybe(AssetRoot::new("static", args.out.join("static")))
        .with_maybe(
            AssetRoot::new("prerendered", args.out.join("prerendered"))
                .map(AssetRoot::with_html_fallback),
        )
        .with(RenderResponder::new(PlaceholderRender));

    tracing::info!(responders = chain.len(), out = %args.out.display(), "Responder chain ready");

    let bridge = Arc::new(Bridge::new(config, chain));

    let app = Router::new()
        .fallback(bridge_request)
        .with_state(bridge)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&args.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Convert one HTTP request into a host event, run the bridge, and encode
/// the buffered result back into an HTTP response.
async fn bridge_request(
    State(bridge): State<Arc<Bridge>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> axum::response::Response {
    let event = match to_event(&bridge, peer, request).await {
        Ok(event) => event,
        Err(response) => return response,
    };

    match bridge.handle(event).await {
        Ok(host_response) => to_http_response(host_response),
        Err(err) => {
            // The host's invocation-failure channel, local edition.
            tracing::error!(error = %err, "invocation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

async fn to_event(
    bridge: &Bridge,
    peer: SocketAddr,
    request: Request<Body>,
) -> Result<InvocationEvent, axum::response::Response> {
    let (parts, body) = request.into_parts();

    // The host buffers bodies before this layer ever runs; emulate that,
    // bounded by the configured limit.
    let limit = bridge.config().body_size_limit;
    let bytes = axum::body::to_bytes(body, limit.saturating_add(1))
        .await
        .map_err(|_| {
            (StatusCode::BAD_REQUEST, "Invalid request body").into_response()
        })?;

    let mut multi_value_headers: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in parts.headers.iter() {
        multi_value_headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }

    let (body, is_base64_encoded) = if bytes.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(&bytes) {
            Ok(text) => (Some(text.to_string()), false),
            Err(_) => (Some(BASE64.encode(&bytes)), true),
        }
    };

    let mut event = InvocationEvent {
        http_method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query_string: parts.uri.query().map(str::to_string),
        multi_value_headers,
        body,
        is_base64_encoded,
        ..InvocationEvent::default()
    };
    event.request_context.identity.remote_addr = Some(peer.ip().to_string());

    Ok(event)
}

fn to_http_response(host: HostResponse) -> axum::response::Response {
    let mut builder = Response::builder().status(host.status_code);

    for (name, values) in &host.headers {
        match values {
            HeaderValues::Single(value) => {
                builder = builder.header(name.as_str(), value.as_str());
            }
            HeaderValues::Multiple(list) => {
                for value in list {
                    builder = builder.header(name.as_str(), value.as_str());
                }
            }
        }
    }

    let body = match host.body {
        None => Body::empty(),
        Some(text) if host.is_base64_encoded => match BASE64.decode(&text) {
            Ok(raw) => Body::from(raw),
            Err(_) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, "Bad response encoding")
                    .into_response()
            }
        },
        Some(text) => Body::from(text),
    };

    match builder.body(body) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "could not encode response");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
