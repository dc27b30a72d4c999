//! End-to-end invocation tests over a realistic site layout.

use std::sync::atomic::Ordering;

use serverless_bridge::config::BridgeConfig;
use serverless_bridge::event::HeaderValues;
use serverless_bridge::{Bridge, BridgeError};

mod common;

use common::{get_event, site_chain, site_fixture, EchoRender};

#[tokio::test]
async fn test_static_asset_wins_over_dynamic_render() {
    let root = site_fixture("static-wins");
    let (renderer, hits) = EchoRender::new();
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let response = bridge.handle(get_event("/robots.txt")).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_deref(), Some("User-agent: *\n"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_immutable_assets_get_long_lived_cache_headers() {
    let root = site_fixture("immutable-cache");
    let (renderer, _) = EchoRender::new();
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let response = bridge
        .handle(get_event("/_app/immutable/chunks/entry.js"))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers.get("cache-control"),
        Some(&HeaderValues::Single(
            "public,max-age=31536000,immutable".to_string()
        ))
    );

    // Only the version-hashed subpath is immutable.
    let response = bridge.handle(get_event("/favicon.svg")).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers.get("cache-control"), None);
}

#[tokio::test]
async fn test_prerendered_page_resolves_without_extension() {
    let root = site_fixture("prerendered");
    let (renderer, hits) = EchoRender::new();
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let response = bridge.handle(get_event("/about")).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_deref(), Some("<h1>About</h1>"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let response = bridge.handle(get_event("/")).await.unwrap();
    assert_eq!(response.body.as_deref(), Some("<h1>Home</h1>"));
}

#[tokio::test]
async fn test_unmatched_path_falls_through_to_renderer() {
    let root = site_fixture("fallthrough");
    let (renderer, hits) = EchoRender::new();
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let mut event = get_event("/app/dashboard");
    event.request_context.identity.source_ip = Some("10.0.0.5".to_string());

    let response = bridge.handle(event).await.unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_deref(), Some("dynamic"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_bypasses_asset_roots_even_when_the_path_exists() {
    let root = site_fixture("post-bypass");
    let (renderer, hits) = EchoRender::new();
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let mut event = get_event("/robots.txt");
    event.http_method = "POST".to_string();
    event.body = Some("payload".to_string());
    event.request_context.identity.source_ip = Some("10.0.0.5".to_string());

    let response = bridge.handle(event).await.unwrap();
    assert_eq!(response.body.as_deref(), Some("dynamic"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forwarded_chain_resolves_at_configured_depth() {
    let root = site_fixture("xff-depth");
    let (renderer, _) = EchoRender::new();
    let config = BridgeConfig {
        address_header: Some("x-forwarded-for".to_string()),
        xff_depth: 2,
        ..BridgeConfig::default()
    };
    let bridge = Bridge::new(config, site_chain(&root, renderer));

    let mut event = get_event("/app/profile");
    event.headers.insert(
        "x-forwarded-for".to_string(),
        "1.1.1.1, 2.2.2.2, 3.3.3.3".to_string(),
    );

    let response = bridge.handle(event).await.unwrap();
    assert_eq!(
        response.headers.get("x-client-address"),
        Some(&HeaderValues::Single("2.2.2.2".to_string()))
    );
}

#[tokio::test]
async fn test_transport_peer_used_without_configured_header() {
    let root = site_fixture("peer-fallback");
    let (renderer, _) = EchoRender::new();
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let mut event = get_event("/app/profile");
    event.request_context.identity.source_ip = Some("10.0.0.5".to_string());

    let response = bridge.handle(event).await.unwrap();
    assert_eq!(
        response.headers.get("x-client-address"),
        Some(&HeaderValues::Single("10.0.0.5".to_string()))
    );
}

#[tokio::test]
async fn test_depth_beyond_chain_fails_the_invocation() {
    let root = site_fixture("xff-too-deep");
    let (renderer, _) = EchoRender::new();
    let config = BridgeConfig {
        address_header: Some("x-forwarded-for".to_string()),
        xff_depth: 5,
        ..BridgeConfig::default()
    };
    let bridge = Bridge::new(config, site_chain(&root, renderer));

    let mut event = get_event("/app/profile");
    event
        .headers
        .insert("x-forwarded-for".to_string(), "1.1.1.1".to_string());

    let err = bridge.handle(event).await.unwrap_err();
    assert!(matches!(err, BridgeError::Configuration(_)));
}

#[tokio::test]
async fn test_oversized_body_rejected_before_any_responder_runs() {
    let root = site_fixture("oversized");
    let (renderer, hits) = EchoRender::new();
    let config = BridgeConfig {
        body_size_limit: 32,
        ..BridgeConfig::default()
    };
    let bridge = Bridge::new(config, site_chain(&root, renderer));

    let mut event = get_event("/robots.txt");
    event.http_method = "POST".to_string();
    event.body = Some("x".repeat(64));

    let response = bridge.handle(event).await.unwrap();
    assert_eq!(response.status_code, 400);
    assert_eq!(response.body.as_deref(), Some("Invalid request body"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_multiple_cookies_cross_the_boundary_as_a_list() {
    let root = site_fixture("cookies");
    let (renderer, _) = EchoRender::new();
    let renderer = renderer.with_cookies(vec![
        "session=abc; Path=/; HttpOnly",
        "theme=dark; Expires=Thu, 21 Oct 2021 07:28:00 GMT",
    ]);
    let bridge = Bridge::new(BridgeConfig::default(), site_chain(&root, renderer));

    let mut event = get_event("/app/login");
    event.request_context.identity.source_ip = Some("10.0.0.5".to_string());

    let response = bridge.handle(event).await.unwrap();
    assert_eq!(
        response.headers.get("set-cookie"),
        Some(&HeaderValues::Multiple(vec![
            "session=abc; Path=/; HttpOnly".to_string(),
            "theme=dark; Expires=Thu, 21 Oct 2021 07:28:00 GMT".to_string(),
        ]))
    );
}

#[tokio::test]
async fn test_startup_refuses_a_limit_above_the_invocation_ceiling() {
    let err = serverless_bridge::config::from_lookup("", |name| {
        (name == "BODY_SIZE_LIMIT").then(|| "7000000".to_string())
    })
    .unwrap_err();

    assert!(matches!(
        err,
        serverless_bridge::config::ConfigError::Validation(_)
    ));
}
