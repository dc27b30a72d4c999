//! Origin and client-address resolution.
//!
//! # Responsibilities
//! - Derive the logical scheme+host for absolute URL construction
//! - Derive the logical client address under the configured trust policy
//! - Walk the forwarded-for chain at exactly the configured depth
//!
//! # Design Decisions
//! - Depth or header misconfiguration is a hard failure, never a fallback:
//!   silently picking the wrong entry lets a client spoof a trusted address
//! - Resolution is pure over (headers, transport, config); nothing ambient

use http::header::HeaderMap;
use url::Url;

use crate::config::loader::{ENV_ADDRESS_HEADER, ENV_XFF_DEPTH};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult, RequestError};
use crate::event::TransportInfo;

/// The well-known proxy-chain header. Only this header gets list parsing;
/// any other configured address header is read verbatim.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolve the origin (scheme + host) for this request.
///
/// A configured absolute origin wins for every request. Otherwise the scheme
/// comes from the configured protocol header (default `https`) and the host
/// from the configured host header.
pub fn resolve_origin(headers: &HeaderMap, config: &BridgeConfig) -> BridgeResult<Url> {
    if let Some(origin) = &config.origin {
        return Ok(origin.clone());
    }

    let scheme = config
        .protocol_header
        .as_deref()
        .and_then(|name| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .unwrap_or("https");

    let host = headers
        .get(config.host_header.as_str())
        .ok_or_else(|| RequestError::MissingHost(config.host_header.clone()))?
        .to_str()
        .map_err(|_| RequestError::InvalidHeader(config.host_header.clone()))?;

    Url::parse(&format!("{scheme}://{host}"))
        .map_err(|_| RequestError::InvalidHeader(config.host_header.clone()).into())
}

/// Resolve the logical client address.
///
/// With a configured address header the header is authoritative; for the
/// well-known proxy-chain header the entry at `len - depth` is selected.
/// Without one, the raw transport peer is used.
pub fn resolve_client_address(
    headers: &HeaderMap,
    transport: &TransportInfo,
    config: &BridgeConfig,
) -> BridgeResult<String> {
    let Some(name) = &config.address_header else {
        return transport.peer().map(str::to_string).ok_or_else(|| {
            BridgeError::Configuration(
                "no address header configured and the host supplied no peer address".to_string(),
            )
        });
    };

    if name == FORWARDED_FOR && config.xff_depth < 1 {
        return Err(BridgeError::Configuration(format!(
            "{}{} must be a positive integer",
            config.env_prefix, ENV_XFF_DEPTH
        )));
    }

    let value = headers
        .get(name.as_str())
        .ok_or_else(|| absent_address_header(config, name))?
        .to_str()
        .map_err(|_| RequestError::InvalidHeader(name.clone()))?;

    if name != FORWARDED_FOR {
        return Ok(value.to_string());
    }

    // The chain is ordered original client → nearest proxy, so depth counts
    // from the tail.
    let addresses: Vec<&str> = value.split(',').collect();
    let depth = config.xff_depth as usize;

    if depth > addresses.len() {
        return Err(BridgeError::Configuration(format!(
            "{}{} is {}, but only found {} addresses",
            config.env_prefix,
            ENV_XFF_DEPTH,
            depth,
            addresses.len()
        )));
    }

    Ok(addresses[addresses.len() - depth].trim().to_string())
}

/// Check that a configured address header actually arrived on this request.
///
/// Called eagerly by the bridge before dispatch: absence indicates the
/// deployment is misconfigured relative to its proxy setup, which must
/// fail the invocation rather than surface later (or never, if the
/// renderer happens not to read the address).
pub fn require_address_header(headers: &HeaderMap, config: &BridgeConfig) -> BridgeResult<()> {
    if let Some(name) = &config.address_header {
        if !headers.contains_key(name.as_str()) {
            return Err(absent_address_header(config, name));
        }
    }
    Ok(())
}

fn absent_address_header(config: &BridgeConfig, name: &str) -> BridgeError {
    BridgeError::Configuration(format!(
        "address header was specified with {}{}={} but is absent from request",
        config.env_prefix, ENV_ADDRESS_HEADER, name
    ))
}
