//! Configuration schema definitions.
//!
//! This module defines the trust configuration the bridge resolves once at
//! process start. All values come from named environment variables (see
//! `loader`); nothing here is re-read per request.

use url::Url;

/// Default request body size limit in bytes (512 KiB).
pub const DEFAULT_BODY_SIZE_LIMIT: usize = 524_288;

/// Hard ceiling on the body size limit. Synchronous invocation payloads on
/// the host are capped at 6 MB, so a larger configured limit can never be
/// honored and startup must refuse it.
pub const MAX_BODY_SIZE_LIMIT: usize = 6 * 1024 * 1024;

/// Default number of hops from the tail of a proxy-chain address list.
pub const DEFAULT_XFF_DEPTH: u32 = 1;

/// Trust configuration for one process lifetime.
///
/// Immutable once loaded; shared via `Arc` across invocations when the host
/// reuses the process.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Prefix the deployment applies to every variable name. Kept so
    /// request-time errors can name the exact variable to fix.
    pub env_prefix: String,

    /// Absolute origin used verbatim for every request. Set when a router in
    /// front of the deployment already terminates TLS and proxies
    /// consistently; when unset the origin is derived from request headers.
    pub origin: Option<Url>,

    /// Number of hops from the tail of the forwarded-for list to the entry
    /// considered the real client address.
    pub xff_depth: u32,

    /// Header carrying the logical client address. Lowercased at load.
    /// When configured, its absence on a request is a deployment error.
    pub address_header: Option<String>,

    /// Header carrying the forwarded protocol. Lowercased at load.
    pub protocol_header: Option<String>,

    /// Header carrying the logical host. Lowercased at load.
    pub host_header: String,

    /// Maximum accepted request body size in bytes.
    pub body_size_limit: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            env_prefix: String::new(),
            origin: None,
            xff_depth: DEFAULT_XFF_DEPTH,
            address_header: None,
            protocol_header: None,
            host_header: "host".to_string(),
            body_size_limit: DEFAULT_BODY_SIZE_LIMIT,
        }
    }
}
