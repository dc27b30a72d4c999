//! Trust subsystem: who is the client, and what origin are we serving.
//!
//! # Data Flow
//! ```text
//! request headers + transport metadata + BridgeConfig
//!     → resolver.rs (origin: scheme+host; client address: proxy chain
//!       at configured depth, or raw transport peer)
//!     → canonical URL construction / render entry point
//! ```
//!
//! # Design Decisions
//! - Trust is explicit: only the configured headers are believed, and the
//!   forwarded-for chain is only walked at the configured depth
//! - Misconfiguration fails the invocation instead of degrading, because a
//!   wrong guess here is an address-spoofing defect

pub mod resolver;

pub use resolver::{
    require_address_header, resolve_client_address, resolve_origin, FORWARDED_FOR,
};
