//! Host boundary shapes.
//!
//! # Data Flow
//! ```text
//! host invocation payload (JSON)
//!     → inbound.rs (InvocationEvent: method, path, headers, buffered body,
//!       transport metadata)
//!     → bridge (canonical request, responder chain, materializer)
//!     → outbound.rs (HostResponse: status, flat headers, buffered body)
//!     → host invocation result
//! ```
//!
//! # Design Decisions
//! - Exactly one inbound request per invocation; no connection state
//! - Bodies cross this boundary fully buffered in both directions
//! - Header multi-valuedness survives the boundary as explicit lists

pub mod inbound;
pub mod outbound;

pub use inbound::{InvocationEvent, RequestContext, TransportInfo};
pub use outbound::{HeaderValues, HostResponse};
