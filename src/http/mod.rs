//! Canonical HTTP handling subsystem.
//!
//! # Data Flow
//! ```text
//! InvocationEvent
//!     → request.rs (canonical request: method, absolute URL, headers,
//!       size-checked buffered body)
//!     → [responder chain produces a streaming Response]
//!     → response.rs (drain stream, flatten headers)
//!     → cookies.rs (split combined set-cookie lines)
//!     → MaterializedResponse → host encoding
//! ```

pub mod cookies;
pub mod request;
pub mod response;

pub use cookies::split_set_cookie;
pub use request::CanonicalRequest;
pub use response::{materialize, MaterializedResponse};
