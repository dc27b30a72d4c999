//! Serverless bridge for a server-rendered web application.
//!
//! Adapts an application's streaming request/response model to a host that
//! delivers one fully-buffered invocation event per request and expects one
//! fully-buffered response back.

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod observability;
pub mod responders;
pub mod trust;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use event::{HostResponse, InvocationEvent};
pub use responders::{AssetRoot, ClientAddress, Render, RenderResponder, ResponderChain};
