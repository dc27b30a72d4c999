//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! named environment variables (optional prefix)
//!     → loader.rs (read & parse)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → shared via Arc across invocations
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the host recycles the whole process
//!   to pick up changes, so there is no reload path
//! - All fields have defaults so a bare environment still boots
//! - Validation separates syntactic (loader) from semantic checks
//! - A limit above the host's invocation payload ceiling refuses startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_env, from_lookup, ConfigError};
pub use schema::{BridgeConfig, DEFAULT_BODY_SIZE_LIMIT, MAX_BODY_SIZE_LIMIT};
pub use validation::{validate_config, ValidationError};
