//! Shared infrastructure for Wayfinder.
//!
//! - [`TracingConfig`] - Installs a `tracing` subscriber for applications and demos
//!
//! The navigation crates only emit `tracing` events; nothing is printed until
//! an application installs a subscriber, either its own or through
//! [`TracingConfig::init`].
//!
//! # Example
//!
//! ```
//! use tracing::Level;
//! use wayfinder_core::{TracingConfig, TracingFormat};
//!
//! TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("wayfinder_navigation=debug,wayfinder_routing=info")
//!     .init();
//! ```

mod tracing_config;

pub use tracing_config::{
    FormatParseError, LOG_ENV, LOG_FORMAT_ENV, TracingConfig, TracingFormat,
};
