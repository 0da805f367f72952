//! Example storefront tour.
//!
//! Drives the in-memory storefront shell through a scripted list of URIs and
//! logs each outcome.
//!
//! # Usage
//!
//! ```bash
//! storefront [uri ...]
//! ```
//!
//! Without arguments a default tour runs. Logging is configured through
//! `WAYFINDER_LOG` and `WAYFINDER_LOG_FORMAT` (a `.env` file is honoured).
//!
//! # Example
//!
//! ```bash
//! WAYFINDER_LOG=info,wayfinder_navigation=debug storefront catalog "product?id=3" cart
//! ```

use example::{Session, storefront};
use std::process::ExitCode;
use wayfinder_core::TracingConfig;
use wayfinder_navigation::{NavigationEvent, NavigationHooks};

const TOUR: &[&str] = &[
    "catalog",
    "catalog/product?id=42",
    "review?product=42&draft=true",
    "cart",
    "checkout",
];

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match TracingConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            TracingConfig::default().init();
            tracing::error!(error = %err, "invalid logging configuration");
            return ExitCode::FAILURE;
        }
    };
    config.init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let targets: Vec<&str> = if args.is_empty() {
        TOUR.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    let hooks = NavigationHooks::new();
    if let Err(err) = hooks.register_observer("tour", |event: &NavigationEvent| {
        if let NavigationEvent::Resolved { path, registered, .. } = event {
            tracing::debug!(%path, ?registered, "resolved");
        }
    }) {
        tracing::error!(error = %err, "observer registration failed");
        return ExitCode::FAILURE;
    }

    let session = Session::new();
    let (shell, builder) = storefront(&session);
    let navigator = match builder.with_hooks(hooks.into()).build() {
        Ok(navigator) => navigator,
        Err(err) => {
            tracing::error!(error = %err, "navigator could not be built");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = navigator.wire_up() {
        tracing::error!(error = %err, "storefront tree is malformed");
        return ExitCode::FAILURE;
    }

    for target in targets {
        let result = navigator.navigate(target).await;
        match result.error() {
            None if result.success() => tracing::info!(target, "navigated"),
            None => tracing::info!(target, "navigation cancelled by the current page"),
            Some(err) => tracing::warn!(target, kind = %err.kind(), error = %err, "navigation failed"),
        }
    }

    tracing::info!(
        stack = ?shell.stack_routes(),
        visited = ?session.visited(),
        "tour finished"
    );
    ExitCode::SUCCESS
}
