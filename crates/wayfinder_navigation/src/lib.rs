//! Destination construction, lifecycle coordination and the navigator facade (Layer 2).
//!
//! This crate drives a host UI framework's navigation with URIs:
//!
//! - [`Navigator`] - Parses a target, resolves it, and asks the host to transition
//! - [`LifecycleCoordinator`] - Turns host transition events into destination lifecycle calls
//! - [`ContainerFactory`] - Builds destinations by name through a [`Container`]
//! - [`NavigationHooks`] - Observers notified as navigations progress
//!
//! The host itself stays behind the [`NavigationHost`] trait.
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables [`testing`], an in-memory host and recording destinations
//!
//! # Example
//!
//! ```
//! # tokio_test_block_on(async {
//! use std::sync::Arc;
//! use wayfinder_navigation::container::ContainerRegistry;
//! use wayfinder_navigation::testing::{InMemoryShell, LifecycleJournal, RecordingDestination};
//! use wayfinder_navigation::Navigator;
//! use wayfinder_routing::StructuralItem;
//!
//! let journal = LifecycleJournal::new();
//! let container = ContainerRegistry::new();
//! let pages = journal.clone();
//! container.register_destination("details", move || RecordingDestination::new("details", &pages));
//! let pages = journal.clone();
//! container.register_destination("main", move || RecordingDestination::new("main", &pages));
//!
//! let shell = Arc::new(InMemoryShell::new(vec![StructuralItem::content("main")]));
//! let navigator = Navigator::new(shell.clone(), Arc::new(container));
//!
//! let result = navigator.navigate("main/details?id=3").await;
//! assert!(result.success());
//! assert_eq!(shell.stack_routes(), ["main", "details"]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`wayfinder_routing`): Parsing, registry, resolution
//! - **Layer 2** (`wayfinder_navigation`): Factories, lifecycle coordination, the navigator facade (this crate)

/// Destination containers.
pub mod container;

/// Container-backed destination factories.
pub mod factory;

/// Navigation observers.
pub mod hooks;

/// Host collaborator traits and transition events.
pub mod host;

/// Host event to lifecycle call coordination.
pub mod lifecycle;

mod navigator;
mod result;

/// In-memory host and recording destinations.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use container::{Container, ContainerError, ContainerRegistry};
pub use factory::{ContainerFactory, DestinationWiring, FactoryProvider, NoWiring};
pub use hooks::{HookRegistrationError, NavigationEvent, NavigationHooks};
pub use host::{
    NavigatedEventArgs, NavigatingEventArgs, NavigationHost, TransitionError, TransitionListener,
};
pub use lifecycle::{Episode, LifecycleCoordinator, LifecyclePhase};
pub use navigator::{BuildError, Navigator, NavigatorBuilder, NavigatorConfig};
pub use result::NavigationResult;
