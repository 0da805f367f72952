//! # Wayfinder Internal Library
//!
//! Re-exports the Wayfinder crates for convenience.

/// Shared infrastructure: tracing configuration.
pub use wayfinder_core;

/// Layer 1: Parsing, registry and resolution.
pub use wayfinder_routing;

/// Layer 2: Factories, lifecycle coordination and the navigator.
pub use wayfinder_navigation;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use wayfinder_core::{TracingConfig, TracingFormat};
    pub use wayfinder_navigation::{
        Container, ContainerRegistry, DestinationWiring, LifecyclePhase, NavigationEvent,
        NavigationHooks, NavigationHost, NavigationResult, Navigator, NavigatorBuilder,
        NavigatorConfig, TransitionError, TransitionListener,
    };
    pub use wayfinder_routing::{
        Destination, ErrorKind, ItemKind, NavigationAware, NavigationError, NavigationMode,
        NavigationParameters, StructuralItem,
    };
}
