//! Route parsing, registration and resolution for Wayfinder (Layer 1).
//!
//! `wayfinder_routing` contains the host-independent half of navigation:
//!
//! - [`uri`] - Splits a navigation target into [`SegmentDescriptor`]s
//! - [`parameters`] - Typed, ordered [`NavigationParameters`]
//! - [`destination`] - The lifecycle protocol destinations implement
//! - [`registry`] - The live [`DestinationRegistry`] of structural and on-demand routes
//! - [`resolver`] - Partitions segments and builds the normalized host path
//! - [`error`] - [`NavigationError`] and its [`ErrorKind`] taxonomy
//!
//! # Architecture
//!
//! - **Layer 1** (`wayfinder_routing`): Parsing, registry, resolution (this crate)
//! - **Layer 2** (`wayfinder_navigation`): Factories, lifecycle coordination, the navigator facade
//!
//! # Example
//!
//! ```
//! use indexmap::IndexSet;
//! use wayfinder_routing::{resolver, uri};
//!
//! let segments = uri::parse("main/details?id=3");
//! let structural: IndexSet<String> = ["main".to_string()].into_iter().collect();
//!
//! let resolution = resolver::resolve(&segments, &structural);
//! assert_eq!(resolution.path(), "//main/details");
//! assert!(resolution.is_absolute());
//! ```

/// Lifecycle protocol implemented by navigable destinations.
pub mod destination;

/// Error taxonomy for navigation failures.
pub mod error;

/// Typed navigation parameters.
pub mod parameters;

/// Live registry of known destinations.
pub mod registry;

/// Structural vs on-demand segment partitioning.
pub mod resolver;

/// Navigation target tokenizer.
pub mod uri;

pub use destination::{Destination, NavigationAware};
pub use error::{BoxError, ErrorKind, NavigationError, RegistryError, WiringError};
pub use parameters::{NavigationMode, NavigationParameters, ParameterError};
pub use registry::{
    DestinationFactory, DestinationNode, DestinationRegistry, FactoryIdentity, ItemKind,
    StructuralItem,
};
pub use resolver::Resolution;
pub use uri::{QueryParameters, SegmentDescriptor};
