//! Error types for navigation, registration and wiring.

use crate::registry::ItemKind;
use core::fmt;

/// Boxed error used as the inner cause of navigation failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of a failed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The route has no binding, or its binding did not produce a destination.
    NoPageIsRegistered,
    /// The route is bound but constructing the destination failed.
    ErrorCreatingPage,
    /// Any other failure raised by the host or the coordinator.
    UnknownException,
    /// Another navigation was still in flight.
    NavigationInProgress,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NoPageIsRegistered => "no page is registered",
            ErrorKind::ErrorCreatingPage => "error creating page",
            ErrorKind::UnknownException => "unknown exception",
            ErrorKind::NavigationInProgress => "navigation in progress",
        };
        f.write_str(label)
    }
}

/// A navigation failure with its kind and optional inner cause.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct NavigationError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl NavigationError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an inner cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a [`NoPageIsRegistered`](ErrorKind::NoPageIsRegistered) error.
    pub fn no_page_registered(route: &str) -> Self {
        Self::new(
            ErrorKind::NoPageIsRegistered,
            format!("'{route}' could not be created; make sure it is registered for navigation"),
        )
    }

    /// Creates an [`ErrorCreatingPage`](ErrorKind::ErrorCreatingPage) error.
    pub fn error_creating_page(route: &str) -> Self {
        Self::new(
            ErrorKind::ErrorCreatingPage,
            format!("constructing '{route}' failed"),
        )
    }

    /// Creates an [`UnknownException`](ErrorKind::UnknownException) error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownException, message)
    }

    /// Creates a [`NavigationInProgress`](ErrorKind::NavigationInProgress) error.
    pub fn in_progress(target: &str) -> Self {
        Self::new(
            ErrorKind::NavigationInProgress,
            format!("cannot navigate to '{target}' while another navigation is in flight"),
        )
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the inner cause, if any.
    #[must_use]
    pub fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

/// Errors raised by [`DestinationRegistry`](crate::DestinationRegistry) registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A route name was empty.
    #[error("route name must not be empty")]
    EmptyRoute,

    /// The route is already bound to a factory that is not interchangeable.
    #[error("route '{route}' is already registered with a different factory")]
    ConflictingRoute {
        /// The conflicting route.
        route: String,
    },
}

impl From<RegistryError> for NavigationError {
    fn from(err: RegistryError) -> Self {
        NavigationError::unknown("route registration failed").with_source(err)
    }
}

/// Configuration errors found while wiring structural templates.
///
/// These indicate a malformed presentation tree and are not recoverable at
/// navigation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WiringError {
    /// A structural leaf has no route.
    #[error("every {kind} needs a route (item at position {position} has none)")]
    MissingRoute {
        /// The kind of the offending item.
        kind: ItemKind,
        /// Position of the item in the flattened presentation tree.
        position: usize,
    },
}
