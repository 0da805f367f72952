//! Container collaborator used to instantiate destinations by name.
//!
//! The navigator never constructs destinations itself. It asks a
//! [`Container`] to resolve a route name and classifies the outcome (see
//! [`ContainerFactory`](crate::factory::ContainerFactory)).
//!
//! Applications with a DI framework implement [`Container`] over it.
//! Applications without one can use [`ContainerRegistry`], a plain
//! name→constructor map.
//!
//! # Resolved values
//!
//! [`Container::resolve`] returns a type-erased value. A value is a valid
//! destination when it is an `Arc<dyn Destination>` or a
//! `Box<dyn Destination>`; anything else is reported as an unregistered page.

use core::any::Any;
use core::fmt;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use wayfinder_routing::{BoxError, Destination};

/// A type-erased value produced by a container.
pub type Resolved = Box<dyn Any + Send + Sync>;

type Constructor = Arc<dyn Fn() -> Result<Resolved, BoxError> + Send + Sync>;

/// Resolves destinations by registered name.
pub trait Container: Send + Sync + 'static {
    /// Resolves a new instance registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is unknown or construction fails.
    fn resolve(&self, name: &str) -> Result<Resolved, BoxError>;

    /// Returns `true` if `name` is registered.
    fn is_registered(&self, name: &str) -> bool;
}

/// Errors raised by [`ContainerRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// Nothing is registered under the name.
    #[error("'{0}' is not registered")]
    NotRegistered(String),
}

/// A minimal name→constructor container.
///
/// # Example
///
/// ```
/// use wayfinder_navigation::container::{Container, ContainerRegistry};
/// use wayfinder_routing::{Destination, NavigationAware};
///
/// struct MainPage;
/// impl NavigationAware for MainPage {}
/// impl Destination for MainPage {}
///
/// let container = ContainerRegistry::new();
/// container.register_destination("main", || MainPage);
///
/// assert!(container.is_registered("main"));
/// assert!(container.resolve("main").is_ok());
/// ```
#[derive(Default)]
pub struct ContainerRegistry {
    constructors: RwLock<IndexMap<String, Constructor>>,
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl ContainerRegistry {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an infallible destination constructor.
    ///
    /// Registering the same name again replaces the previous constructor.
    pub fn register_destination<D, F>(&self, name: impl Into<String>, constructor: F) -> &Self
    where
        D: Destination,
        F: Fn() -> D + Send + Sync + 'static,
    {
        self.register_with(name, move || {
            let destination: Arc<dyn Destination> = Arc::new(constructor());
            Ok(Box::new(destination) as Resolved)
        })
    }

    /// Registers a destination constructor that may fail.
    pub fn register_fallible<D, E, F>(&self, name: impl Into<String>, constructor: F) -> &Self
    where
        D: Destination,
        E: Into<BoxError>,
        F: Fn() -> Result<D, E> + Send + Sync + 'static,
    {
        self.register_with(name, move || {
            let destination: Arc<dyn Destination> =
                Arc::new(constructor().map_err(Into::<BoxError>::into)?);
            Ok(Box::new(destination) as Resolved)
        })
    }

    /// Registers a raw constructor producing any value.
    pub fn register_with<F>(&self, name: impl Into<String>, constructor: F) -> &Self
    where
        F: Fn() -> Result<Resolved, BoxError> + Send + Sync + 'static,
    {
        self.constructors
            .write()
            .insert(name.into(), Arc::new(constructor));
        self
    }

    /// Returns the registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.constructors.read().keys().cloned().collect()
    }
}

impl Container for ContainerRegistry {
    fn resolve(&self, name: &str) -> Result<Resolved, BoxError> {
        // Clone out so the constructor runs without holding the lock
        let constructor = self
            .constructors
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ContainerError::NotRegistered(name.to_string()))?;
        constructor()
    }

    fn is_registered(&self, name: &str) -> bool {
        self.constructors.read().contains_key(name)
    }
}

/// Extracts a destination from a resolved value.
///
/// Returns `None` if the value is not an `Arc<dyn Destination>` or a
/// `Box<dyn Destination>`.
#[must_use]
pub fn into_destination(resolved: Resolved) -> Option<Arc<dyn Destination>> {
    match resolved.downcast::<Arc<dyn Destination>>() {
        Ok(destination) => Some(*destination),
        Err(other) => other
            .downcast::<Box<dyn Destination>>()
            .ok()
            .map(|boxed| Arc::from(*boxed)),
    }
}
