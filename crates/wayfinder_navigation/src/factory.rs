//! Container-backed destination factories.
//!
//! A [`ContainerFactory`] turns a route name into a destination by resolving
//! it through the [`Container`], then hands the fresh instance to the
//! [`DestinationWiring`] collaborator before returning it.
//!
//! # Failure classification
//!
//! | Outcome | Kind |
//! |---------|------|
//! | `resolve` fails, name registered | [`ErrorCreatingPage`](ErrorKind::ErrorCreatingPage) |
//! | `resolve` fails, name not registered | [`NoPageIsRegistered`](ErrorKind::NoPageIsRegistered) |
//! | `resolve` yields a non-destination | [`NoPageIsRegistered`](ErrorKind::NoPageIsRegistered) |

use crate::container::{Container, into_destination};
use core::fmt;
use std::sync::Arc;
use wayfinder_routing::{
    Destination, DestinationFactory, ErrorKind, FactoryIdentity, NavigationError,
};

/// Post-construction wiring applied to every new destination.
///
/// Both steps run exactly once per instance, view model first, before the
/// instance is handed to the host.
pub trait DestinationWiring: Send + Sync + 'static {
    /// Attaches a view model to the destination.
    fn autowire_view_model(&self, _destination: &Arc<dyn Destination>) {}

    /// Attaches behaviors to the destination.
    fn apply_behaviors(&self, _destination: &Arc<dyn Destination>) {}
}

/// Wiring that leaves destinations untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWiring;

impl DestinationWiring for NoWiring {}

/// Builds destinations for one route through a [`Container`].
#[derive(Clone)]
pub struct ContainerFactory {
    container: Arc<dyn Container>,
    wiring: Arc<dyn DestinationWiring>,
    route: String,
}

impl fmt::Debug for ContainerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerFactory")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

impl ContainerFactory {
    /// Creates a factory for `route`.
    pub fn new(
        container: Arc<dyn Container>,
        wiring: Arc<dyn DestinationWiring>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            container,
            wiring,
            route: route.into(),
        }
    }

    /// Returns the route this factory builds.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    fn resolve(&self) -> Result<Arc<dyn Destination>, NavigationError> {
        let resolved = self.container.resolve(&self.route).map_err(|source| {
            let error = if self.container.is_registered(&self.route) {
                NavigationError::error_creating_page(&self.route)
            } else {
                NavigationError::no_page_registered(&self.route)
            };
            error.with_source(source)
        })?;

        into_destination(resolved).ok_or_else(|| {
            NavigationError::new(
                ErrorKind::NoPageIsRegistered,
                format!(
                    "'{}' did not resolve to a destination; make sure it is registered for navigation",
                    self.route
                ),
            )
        })
    }
}

impl DestinationFactory for ContainerFactory {
    fn create(&self) -> Result<Arc<dyn Destination>, NavigationError> {
        let destination = self.resolve().inspect_err(|err| {
            tracing::warn!(route = %self.route, kind = %err.kind(), "destination construction failed");
        })?;

        self.wiring.autowire_view_model(&destination);
        self.wiring.apply_behaviors(&destination);

        tracing::debug!(route = %self.route, "created destination");
        Ok(destination)
    }

    fn identity(&self) -> FactoryIdentity {
        FactoryIdentity::of(self.route.clone(), &self.container)
    }
}

/// Mints [`ContainerFactory`] instances sharing one container and wiring.
#[derive(Clone)]
pub struct FactoryProvider {
    container: Arc<dyn Container>,
    wiring: Arc<dyn DestinationWiring>,
}

impl fmt::Debug for FactoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryProvider").finish_non_exhaustive()
    }
}

impl FactoryProvider {
    /// Creates a provider over `container` and `wiring`.
    pub fn new(container: Arc<dyn Container>, wiring: Arc<dyn DestinationWiring>) -> Self {
        Self { container, wiring }
    }

    /// Returns a factory for `route`.
    ///
    /// Factories returned for the same route share a [`FactoryIdentity`], so
    /// registering them repeatedly is a no-op.
    #[must_use]
    pub fn factory_for(&self, route: &str) -> Arc<dyn DestinationFactory> {
        Arc::new(ContainerFactory::new(
            Arc::clone(&self.container),
            Arc::clone(&self.wiring),
            route,
        ))
    }
}
