//! The navigation facade.
//!
//! [`Navigator`] ties the layers together. One call to
//! [`navigate_with`](Navigator::navigate_with):
//!
//! 1. wires templates onto the host's structural leaves,
//! 2. parses the target and opens a lifecycle episode (rejecting the call if
//!    another navigation is in flight),
//! 3. resolves the segments against the structural routes and registers the
//!    remaining ones as on-demand destinations,
//! 4. hands the normalized path to the host and awaits the transition,
//! 5. maps the outcome to a [`NavigationResult`].
//!
//! The episode is closed on every exit path, including a dropped future.

use crate::container::Container;
use crate::factory::{DestinationWiring, FactoryProvider, NoWiring};
use crate::hooks::{NavigationEvent, NavigationHooks};
use crate::host::{NavigationHost, TransitionListener};
use crate::lifecycle::{LifecycleCoordinator, LifecyclePhase};
use crate::result::NavigationResult;
use core::fmt;
use parking_lot::Once;
use std::sync::Arc;
use tracing::Instrument;
use wayfinder_routing::{
    DestinationRegistry, NavigationError, NavigationParameters, WiringError, resolver, uri,
};

// ─────────────────────────────────────────────────────────────────────────────
// NavigatorConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Behaviour switches for a [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Run the template wiring pass for transitions the host starts itself.
    pub wire_on_host_navigation: bool,
    /// Deliver lifecycle calls to a destination's binding context as well.
    pub notify_binding_context: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            wire_on_host_navigation: true,
            notify_binding_context: true,
        }
    }
}

impl NavigatorConfig {
    /// Sets [`wire_on_host_navigation`](Self::wire_on_host_navigation).
    #[must_use]
    pub fn with_wire_on_host_navigation(mut self, enabled: bool) -> Self {
        self.wire_on_host_navigation = enabled;
        self
    }

    /// Sets [`notify_binding_context`](Self::notify_binding_context).
    #[must_use]
    pub fn with_notify_binding_context(mut self, enabled: bool) -> Self {
        self.notify_binding_context = enabled;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NavigatorBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised by [`NavigatorBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// No host was supplied.
    #[error("a navigation host is required")]
    MissingHost,
    /// No container was supplied.
    #[error("a container is required")]
    MissingContainer,
}

/// Assembles a [`Navigator`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wayfinder_navigation::container::ContainerRegistry;
/// use wayfinder_navigation::testing::InMemoryShell;
/// use wayfinder_navigation::{Navigator, NavigatorConfig};
///
/// let navigator = Navigator::builder()
///     .with_host(Arc::new(InMemoryShell::new(Vec::new())))
///     .with_container(Arc::new(ContainerRegistry::new()))
///     .with_config(NavigatorConfig::default().with_notify_binding_context(false))
///     .build()
///     .unwrap();
///
/// assert!(!navigator.is_navigating());
/// ```
#[derive(Default)]
pub struct NavigatorBuilder {
    host: Option<Arc<dyn NavigationHost>>,
    container: Option<Arc<dyn Container>>,
    wiring: Option<Arc<dyn DestinationWiring>>,
    hooks: Option<Arc<NavigationHooks>>,
    config: NavigatorConfig,
}

impl fmt::Debug for NavigatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorBuilder")
            .field("has_host", &self.host.is_some())
            .field("has_container", &self.container.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NavigatorBuilder {
    /// Sets the host whose transitions the navigator drives.
    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn NavigationHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the container destinations are resolved from.
    #[must_use]
    pub fn with_container(mut self, container: Arc<dyn Container>) -> Self {
        self.container = Some(container);
        self
    }

    /// Sets the post-construction wiring. Defaults to [`NoWiring`].
    #[must_use]
    pub fn with_wiring(mut self, wiring: Arc<dyn DestinationWiring>) -> Self {
        self.wiring = Some(wiring);
        self
    }

    /// Shares an observer registry with the navigator.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<NavigationHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Sets the behaviour switches.
    #[must_use]
    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the navigator.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the host or the container is missing.
    pub fn build(self) -> Result<Navigator, BuildError> {
        let host = self.host.ok_or(BuildError::MissingHost)?;
        let container = self.container.ok_or(BuildError::MissingContainer)?;
        let wiring = self.wiring.unwrap_or_else(|| Arc::new(NoWiring));

        Ok(Navigator::assemble(
            host,
            FactoryProvider::new(container, wiring),
            self.hooks.unwrap_or_default(),
            self.config,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigator
// ─────────────────────────────────────────────────────────────────────────────

enum Outcome {
    Committed(String),
    Cancelled,
}

/// Navigates a host by URI.
///
/// Only one navigation runs at a time; a call made while another is in flight
/// fails with [`ErrorKind::NavigationInProgress`](wayfinder_routing::ErrorKind::NavigationInProgress).
pub struct Navigator {
    host: Arc<dyn NavigationHost>,
    registry: Arc<DestinationRegistry>,
    factories: FactoryProvider,
    coordinator: Arc<LifecycleCoordinator>,
    hooks: Arc<NavigationHooks>,
    subscribed: Once,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("registry", &self.registry)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> NavigatorBuilder {
        NavigatorBuilder::default()
    }

    /// Creates a navigator with default wiring and configuration.
    pub fn new(host: Arc<dyn NavigationHost>, container: Arc<dyn Container>) -> Self {
        Self::assemble(
            host,
            FactoryProvider::new(container, Arc::new(NoWiring)),
            Arc::default(),
            NavigatorConfig::default(),
        )
    }

    fn assemble(
        host: Arc<dyn NavigationHost>,
        factories: FactoryProvider,
        hooks: Arc<NavigationHooks>,
        config: NavigatorConfig,
    ) -> Self {
        let registry = Arc::new(DestinationRegistry::new());
        let coordinator = Arc::new(LifecycleCoordinator::new(
            Arc::clone(&host),
            Arc::clone(&registry),
            factories.clone(),
            config,
        ));
        Self {
            host,
            registry,
            factories,
            coordinator,
            hooks,
            subscribed: Once::new(),
        }
    }

    /// Returns the host, subscribing the lifecycle coordinator on first access.
    pub fn shell(&self) -> &Arc<dyn NavigationHost> {
        self.subscribed.call_once(|| {
            let listener: Arc<dyn TransitionListener> = self.coordinator.clone();
            self.host.subscribe(Arc::downgrade(&listener));
            tracing::debug!("lifecycle coordinator subscribed to host");
        });
        &self.host
    }

    /// Returns the destination registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<DestinationRegistry> {
        &self.registry
    }

    /// Returns the observer registry.
    #[must_use]
    pub fn hooks(&self) -> &Arc<NavigationHooks> {
        &self.hooks
    }

    /// Returns the lifecycle coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &Arc<LifecycleCoordinator> {
        &self.coordinator
    }

    /// Returns `true` while a navigation is in flight.
    #[must_use]
    pub fn is_navigating(&self) -> bool {
        self.coordinator.is_navigating()
    }

    /// Runs the template wiring pass over the host tree.
    ///
    /// Navigation runs this pass itself; calling it at startup surfaces a
    /// malformed tree early.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError`] if a content leaf has no route.
    pub fn wire_up(&self) -> Result<usize, WiringError> {
        self.shell();
        self.coordinator.wire_templates()
    }

    /// Navigates to `target` without parameters.
    ///
    /// # Panics
    ///
    /// See [`navigate_with`](Self::navigate_with).
    pub async fn navigate(&self, target: &str) -> NavigationResult {
        self.navigate_with(target, NavigationParameters::new()).await
    }

    /// Navigates to `target`, carrying `parameters` to every destination involved.
    ///
    /// `target` is a `/`-separated path of route names, optionally prefixed
    /// with a scheme (`app://main/details?id=3`). Query parameters of each
    /// segment are merged over `parameters` for the destination entered at
    /// that segment.
    ///
    /// # Panics
    ///
    /// Panics if the host's presentation tree contains a content leaf without
    /// a route. Use [`wire_up`](Self::wire_up) to detect this at startup.
    pub async fn navigate_with(
        &self,
        target: &str,
        parameters: NavigationParameters,
    ) -> NavigationResult {
        let span = tracing::info_span!("navigate", target);
        self.run(target, parameters).instrument(span).await
    }

    async fn run(&self, target: &str, parameters: NavigationParameters) -> NavigationResult {
        match self.try_navigate(target, parameters).await {
            Ok(Outcome::Committed(path)) => {
                tracing::info!(%path, "navigation completed");
                self.hooks.emit(&NavigationEvent::Completed {
                    target: target.to_string(),
                    path,
                });
                NavigationResult::succeeded()
            }
            Ok(Outcome::Cancelled) => {
                tracing::info!("navigation cancelled");
                self.hooks.emit(&NavigationEvent::Cancelled {
                    target: target.to_string(),
                });
                NavigationResult::cancelled()
            }
            Err(error) => {
                tracing::warn!(kind = %error.kind(), error = %error, "navigation failed");
                let error = Arc::new(error);
                self.hooks.emit(&NavigationEvent::Failed {
                    target: target.to_string(),
                    error: Arc::clone(&error),
                });
                NavigationResult::failed(error)
            }
        }
    }

    async fn try_navigate(
        &self,
        target: &str,
        parameters: NavigationParameters,
    ) -> Result<Outcome, NavigationError> {
        if let Err(err) = self.wire_up() {
            panic!("malformed presentation tree: {err}");
        }

        let segments = uri::parse(target);
        if segments.is_empty() {
            return Err(NavigationError::unknown("navigation target is empty"));
        }

        let episode = self
            .coordinator
            .begin(target, segments.clone(), parameters)?;
        self.hooks.emit(&NavigationEvent::Started {
            target: target.to_string(),
        });

        let resolution = resolver::resolve(&segments, &self.registry.structural_routes());
        let registered = resolution.register(&self.registry, |segment| {
            self.factories.factory_for(segment.name())
        })?;
        let path = resolution.path().to_string();
        tracing::debug!(%path, registered = registered.len(), "resolved target");
        self.hooks.emit(&NavigationEvent::Resolved {
            target: target.to_string(),
            path: path.clone(),
            registered,
        });

        self.host.go_to(&path, &self.registry).await?;

        match episode.phase() {
            LifecyclePhase::Cancelled => Ok(Outcome::Cancelled),
            _ => Ok(Outcome::Committed(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerRegistry;
    use crate::testing::InMemoryShell;
    use wayfinder_routing::StructuralItem;

    #[test]
    fn builder_requires_host_and_container() {
        let err = Navigator::builder()
            .with_container(Arc::new(ContainerRegistry::new()))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, BuildError::MissingHost);

        let err = Navigator::builder()
            .with_host(Arc::new(InMemoryShell::new(Vec::new())))
            .build()
            .err()
            .unwrap();
        assert_eq!(err, BuildError::MissingContainer);
    }

    #[test]
    fn shell_subscribes_exactly_once() {
        let shell = Arc::new(InMemoryShell::new(Vec::new()));
        let navigator = Navigator::new(shell.clone(), Arc::new(ContainerRegistry::new()));

        assert_eq!(shell.listener_count(), 0);
        navigator.shell();
        navigator.shell();
        assert_eq!(shell.listener_count(), 1);

        drop(navigator);
        assert_eq!(shell.listener_count(), 0);
    }

    #[test]
    fn wire_up_reports_malformed_tree() {
        let shell = Arc::new(InMemoryShell::new(vec![StructuralItem::new(
            None,
            wayfinder_routing::ItemKind::Content,
        )]));
        let navigator = Navigator::new(shell, Arc::new(ContainerRegistry::new()));

        assert!(navigator.wire_up().is_err());
    }

    #[test]
    fn config_builders_toggle_switches() {
        let config = NavigatorConfig::default()
            .with_wire_on_host_navigation(false)
            .with_notify_binding_context(false);
        assert!(!config.wire_on_host_navigation);
        assert!(!config.notify_binding_context);
    }
}
