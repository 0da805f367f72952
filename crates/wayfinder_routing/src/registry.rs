//! Live registry of known destinations.
//!
//! The [`DestinationRegistry`] tracks two kinds of routes:
//!
//! - **Structural** routes mirror the host's presentation tree. They are
//!   refreshed by [`ensure_templates_wired`](DestinationRegistry::ensure_templates_wired)
//!   before every navigation. Content leaves without a host template receive
//!   a factory-backed template.
//! - **On-demand** routes are bound by
//!   [`register_if_absent`](DestinationRegistry::register_if_absent) the first
//!   time a navigation mentions them.
//!
//! The registry is shared between the navigator and the host (which asks it
//! to [`create`](DestinationRegistry::create) destinations during a
//! transition), so it uses interior mutability.

use crate::destination::Destination;
use crate::error::{NavigationError, RegistryError, WiringError};
use core::fmt;
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// DestinationFactory
// ─────────────────────────────────────────────────────────────────────────────

/// Identity used to decide whether two factories are interchangeable.
///
/// Two factories are equivalent when they build the same route from the same
/// provider (typically the same container instance).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactoryIdentity {
    route: String,
    provider: usize,
}

impl FactoryIdentity {
    /// Creates an identity from a route and a provider address.
    pub fn new(route: impl Into<String>, provider: usize) -> Self {
        Self {
            route: route.into(),
            provider,
        }
    }

    /// Creates an identity keyed on the address of a shared provider.
    pub fn of<T: ?Sized>(route: impl Into<String>, provider: &Arc<T>) -> Self {
        Self::new(route, Arc::as_ptr(provider).cast::<()>().addr())
    }

    /// Returns the route this identity refers to.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }
}

/// Lazily constructs destinations for one route.
pub trait DestinationFactory: Send + Sync + 'static {
    /// Constructs a new destination instance.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] classifying why construction failed.
    fn create(&self) -> Result<Arc<dyn Destination>, NavigationError>;

    /// Returns the identity used for idempotent registration.
    fn identity(&self) -> FactoryIdentity;
}

// ─────────────────────────────────────────────────────────────────────────────
// Presentation tree
// ─────────────────────────────────────────────────────────────────────────────

/// Level of an item in the host's presentation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Top-level item (e.g. a flyout entry).
    Item,
    /// Grouping inside an item (e.g. a tab).
    Section,
    /// Leaf that presents a destination.
    Content,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Item => "item",
            ItemKind::Section => "section",
            ItemKind::Content => "content",
        })
    }
}

/// One entry of the host's flattened presentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralItem {
    route: Option<String>,
    kind: ItemKind,
    has_template: bool,
}

impl StructuralItem {
    /// Creates a top-level item.
    pub fn item(route: impl Into<String>) -> Self {
        Self::new(Some(route.into()), ItemKind::Item)
    }

    /// Creates a section.
    pub fn section(route: impl Into<String>) -> Self {
        Self::new(Some(route.into()), ItemKind::Section)
    }

    /// Creates a content leaf with no host template.
    pub fn content(route: impl Into<String>) -> Self {
        Self::new(Some(route.into()), ItemKind::Content)
    }

    /// Creates an item with an optional route.
    #[must_use]
    pub fn new(route: Option<String>, kind: ItemKind) -> Self {
        Self {
            route,
            kind,
            has_template: false,
        }
    }

    /// Marks the item as already carrying a host-provided template.
    #[must_use]
    pub fn with_host_template(mut self) -> Self {
        self.has_template = true;
        self
    }

    /// Returns the route, treating blank routes as absent.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route
            .as_deref()
            .filter(|route| !route.trim().is_empty())
    }

    /// Returns the item's level in the tree.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Returns `true` if the host supplies its own template for this item.
    #[must_use]
    pub fn has_host_template(&self) -> bool {
        self.has_template
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DestinationNode
// ─────────────────────────────────────────────────────────────────────────────

/// A route known to the registry.
#[derive(Clone)]
pub enum DestinationNode {
    /// A destination present in the host's presentation tree.
    Structural {
        /// The route name.
        route: String,
        /// The item's level in the tree.
        kind: ItemKind,
        /// Factory-backed template, if one was wired.
        factory: Option<Arc<dyn DestinationFactory>>,
    },
    /// A destination bound on demand.
    OnDemand {
        /// The route name.
        route: String,
        /// The bound factory.
        factory: Arc<dyn DestinationFactory>,
    },
}

impl fmt::Debug for DestinationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationNode::Structural {
                route,
                kind,
                factory,
            } => f
                .debug_struct("Structural")
                .field("route", route)
                .field("kind", kind)
                .field("has_factory", &factory.is_some())
                .finish(),
            DestinationNode::OnDemand { route, .. } => {
                f.debug_struct("OnDemand").field("route", route).finish()
            }
        }
    }
}

impl DestinationNode {
    /// Returns the route name.
    #[must_use]
    pub fn route(&self) -> &str {
        match self {
            DestinationNode::Structural { route, .. } | DestinationNode::OnDemand { route, .. } => {
                route
            }
        }
    }

    /// Returns the factory bound to this node, if any.
    #[must_use]
    pub fn factory(&self) -> Option<&Arc<dyn DestinationFactory>> {
        match self {
            DestinationNode::Structural { factory, .. } => factory.as_ref(),
            DestinationNode::OnDemand { factory, .. } => Some(factory),
        }
    }

    /// Returns `true` if the node has a factory.
    #[must_use]
    pub fn has_factory(&self) -> bool {
        self.factory().is_some()
    }

    /// Returns `true` for structural nodes.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, DestinationNode::Structural { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DestinationRegistry
// ─────────────────────────────────────────────────────────────────────────────

struct StructuralEntry {
    kind: ItemKind,
    factory: Option<Arc<dyn DestinationFactory>>,
}

/// Registry of structural and on-demand destinations.
///
/// Structural lookups take precedence over on-demand bindings with the same
/// route.
#[derive(Default)]
pub struct DestinationRegistry {
    structural: RwLock<IndexMap<String, StructuralEntry>>,
    on_demand: RwLock<IndexMap<String, Arc<dyn DestinationFactory>>>,
}

impl fmt::Debug for DestinationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationRegistry")
            .field("structural", &self.structural_routes())
            .field("on_demand", &self.on_demand.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DestinationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node registered under `route`.
    #[must_use]
    pub fn lookup(&self, route: &str) -> Option<DestinationNode> {
        if let Some(entry) = self.structural.read().get(route) {
            return Some(DestinationNode::Structural {
                route: route.to_string(),
                kind: entry.kind,
                factory: entry.factory.clone(),
            });
        }

        self.on_demand
            .read()
            .get(route)
            .map(|factory| DestinationNode::OnDemand {
                route: route.to_string(),
                factory: Arc::clone(factory),
            })
    }

    /// Binds `factory` to `route` unless the route is already bound.
    ///
    /// Re-registering a route with an equivalent factory is a no-op.
    /// Returns `true` if a new binding was created.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyRoute`] for an empty route, or
    /// [`RegistryError::ConflictingRoute`] if the route is bound to a
    /// factory with a different [`FactoryIdentity`].
    pub fn register_if_absent(
        &self,
        route: &str,
        factory: Arc<dyn DestinationFactory>,
    ) -> Result<bool, RegistryError> {
        if route.is_empty() {
            return Err(RegistryError::EmptyRoute);
        }

        let mut on_demand = self.on_demand.write();
        if let Some(existing) = on_demand.get(route) {
            if existing.identity() == factory.identity() {
                return Ok(false);
            }
            return Err(RegistryError::ConflictingRoute {
                route: route.to_string(),
            });
        }

        on_demand.insert(route.to_string(), factory);
        tracing::debug!(route, "registered on-demand destination");
        Ok(true)
    }

    /// Returns every structural and on-demand route.
    #[must_use]
    pub fn all_known_routes(&self) -> IndexSet<String> {
        let mut routes = self.structural_routes();
        routes.extend(self.on_demand.read().keys().cloned());
        routes
    }

    /// Returns the routes currently present in the presentation tree.
    #[must_use]
    pub fn structural_routes(&self) -> IndexSet<String> {
        self.structural.read().keys().cloned().collect()
    }

    /// Returns `true` if `route` is structural or bound on demand.
    #[must_use]
    pub fn contains(&self, route: &str) -> bool {
        self.structural.read().contains_key(route) || self.on_demand.read().contains_key(route)
    }

    /// Returns the number of known routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all_known_routes().len()
    }

    /// Returns `true` if no routes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structural.read().is_empty() && self.on_demand.read().is_empty()
    }

    /// Synchronizes structural routes with `tree` and wires missing templates.
    ///
    /// Every content leaf without a host template and without a previously
    /// wired factory receives `template(route)`. Factories wired in earlier
    /// passes are kept for routes still present in the tree.
    ///
    /// Returns the number of templates installed by this pass.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError::MissingRoute`] if a content leaf has no route.
    /// The registry is left unchanged in that case.
    pub fn ensure_templates_wired<F>(
        &self,
        tree: &[StructuralItem],
        template: F,
    ) -> Result<usize, WiringError>
    where
        F: Fn(&str) -> Arc<dyn DestinationFactory>,
    {
        // Validate before touching the registry so a bad tree leaves no partial state
        for (position, item) in tree.iter().enumerate() {
            if item.kind() == ItemKind::Content && item.route().is_none() {
                return Err(WiringError::MissingRoute {
                    kind: item.kind(),
                    position,
                });
            }
        }

        let mut structural = self.structural.write();
        let mut previous = core::mem::take(&mut *structural);
        let mut installed = 0;

        for item in tree {
            let Some(route) = item.route() else {
                continue;
            };

            let entry = structural
                .entry(route.to_string())
                .or_insert_with(|| StructuralEntry {
                    kind: item.kind(),
                    factory: previous.shift_remove(route).and_then(|entry| entry.factory),
                });

            if item.kind() == ItemKind::Content
                && !item.has_host_template()
                && entry.factory.is_none()
            {
                entry.factory = Some(template(route));
                installed += 1;
                tracing::trace!(route, "wired structural template");
            }
        }

        if installed > 0 {
            tracing::debug!(installed, "wired structural templates");
        }
        Ok(installed)
    }

    /// Returns the factory bound to `route`, if any.
    #[must_use]
    pub fn factory_for(&self, route: &str) -> Option<Arc<dyn DestinationFactory>> {
        self.lookup(route)
            .and_then(|node| node.factory().map(Arc::clone))
    }

    /// Constructs a destination for `route` through its bound factory.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NoPageIsRegistered`](crate::ErrorKind::NoPageIsRegistered)
    /// if the route has no factory, or whatever the factory reports.
    pub fn create(&self, route: &str) -> Result<Arc<dyn Destination>, NavigationError> {
        let factory = self
            .factory_for(route)
            .ok_or_else(|| NavigationError::no_page_registered(route))?;
        factory.create()
    }
}
