//! Structural vs on-demand segment partitioning.
//!
//! Given the parsed segments of a navigation target and the set of routes
//! present in the presentation tree, [`resolve`] decides:
//!
//! 1. Whether the **first** segment names a structural route. Deeper
//!    segments are never matched structurally; the presentation tree is flat
//!    at the structural level.
//! 2. Which segments must be registered as on-demand destinations (every
//!    segment left after the structural match).
//! 3. The normalized path handed to the host, with query strings stripped.
//!    A structural match makes the jump absolute and prefixes the path with
//!    `//`.

use crate::error::RegistryError;
use crate::registry::{DestinationFactory, DestinationRegistry};
use crate::uri::{self, SegmentDescriptor};
use indexmap::IndexSet;
use std::sync::Arc;

/// Outcome of resolving a navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    path: String,
    anchor: Option<String>,
    on_demand: Vec<SegmentDescriptor>,
}

impl Resolution {
    /// Returns the normalized path for the host transition primitive.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` if the jump resets to a structural anchor.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.anchor.is_some()
    }

    /// Returns the structural route matched by the first segment, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Returns the segments that need on-demand registration.
    #[must_use]
    pub fn on_demand(&self) -> &[SegmentDescriptor] {
        &self.on_demand
    }

    /// Registers every on-demand segment with a factory from `factory_for`.
    ///
    /// Registration is idempotent; segments already bound to an equivalent
    /// factory are skipped. Returns the routes newly bound by this call.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] raised by the registry.
    pub fn register<F>(
        &self,
        registry: &DestinationRegistry,
        factory_for: F,
    ) -> Result<Vec<String>, RegistryError>
    where
        F: Fn(&SegmentDescriptor) -> Arc<dyn DestinationFactory>,
    {
        let mut registered = Vec::new();
        for segment in &self.on_demand {
            if registry.register_if_absent(segment.name(), factory_for(segment))? {
                registered.push(segment.name().to_string());
            }
        }
        Ok(registered)
    }
}

/// Partitions `segments` against `structural` and builds the host path.
#[must_use]
pub fn resolve(segments: &[SegmentDescriptor], structural: &IndexSet<String>) -> Resolution {
    let anchor = segments
        .first()
        .filter(|first| structural.contains(first.name()))
        .map(|first| first.name().to_string());

    let consumed = usize::from(anchor.is_some());
    let on_demand = segments[consumed..].to_vec();

    let joined = uri::join_names(segments);
    let path = if on_demand.len() == segments.len() {
        joined
    } else {
        format!("//{joined}")
    };

    tracing::trace!(%path, anchor = ?anchor, on_demand = on_demand.len(), "resolved navigation target");

    Resolution {
        path,
        anchor,
        on_demand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{Destination, NavigationAware};
    use crate::error::NavigationError;
    use crate::registry::FactoryIdentity;

    struct Blank;
    impl NavigationAware for Blank {}
    impl Destination for Blank {}

    struct RouteFactory(String);

    impl DestinationFactory for RouteFactory {
        fn create(&self) -> Result<Arc<dyn Destination>, NavigationError> {
            Ok(Arc::new(Blank))
        }

        fn identity(&self) -> FactoryIdentity {
            FactoryIdentity::new(self.0.clone(), 0)
        }
    }

    fn factory(segment: &SegmentDescriptor) -> Arc<dyn DestinationFactory> {
        Arc::new(RouteFactory(segment.name().to_string()))
    }

    fn structural(routes: &[&str]) -> IndexSet<String> {
        routes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn structural_first_segment_makes_absolute_jump() {
        let segments = uri::parse("main/details?id=3");
        let resolution = resolve(&segments, &structural(&["main"]));

        assert_eq!(resolution.path(), "//main/details");
        assert!(resolution.is_absolute());
        assert_eq!(resolution.anchor(), Some("main"));
        assert_eq!(resolution.on_demand().len(), 1);
        assert_eq!(resolution.on_demand()[0].name(), "details");
    }

    #[test]
    fn unmatched_first_segment_is_relative() {
        let segments = uri::parse("details?id=3");
        let resolution = resolve(&segments, &structural(&["main"]));

        assert_eq!(resolution.path(), "details");
        assert!(!resolution.is_absolute());
        assert_eq!(resolution.on_demand().len(), 1);
    }

    #[test]
    fn only_first_segment_is_matched_structurally() {
        let segments = uri::parse("details/main");
        let resolution = resolve(&segments, &structural(&["main"]));

        assert_eq!(resolution.path(), "details/main");
        assert_eq!(
            resolution
                .on_demand()
                .iter()
                .map(SegmentDescriptor::name)
                .collect::<Vec<_>>(),
            ["details", "main"]
        );
    }

    #[test]
    fn lone_structural_segment_needs_no_registration() {
        let resolution = resolve(&uri::parse("main"), &structural(&["main"]));
        assert_eq!(resolution.path(), "//main");
        assert!(resolution.on_demand().is_empty());
    }

    #[test]
    fn empty_segments_resolve_to_empty_relative_path() {
        let resolution = resolve(&[], &structural(&["main"]));
        assert_eq!(resolution.path(), "");
        assert!(!resolution.is_absolute());
    }

    #[test]
    fn register_binds_on_demand_segments_once() {
        let registry = DestinationRegistry::new();
        let resolution = resolve(&uri::parse("main/details/edit"), &structural(&["main"]));

        assert_eq!(
            resolution.register(&registry, factory).unwrap(),
            ["details", "edit"]
        );
        assert!(resolution.register(&registry, factory).unwrap().is_empty());
        assert!(registry.contains("details"));
        assert!(registry.contains("edit"));
        assert!(!registry.contains("main"));
    }
}
