//! Lifecycle protocol for navigable destinations.
//!
//! A destination is anything the host can present: a page, a screen, a view.
//! Destinations opt into lifecycle callbacks by overriding the default
//! methods of [`NavigationAware`]. A destination may also expose a binding
//! context (its view model), which receives the same callbacks after the
//! destination itself.
//!
//! # Example
//!
//! ```
//! use wayfinder_routing::{Destination, NavigationAware, NavigationParameters};
//!
//! struct EditorPage {
//!     dirty: bool,
//! }
//!
//! impl NavigationAware for EditorPage {
//!     fn can_navigate(&self, _parameters: &NavigationParameters) -> bool {
//!         !self.dirty
//!     }
//! }
//!
//! impl Destination for EditorPage {}
//! ```

use crate::parameters::NavigationParameters;
use downcast_rs::{DowncastSync, impl_downcast};
use std::sync::Arc;

/// Callbacks delivered around a navigation.
///
/// All methods have permissive no-op defaults.
pub trait NavigationAware: Send + Sync {
    /// Asked on the active destination before the host commits a transition.
    ///
    /// Returning `false` vetoes the transition.
    fn can_navigate(&self, _parameters: &NavigationParameters) -> bool {
        true
    }

    /// Called on the outgoing destination after the transition committed.
    fn on_navigated_from(&self, _parameters: &NavigationParameters) {}

    /// Called on the newly active destination after the transition committed.
    fn on_navigated_to(&self, _parameters: &NavigationParameters) {}
}

/// A navigable destination.
///
/// Destinations can be downcast to their concrete type through
/// [`downcast_arc`](Destination::downcast_arc) and
/// [`downcast_ref`](Destination::downcast_ref).
pub trait Destination: NavigationAware + DowncastSync {
    /// Returns the view model bound to this destination, if any.
    fn binding_context(&self) -> Option<Arc<dyn NavigationAware>> {
        None
    }
}

impl_downcast!(sync Destination);

/// Asks a destination and its binding context whether leaving is allowed.
///
/// The binding context is only consulted when `include_context` is set and
/// the destination itself permits.
#[must_use]
pub fn can_navigate(
    destination: &dyn Destination,
    parameters: &NavigationParameters,
    include_context: bool,
) -> bool {
    if !destination.can_navigate(parameters) {
        return false;
    }
    if !include_context {
        return true;
    }
    destination
        .binding_context()
        .is_none_or(|context| context.can_navigate(parameters))
}

/// Delivers `on_navigated_from` to a destination, then to its binding context.
pub fn navigated_from(
    destination: &dyn Destination,
    parameters: &NavigationParameters,
    include_context: bool,
) {
    destination.on_navigated_from(parameters);
    if include_context && let Some(context) = destination.binding_context() {
        context.on_navigated_from(parameters);
    }
}

/// Delivers `on_navigated_to` to a destination, then to its binding context.
pub fn navigated_to(
    destination: &dyn Destination,
    parameters: &NavigationParameters,
    include_context: bool,
) {
    destination.on_navigated_to(parameters);
    if include_context && let Some(context) = destination.binding_context() {
        context.on_navigated_to(parameters);
    }
}
