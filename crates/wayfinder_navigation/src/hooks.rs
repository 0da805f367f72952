//! Observer registry for navigation events.
//!
//! [`NavigationHooks`] lets an application watch navigations without taking
//! part in them: logging, analytics, breadcrumb trails. Observers receive a
//! shared [`NavigationEvent`] and match on the variants they care about.
//!
//! ```
//! use wayfinder_navigation::hooks::{NavigationEvent, NavigationHooks};
//!
//! let hooks = NavigationHooks::new();
//! hooks
//!     .register_observer("audit", |event: &NavigationEvent| {
//!         if let NavigationEvent::Failed { target, error } = event {
//!             eprintln!("navigation to {target} failed: {error}");
//!         }
//!     })
//!     .unwrap();
//!
//! assert!(hooks.contains("audit"));
//! ```

use core::fmt;
use parking_lot::RwLock;
use std::sync::Arc;
use wayfinder_routing::NavigationError;

// ─────────────────────────────────────────────────────────────────────────────
// NavigationEvent
// ─────────────────────────────────────────────────────────────────────────────

/// Event emitted by the navigator over the course of one navigation.
#[derive(Debug, Clone)]
pub enum NavigationEvent {
    /// A navigation was accepted and is about to be resolved.
    Started {
        /// The target as passed by the caller.
        target: String,
    },

    /// The target was resolved to a host path.
    Resolved {
        /// The target as passed by the caller.
        target: String,
        /// The normalized path handed to the host.
        path: String,
        /// Routes registered on demand by this navigation.
        registered: Vec<String>,
    },

    /// The active destination refused to be left.
    Cancelled {
        /// The target as passed by the caller.
        target: String,
    },

    /// The host committed the transition.
    Completed {
        /// The target as passed by the caller.
        target: String,
        /// The normalized path handed to the host.
        path: String,
    },

    /// The navigation failed.
    Failed {
        /// The target as passed by the caller.
        target: String,
        /// What went wrong.
        error: Arc<NavigationError>,
    },
}

impl NavigationEvent {
    /// Returns the caller's target for this event.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Started { target }
            | Self::Resolved { target, .. }
            | Self::Cancelled { target }
            | Self::Completed { target, .. }
            | Self::Failed { target, .. } => target,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during observer registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookRegistrationError {
    /// An observer with this name already exists.
    #[error("observer '{name}' is already registered")]
    DuplicateName {
        /// The duplicate observer name.
        name: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// NavigationHooks
// ─────────────────────────────────────────────────────────────────────────────

type Observer = Box<dyn Fn(&NavigationEvent) + Send + Sync>;

struct ObserverEntry {
    name: String,
    observer: Observer,
}

/// Named navigation observers, invoked in registration order.
///
/// Registration and emission may happen concurrently; observers run under a
/// read lock, so they must not register further observers.
#[derive(Default)]
pub struct NavigationHooks {
    entries: RwLock<Vec<ObserverEntry>>,
}

impl fmt::Debug for NavigationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .entries
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect();
        f.debug_struct("NavigationHooks")
            .field("observers", &names)
            .finish()
    }
}

impl NavigationHooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HookRegistrationError::DuplicateName`] if `name` is taken.
    pub fn register_observer<F>(
        &self,
        name: impl Into<String>,
        observer: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&NavigationEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        let mut entries = self.entries.write();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(HookRegistrationError::DuplicateName { name });
        }

        entries.push(ObserverEntry {
            name,
            observer: Box::new(observer),
        });
        Ok(self)
    }

    /// Removes the observer registered under `name`.
    ///
    /// Returns `true` if an observer was removed.
    pub fn remove(&self, name: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.name != name);
        entries.len() != before
    }

    /// Delivers `event` to every observer.
    pub fn emit(&self, event: &NavigationEvent) {
        for entry in self.entries.read().iter() {
            (entry.observer)(event);
        }
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns `true` if an observer named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().iter().any(|entry| entry.name == name)
    }
}
