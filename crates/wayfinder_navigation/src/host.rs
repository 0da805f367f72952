//! Host collaborator: the UI framework's presentation tree and transition primitive.
//!
//! The host owns the visual navigation stack. Wayfinder only:
//!
//! - reads the flattened presentation tree ([`NavigationHost::presentation_tree`]),
//! - asks for the active destination ([`NavigationHost::current_destination`]),
//! - subscribes a [`TransitionListener`] once, lazily,
//! - requests transitions with a normalized path ([`NavigationHost::go_to`]).
//!
//! # Transition contract
//!
//! During [`go_to`](NavigationHost::go_to) the host must, on the calling task:
//!
//! 1. Call [`on_navigating`](TransitionListener::on_navigating) once per
//!    destination entered, before committing. If the event is cancelled the
//!    host stops, commits nothing, and returns `Ok(())`.
//! 2. Build destinations through the [`DestinationRegistry`] it was given.
//! 3. Commit the visual transition so that `current_destination` reports the
//!    new destination.
//! 4. Call [`on_navigated`](TransitionListener::on_navigated) once.
//!
//! Listeners must be invoked without holding host locks, since they call
//! back into [`current_destination`](NavigationHost::current_destination).
//!
//! Paths starting with `//` are absolute: the host resets to the structural
//! route named by the first segment before pushing the rest. Other paths are
//! pushed relative to the current stack.

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use wayfinder_routing::{
    BoxError, Destination, DestinationRegistry, NavigationError, NavigationMode, StructuralItem,
};

/// Cancelable event raised before a destination is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatingEventArgs {
    target: String,
    cancelled: bool,
    mode: Option<NavigationMode>,
}

impl NavigatingEventArgs {
    /// Creates an event for entering `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cancelled: false,
            mode: None,
        }
    }

    /// Returns the route being entered.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Vetoes the transition.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns `true` if a listener vetoed the transition.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Records the direction of the transition.
    pub fn set_mode(&mut self, mode: NavigationMode) {
        self.mode = Some(mode);
    }

    /// Returns the direction recorded by a listener, if any.
    #[must_use]
    pub fn mode(&self) -> Option<NavigationMode> {
        self.mode
    }
}

/// Informational event raised after a transition committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatedEventArgs {
    path: String,
}

impl NavigatedEventArgs {
    /// Creates an event for a committed transition to `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path that was committed.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Receiver of the host's pre-commit and post-commit events.
pub trait TransitionListener: Send + Sync {
    /// Called before a destination is entered. May cancel the transition.
    fn on_navigating(&self, args: &mut NavigatingEventArgs);

    /// Called once after the transition committed.
    fn on_navigated(&self, args: &NavigatedEventArgs);
}

/// Failure of a host transition.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// A destination could not be built.
    #[error(transparent)]
    Destination(#[from] NavigationError),

    /// The host itself failed.
    #[error("host transition failed: {0}")]
    Host(#[source] BoxError),
}

impl TransitionError {
    /// Wraps a host-side failure.
    pub fn host(source: impl Into<BoxError>) -> Self {
        Self::Host(source.into())
    }
}

impl From<TransitionError> for NavigationError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::Destination(err) => err,
            TransitionError::Host(source) => {
                NavigationError::unknown("host transition failed").with_source(source)
            }
        }
    }
}

/// The host UI framework's navigation surface.
#[async_trait]
pub trait NavigationHost: Send + Sync + 'static {
    /// Returns the flattened presentation tree (items, sections, contents).
    fn presentation_tree(&self) -> Vec<StructuralItem>;

    /// Returns the destination currently presented, if any.
    fn current_destination(&self) -> Option<Arc<dyn Destination>>;

    /// Subscribes a listener to transition events.
    ///
    /// The host holds the listener weakly and skips it once dropped.
    fn subscribe(&self, listener: Weak<dyn TransitionListener>);

    /// Performs a transition to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Destination`] if a destination could not be
    /// built, or [`TransitionError::Host`] for host failures.
    async fn go_to(&self, path: &str, registry: &DestinationRegistry)
    -> Result<(), TransitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_routing::ErrorKind;

    #[test]
    fn navigating_args_cancel() {
        let mut args = NavigatingEventArgs::new("details");
        assert!(!args.is_cancelled());
        args.cancel();
        assert!(args.is_cancelled());
        assert_eq!(args.target(), "details");
    }

    #[test]
    fn transition_error_preserves_destination_kind() {
        let err: NavigationError =
            TransitionError::from(NavigationError::error_creating_page("x")).into();
        assert_eq!(err.kind(), ErrorKind::ErrorCreatingPage);
    }

    #[test]
    fn host_failure_maps_to_unknown() {
        let err: NavigationError = TransitionError::host("renderer crashed").into();
        assert_eq!(err.kind(), ErrorKind::UnknownException);
        assert_eq!(
            err.inner().map(ToString::to_string).as_deref(),
            Some("renderer crashed")
        );
    }
}
