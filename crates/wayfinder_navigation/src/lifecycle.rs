//! Lifecycle coordination between the host's transition events and destinations.
//!
//! The [`LifecycleCoordinator`] is the single listener subscribed to the host.
//! It owns the state of the navigation in flight (an *episode*) and walks it
//! through:
//!
//! ```text
//! Idle ──begin──▶ Navigating ──veto──▶ Cancelled ──▶ Idle
//!                     │
//!                     └──on_navigated──▶ Committed ──▶ Idle
//! ```
//!
//! Episodes opened by [`begin`](LifecycleCoordinator::begin) are closed when
//! the returned [`Episode`] guard drops, whichever way the navigation ends.
//! Transitions the host starts on its own (a tab tap) open an implicit episode
//! that closes itself on commit or veto.

use crate::factory::FactoryProvider;
use crate::host::{NavigatedEventArgs, NavigatingEventArgs, NavigationHost, TransitionListener};
use crate::navigator::NavigatorConfig;
use core::fmt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use wayfinder_routing::{
    Destination, DestinationRegistry, NavigationError, NavigationMode, NavigationParameters,
    SegmentDescriptor, WiringError, destination, uri,
};

// ─────────────────────────────────────────────────────────────────────────────
// LifecyclePhase
// ─────────────────────────────────────────────────────────────────────────────

/// Where the current episode stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// No navigation in flight.
    Idle,
    /// A navigation is in flight and nothing vetoed it yet.
    Navigating,
    /// The active destination vetoed the transition.
    Cancelled,
    /// The host committed the transition.
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpisodeOrigin {
    /// Opened by a navigator call.
    Request,
    /// Opened by a host event nobody requested.
    Host,
}

/// State carried from the navigator call through the host callbacks.
///
/// The outgoing destination is held strongly: hosts may release it as soon
/// as the transition commits, before `on_navigated_from` reaches it.
struct PendingNavigationState {
    origin: EpisodeOrigin,
    phase: LifecyclePhase,
    current_destination: Option<Arc<dyn Destination>>,
    current_parameters: NavigationParameters,
    remaining: VecDeque<SegmentDescriptor>,
}

impl PendingNavigationState {
    fn new(
        origin: EpisodeOrigin,
        current: Option<&Arc<dyn Destination>>,
        parameters: NavigationParameters,
        segments: Vec<SegmentDescriptor>,
    ) -> Self {
        Self {
            origin,
            phase: LifecyclePhase::Navigating,
            current_destination: current.cloned(),
            current_parameters: parameters,
            remaining: segments.into(),
        }
    }

    fn outgoing(&self) -> Option<Arc<dyn Destination>> {
        self.current_destination.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LifecycleCoordinator
// ─────────────────────────────────────────────────────────────────────────────

/// Drives destination lifecycle calls from host transition events.
///
/// Destination code runs without the coordinator's lock held, so lifecycle
/// callbacks may query [`phase`](Self::phase) or
/// [`is_navigating`](Self::is_navigating).
pub struct LifecycleCoordinator {
    host: Arc<dyn NavigationHost>,
    registry: Arc<DestinationRegistry>,
    factories: FactoryProvider,
    config: NavigatorConfig,
    state: Mutex<Option<PendingNavigationState>>,
}

impl fmt::Debug for LifecycleCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCoordinator")
            .field("phase", &self.phase())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LifecycleCoordinator {
    pub(crate) fn new(
        host: Arc<dyn NavigationHost>,
        registry: Arc<DestinationRegistry>,
        factories: FactoryProvider,
        config: NavigatorConfig,
    ) -> Self {
        Self {
            host,
            registry,
            factories,
            config,
            state: Mutex::new(None),
        }
    }

    /// Returns the phase of the current episode.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.state
            .lock()
            .as_ref()
            .map_or(LifecyclePhase::Idle, |state| state.phase)
    }

    /// Returns `true` while an episode is open.
    #[must_use]
    pub fn is_navigating(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Installs factories for every templated content leaf of the host tree.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError`] if a content leaf has no route.
    pub fn wire_templates(&self) -> Result<usize, WiringError> {
        let tree = self.host.presentation_tree();
        self.registry
            .ensure_templates_wired(&tree, |route| self.factories.factory_for(route))
    }

    /// Opens an episode for a navigator call.
    ///
    /// `segments` are consumed one per destination entered; `parameters` are
    /// carried into every segment's merged parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NavigationInProgress`](wayfinder_routing::ErrorKind::NavigationInProgress)
    /// if another episode is open.
    pub fn begin(
        &self,
        target: &str,
        segments: Vec<SegmentDescriptor>,
        parameters: NavigationParameters,
    ) -> Result<Episode<'_>, NavigationError> {
        let current = self.host.current_destination();

        let mut state = self.state.lock();
        match state.as_ref().map(|pending| pending.origin) {
            Some(EpisodeOrigin::Request) => {
                tracing::warn!(target, "rejected navigation while another is in flight");
                return Err(NavigationError::in_progress(target));
            }
            // A host transition that failed before committing never closes itself
            Some(EpisodeOrigin::Host) => {
                tracing::debug!(target, "discarding unfinished host-initiated episode");
            }
            None => {}
        }

        *state = Some(PendingNavigationState::new(
            EpisodeOrigin::Request,
            current.as_ref(),
            parameters,
            segments,
        ));
        tracing::trace!(target, "episode opened");

        Ok(Episode { coordinator: self })
    }

    /// Opens an implicit episode for a transition the host started itself.
    fn open_host_episode(&self, args: &NavigatingEventArgs) {
        if self.config.wire_on_host_navigation
            && let Err(err) = self.wire_templates()
        {
            tracing::error!(error = %err, "template wiring failed for host navigation");
        }

        let current = self.host.current_destination();
        let mut state = self.state.lock();
        if state.is_none() {
            tracing::debug!(target = args.target(), "host-initiated navigation");
            *state = Some(PendingNavigationState::new(
                EpisodeOrigin::Host,
                current.as_ref(),
                NavigationParameters::new(),
                Vec::new(),
            ));
        }
    }

    fn close(&self) {
        if self.state.lock().take().is_some() {
            tracing::trace!("episode closed");
        }
    }
}

impl TransitionListener for LifecycleCoordinator {
    fn on_navigating(&self, args: &mut NavigatingEventArgs) {
        if !self.is_navigating() {
            self.open_host_episode(args);
        }

        let (mut parameters, outgoing) = {
            let mut guard = self.state.lock();
            let Some(state) = guard.as_mut() else {
                return;
            };
            if state.phase == LifecyclePhase::Cancelled {
                args.cancel();
                return;
            }
            let parameters = match state.remaining.pop_front() {
                Some(segment) => uri::parse_segment_parameters(&segment, &state.current_parameters),
                None => state.current_parameters.clone(),
            };
            (parameters, state.outgoing())
        };

        let include_context = self.config.notify_binding_context;
        let permitted = outgoing
            .as_deref()
            .is_none_or(|active| destination::can_navigate(active, &parameters, include_context));

        let mut guard = self.state.lock();
        let Some(state) = guard.as_mut() else {
            return;
        };

        if permitted {
            parameters.set_navigation_mode(NavigationMode::New);
            args.set_mode(NavigationMode::New);
            state.current_parameters = parameters;
            state.phase = LifecyclePhase::Navigating;
            return;
        }

        args.cancel();
        tracing::info!(target = args.target(), "navigation vetoed by active destination");
        state.phase = LifecyclePhase::Cancelled;
        state.current_parameters = NavigationParameters::new();
        state.remaining.clear();
        if state.origin == EpisodeOrigin::Host {
            *guard = None;
        }
    }

    fn on_navigated(&self, args: &NavigatedEventArgs) {
        let (parameters, outgoing) = {
            let mut guard = self.state.lock();
            let Some(state) = guard.as_mut() else {
                tracing::debug!(path = args.path(), "navigated event outside of an episode");
                return;
            };
            if state.phase == LifecyclePhase::Cancelled {
                return;
            }

            let parameters = core::mem::take(&mut state.current_parameters);
            let outgoing = state.outgoing();
            state.remaining.clear();
            state.phase = LifecyclePhase::Committed;
            if state.origin == EpisodeOrigin::Host {
                *guard = None;
            }
            (parameters, outgoing)
        };

        let include_context = self.config.notify_binding_context;
        if let Some(outgoing) = outgoing {
            destination::navigated_from(&*outgoing, &parameters, include_context);
        }
        if let Some(incoming) = self.host.current_destination() {
            destination::navigated_to(&*incoming, &parameters, include_context);
        }

        tracing::debug!(path = args.path(), "transition committed");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Episode
// ─────────────────────────────────────────────────────────────────────────────

/// Guard over an open episode. Dropping it returns the coordinator to idle.
#[must_use = "the episode closes as soon as the guard is dropped"]
pub struct Episode<'a> {
    coordinator: &'a LifecycleCoordinator,
}

impl fmt::Debug for Episode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Episode")
            .field("phase", &self.phase())
            .finish()
    }
}

impl Episode<'_> {
    /// Returns the phase the episode reached so far.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.coordinator.phase()
    }
}

impl Drop for Episode<'_> {
    fn drop(&mut self) {
        self.coordinator.close();
    }
}
