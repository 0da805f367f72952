//! In-memory host and recording destinations for tests and demos.
//!
//! Enabled by the `test-utils` feature.
//!
//! - [`InMemoryShell`] implements [`NavigationHost`] over a plain stack,
//!   following the transition contract documented in [`crate::host`].
//! - [`RecordingDestination`] and [`RecordingContext`] append every lifecycle
//!   call to a shared [`LifecycleJournal`], and can be told to veto.

use crate::host::{
    NavigatedEventArgs, NavigatingEventArgs, NavigationHost, TransitionError, TransitionListener,
};
use async_trait::async_trait;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use hashbrown::HashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use wayfinder_routing::{
    Destination, DestinationRegistry, ItemKind, NavigationAware, NavigationError,
    NavigationParameters, StructuralItem,
};

// ─────────────────────────────────────────────────────────────────────────────
// LifecycleJournal
// ─────────────────────────────────────────────────────────────────────────────

/// Shared, ordered log of lifecycle calls.
///
/// Entries read `"<name>:<call>"`, with `<call>` one of `can_navigate`,
/// `navigated_from` and `navigated_to`.
#[derive(Debug, Clone, Default)]
pub struct LifecycleJournal {
    entries: Arc<Mutex<Vec<(String, NavigationParameters)>>>,
}

impl LifecycleJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &str, call: &str, parameters: &NavigationParameters) {
        self.entries
            .lock()
            .push((format!("{name}:{call}"), parameters.clone()));
    }

    /// Returns the recorded entries in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(entry, _)| entry.clone())
            .collect()
    }

    /// Returns the parameters of the most recent `entry`.
    #[must_use]
    pub fn parameters(&self, entry: &str) -> Option<NavigationParameters> {
        self.entries
            .lock()
            .iter()
            .rev()
            .find(|(recorded, _)| recorded == entry)
            .map(|(_, parameters)| parameters.clone())
    }

    /// Returns how many times `entry` was recorded.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|(recorded, _)| recorded == entry)
            .count()
    }

    /// Forgets every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording destinations
// ─────────────────────────────────────────────────────────────────────────────

struct Recorder {
    name: String,
    journal: LifecycleJournal,
    veto: AtomicBool,
}

impl Recorder {
    fn new(name: String, journal: &LifecycleJournal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            veto: AtomicBool::new(false),
        }
    }

    fn can_navigate(&self, parameters: &NavigationParameters) -> bool {
        self.journal.record(&self.name, "can_navigate", parameters);
        !self.veto.load(Ordering::SeqCst)
    }

    fn navigated_from(&self, parameters: &NavigationParameters) {
        self.journal.record(&self.name, "navigated_from", parameters);
    }

    fn navigated_to(&self, parameters: &NavigationParameters) {
        self.journal.record(&self.name, "navigated_to", parameters);
    }
}

/// A binding context (view model) that records its lifecycle calls.
pub struct RecordingContext {
    recorder: Recorder,
}

impl RecordingContext {
    /// Creates a context journaling under `name`.
    pub fn new(name: impl Into<String>, journal: &LifecycleJournal) -> Self {
        Self {
            recorder: Recorder::new(name.into(), journal),
        }
    }

    /// Makes `can_navigate` refuse (or permit again).
    pub fn set_veto(&self, veto: bool) {
        self.recorder.veto.store(veto, Ordering::SeqCst);
    }
}

impl NavigationAware for RecordingContext {
    fn can_navigate(&self, parameters: &NavigationParameters) -> bool {
        self.recorder.can_navigate(parameters)
    }

    fn on_navigated_from(&self, parameters: &NavigationParameters) {
        self.recorder.navigated_from(parameters);
    }

    fn on_navigated_to(&self, parameters: &NavigationParameters) {
        self.recorder.navigated_to(parameters);
    }
}

/// A destination that records its lifecycle calls.
pub struct RecordingDestination {
    recorder: Recorder,
    context: Option<Arc<RecordingContext>>,
}

impl fmt::Debug for RecordingDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingDestination")
            .field("name", &self.recorder.name)
            .field("veto", &self.recorder.veto.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl RecordingDestination {
    /// Creates a destination journaling under `name`.
    pub fn new(name: impl Into<String>, journal: &LifecycleJournal) -> Self {
        Self {
            recorder: Recorder::new(name.into(), journal),
            context: None,
        }
    }

    /// Makes the destination refuse to be left.
    #[must_use]
    pub fn vetoing(self) -> Self {
        self.set_veto(true);
        self
    }

    /// Attaches a recording binding context.
    #[must_use]
    pub fn with_context(mut self, context: Arc<RecordingContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Makes `can_navigate` refuse (or permit again).
    pub fn set_veto(&self, veto: bool) {
        self.recorder.veto.store(veto, Ordering::SeqCst);
    }

    /// Returns the journaling name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.recorder.name
    }
}

impl NavigationAware for RecordingDestination {
    fn can_navigate(&self, parameters: &NavigationParameters) -> bool {
        self.recorder.can_navigate(parameters)
    }

    fn on_navigated_from(&self, parameters: &NavigationParameters) {
        self.recorder.navigated_from(parameters);
    }

    fn on_navigated_to(&self, parameters: &NavigationParameters) {
        self.recorder.navigated_to(parameters);
    }
}

impl Destination for RecordingDestination {
    fn binding_context(&self) -> Option<Arc<dyn NavigationAware>> {
        self.context
            .clone()
            .map(|context| context as Arc<dyn NavigationAware>)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InMemoryShell
// ─────────────────────────────────────────────────────────────────────────────

type Template = Arc<dyn Fn() -> Arc<dyn Destination> + Send + Sync>;

#[derive(Clone)]
struct Presented {
    route: String,
    destination: Arc<dyn Destination>,
}

/// A [`NavigationHost`] keeping its stack in memory.
///
/// Absolute paths (`//root/...`) replace the stack, relative paths push onto
/// it. A route naming an item or a section presents its first content leaf.
/// Structural destinations are built once and reused, as a tabbed shell
/// keeps its tab pages alive.
pub struct InMemoryShell {
    tree: Vec<StructuralItem>,
    templates: HashMap<String, Template>,
    stack: RwLock<Vec<Presented>>,
    structural_cache: Mutex<HashMap<String, Arc<dyn Destination>>>,
    listeners: RwLock<Vec<Weak<dyn TransitionListener>>>,
    history: Mutex<Vec<String>>,
    pending_failure: Mutex<Option<String>>,
}

impl fmt::Debug for InMemoryShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryShell")
            .field("tree", &self.tree)
            .field("stack", &self.stack_routes())
            .finish_non_exhaustive()
    }
}

impl InMemoryShell {
    /// Creates a shell over a flattened presentation tree.
    pub fn new(tree: Vec<StructuralItem>) -> Self {
        Self {
            tree,
            templates: HashMap::new(),
            stack: RwLock::new(Vec::new()),
            structural_cache: Mutex::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            pending_failure: Mutex::new(None),
        }
    }

    /// Adds a content leaf whose destination the shell builds itself.
    #[must_use]
    pub fn with_templated_content<F>(mut self, route: impl Into<String>, template: F) -> Self
    where
        F: Fn() -> Arc<dyn Destination> + Send + Sync + 'static,
    {
        let route = route.into();
        self.tree
            .push(StructuralItem::content(route.clone()).with_host_template());
        self.templates.insert(route, Arc::new(template));
        self
    }

    /// Replaces the stack with a single destination, without events.
    pub fn present(&self, route: impl Into<String>, destination: Arc<dyn Destination>) {
        *self.stack.write() = vec![Presented {
            route: route.into(),
            destination,
        }];
    }

    /// Makes the next transition fail with a host error.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.pending_failure.lock() = Some(message.into());
    }

    /// Returns the routes currently stacked, bottom first.
    #[must_use]
    pub fn stack_routes(&self) -> Vec<String> {
        self.stack
            .read()
            .iter()
            .map(|presented| presented.route.clone())
            .collect()
    }

    /// Returns every committed path, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    /// Returns the number of live subscribed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }

    /// Simulates the user selecting a structural route (a tab tap).
    ///
    /// # Errors
    ///
    /// Same as [`transition`](Self::transition).
    pub fn select(&self, route: &str, registry: &DestinationRegistry) -> Result<(), TransitionError> {
        self.transition(&format!("//{route}"), registry)
    }

    /// Performs a transition synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Destination`] if a destination cannot be
    /// built, or [`TransitionError::Host`] after [`fail_next`](Self::fail_next).
    pub fn transition(&self, path: &str, registry: &DestinationRegistry) -> Result<(), TransitionError> {
        if let Some(message) = self.pending_failure.lock().take() {
            return Err(TransitionError::host(message));
        }

        let (absolute, relative) = match path.strip_prefix("//") {
            Some(rest) => (true, rest),
            None => (false, path),
        };

        let mut entered = Vec::new();
        for requested in relative.split('/').filter(|route| !route.is_empty()) {
            let route = self.content_route(requested)?;
            let mut args = NavigatingEventArgs::new(route);
            self.notify_navigating(&mut args);
            if args.is_cancelled() {
                tracing::debug!(path, route, "transition cancelled");
                return Ok(());
            }

            entered.push(Presented {
                route: route.to_string(),
                destination: self.build(route, registry)?,
            });
        }

        if entered.is_empty() {
            return Err(TransitionError::host(format!("nothing to navigate to in '{path}'")));
        }

        {
            let mut stack = self.stack.write();
            if absolute {
                stack.clear();
            }
            stack.extend(entered);
        }
        self.history.lock().push(path.to_string());

        self.notify_navigated(&NavigatedEventArgs::new(path));
        Ok(())
    }

    /// Maps an item or section route to its first content descendant.
    ///
    /// An item spans the entries up to the next item, a section the content
    /// leaves directly after it. Routes outside the tree map to themselves.
    fn content_route<'a>(&'a self, route: &'a str) -> Result<&'a str, NavigationError> {
        let Some(index) = self.tree.iter().position(|item| item.route() == Some(route)) else {
            return Ok(route);
        };

        let kind = self.tree[index].kind();
        if kind == ItemKind::Content {
            return Ok(route);
        }

        self.tree[index + 1..]
            .iter()
            .take_while(|item| match kind {
                ItemKind::Item => item.kind() != ItemKind::Item,
                _ => item.kind() == ItemKind::Content,
            })
            .filter(|item| item.kind() == ItemKind::Content)
            .find_map(StructuralItem::route)
            .ok_or_else(|| NavigationError::no_page_registered(route))
    }

    fn build(
        &self,
        route: &str,
        registry: &DestinationRegistry,
    ) -> Result<Arc<dyn Destination>, NavigationError> {
        let structural = self.tree.iter().any(|item| item.route() == Some(route));
        if structural && let Some(cached) = self.structural_cache.lock().get(route) {
            return Ok(Arc::clone(cached));
        }

        let destination = match self.templates.get(route) {
            Some(template) => template(),
            None => registry.create(route)?,
        };

        if structural {
            self.structural_cache
                .lock()
                .insert(route.to_string(), Arc::clone(&destination));
        }
        Ok(destination)
    }

    fn live_listeners(&self) -> Vec<Arc<dyn TransitionListener>> {
        let mut listeners = self.listeners.write();
        listeners.retain(|listener| listener.strong_count() > 0);
        listeners.iter().filter_map(Weak::upgrade).collect()
    }

    fn notify_navigating(&self, args: &mut NavigatingEventArgs) {
        for listener in self.live_listeners() {
            listener.on_navigating(args);
            if args.is_cancelled() {
                break;
            }
        }
    }

    fn notify_navigated(&self, args: &NavigatedEventArgs) {
        for listener in self.live_listeners() {
            listener.on_navigated(args);
        }
    }
}

#[async_trait]
impl NavigationHost for InMemoryShell {
    fn presentation_tree(&self) -> Vec<StructuralItem> {
        self.tree.clone()
    }

    fn current_destination(&self) -> Option<Arc<dyn Destination>> {
        self.stack
            .read()
            .last()
            .map(|presented| Arc::clone(&presented.destination))
    }

    fn subscribe(&self, listener: Weak<dyn TransitionListener>) {
        self.listeners.write().push(listener);
    }

    async fn go_to(
        &self,
        path: &str,
        registry: &DestinationRegistry,
    ) -> Result<(), TransitionError> {
        self.transition(path, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_routing::{DestinationFactory, ErrorKind, FactoryIdentity};

    struct Page;
    impl NavigationAware for Page {}
    impl Destination for Page {}

    #[derive(Default)]
    struct Counter {
        navigating: Mutex<Vec<String>>,
        navigated: Mutex<Vec<String>>,
        veto: AtomicBool,
    }

    impl TransitionListener for Counter {
        fn on_navigating(&self, args: &mut NavigatingEventArgs) {
            self.navigating.lock().push(args.target().to_string());
            if self.veto.load(Ordering::SeqCst) {
                args.cancel();
            }
        }

        fn on_navigated(&self, args: &NavigatedEventArgs) {
            self.navigated.lock().push(args.path().to_string());
        }
    }

    fn shell() -> InMemoryShell {
        InMemoryShell::new(vec![StructuralItem::item("root")])
            .with_templated_content("main", || Arc::new(Page))
    }

    struct PageFactory;

    impl DestinationFactory for PageFactory {
        fn create(&self) -> Result<Arc<dyn Destination>, NavigationError> {
            Ok(Arc::new(Page))
        }

        fn identity(&self) -> FactoryIdentity {
            FactoryIdentity::new("details", 0)
        }
    }

    struct NamedFactory(String);

    impl DestinationFactory for NamedFactory {
        fn create(&self) -> Result<Arc<dyn Destination>, NavigationError> {
            Ok(Arc::new(Page))
        }

        fn identity(&self) -> FactoryIdentity {
            FactoryIdentity::new(self.0.clone(), 0)
        }
    }

    #[test]
    fn absolute_paths_replace_and_relative_paths_push() {
        let shell = shell();
        let registry = DestinationRegistry::new();
        registry
            .register_if_absent("details", Arc::new(PageFactory))
            .unwrap();

        shell.transition("//main/details", &registry).unwrap();
        shell.transition("details", &registry).unwrap();
        assert_eq!(shell.stack_routes(), ["main", "details", "details"]);

        shell.transition("//main", &registry).unwrap();
        assert_eq!(shell.stack_routes(), ["main"]);
        assert_eq!(shell.history(), ["//main/details", "details", "//main"]);
    }

    #[test]
    fn items_and_sections_present_their_first_content() {
        let shell = InMemoryShell::new(vec![
            StructuralItem::item("shop"),
            StructuralItem::section("browse"),
            StructuralItem::content("catalog"),
            StructuralItem::content("cart"),
            StructuralItem::section("account"),
            StructuralItem::content("orders"),
            StructuralItem::item("empty"),
        ]);
        let registry = DestinationRegistry::new();
        let factory = |route: &str| -> Arc<dyn DestinationFactory> {
            Arc::new(NamedFactory(route.to_string()))
        };
        registry
            .ensure_templates_wired(&shell.presentation_tree(), factory)
            .unwrap();

        shell.transition("//shop", &registry).unwrap();
        assert_eq!(shell.stack_routes(), ["catalog"]);

        shell.transition("//account", &registry).unwrap();
        assert_eq!(shell.stack_routes(), ["orders"]);

        let err = shell.transition("//empty", &registry).err().unwrap();
        assert!(matches!(
            err,
            TransitionError::Destination(ref e) if e.kind() == ErrorKind::NoPageIsRegistered
        ));
        assert_eq!(shell.history(), ["//shop", "//account"]);
    }

    #[test]
    fn structural_destinations_are_reused() {
        let shell = shell();
        let registry = DestinationRegistry::new();

        shell.transition("//main", &registry).unwrap();
        let first = shell.current_destination().unwrap();
        shell.transition("//main", &registry).unwrap();
        let second = shell.current_destination().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn events_fire_per_route_then_once_after_commit() {
        let shell = shell();
        let counter = Arc::new(Counter::default());
        let listener: Arc<dyn TransitionListener> = counter.clone();
        shell.subscribe(Arc::downgrade(&listener));

        shell.transition("//main", &DestinationRegistry::new()).unwrap();

        assert_eq!(*counter.navigating.lock(), ["main"]);
        assert_eq!(*counter.navigated.lock(), ["//main"]);
    }

    #[test]
    fn cancelled_transition_commits_nothing() {
        let shell = shell();
        let counter = Arc::new(Counter::default());
        counter.veto.store(true, Ordering::SeqCst);
        let listener: Arc<dyn TransitionListener> = counter.clone();
        shell.subscribe(Arc::downgrade(&listener));

        shell.transition("//main", &DestinationRegistry::new()).unwrap();

        assert!(shell.current_destination().is_none());
        assert!(shell.history().is_empty());
        assert!(counter.navigated.lock().is_empty());
    }

    #[test]
    fn unknown_route_fails_without_commit() {
        let shell = shell();
        let err = shell
            .transition("details", &DestinationRegistry::new())
            .err()
            .unwrap();

        assert!(matches!(err, TransitionError::Destination(_)));
        assert!(shell.stack_routes().is_empty());
    }

    #[test]
    fn dropped_listeners_are_pruned() {
        let shell = shell();
        {
            let listener: Arc<dyn TransitionListener> = Arc::new(Counter::default());
            shell.subscribe(Arc::downgrade(&listener));
            assert_eq!(shell.listener_count(), 1);
        }
        assert_eq!(shell.listener_count(), 0);
        shell.transition("//main", &DestinationRegistry::new()).unwrap();
    }

    #[test]
    fn fail_next_reports_host_error_once() {
        let shell = shell();
        let registry = DestinationRegistry::new();
        shell.fail_next("renderer crashed");

        assert!(matches!(
            shell.transition("//main", &registry),
            Err(TransitionError::Host(_))
        ));
        assert!(shell.transition("//main", &registry).is_ok());
    }

    #[test]
    fn journal_records_in_order() {
        let journal = LifecycleJournal::new();
        let context = Arc::new(RecordingContext::new("vm", &journal));
        let page = RecordingDestination::new("page", &journal).with_context(context);

        let parameters = NavigationParameters::new().with("id", 1);
        assert!(page.can_navigate(&parameters));
        page.on_navigated_to(&parameters);
        page.binding_context().unwrap().on_navigated_to(&parameters);

        assert_eq!(
            journal.entries(),
            ["page:can_navigate", "page:navigated_to", "vm:navigated_to"]
        );
        assert_eq!(journal.count("page:navigated_to"), 1);
    }
}
