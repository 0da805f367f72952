//! End-to-end navigation through the in-memory shell.


use std::sync::Arc;
use test_utils::{CountingWiring, Fixture, GatedShell, container, record_events, tabs};
use wayfinder_navigation::testing::{InMemoryShell, LifecycleJournal};
use wayfinder_navigation::{Navigator, NavigatorConfig, TransitionError};
use wayfinder_routing::{ErrorKind, NavigationMode, NavigationParameters, StructuralItem};

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn structural_first_segment_jumps_absolutely() {
    let fixture = Fixture::new();

    let result = fixture.navigator.navigate("main/details?id=3").await;

    assert!(result.success());
    assert_eq!(fixture.shell.history(), ["//main/details"]);
    assert_eq!(fixture.shell.stack_routes(), ["main", "details"]);

    let details = fixture.navigator.registry().lookup("details").unwrap();
    assert!(!details.is_structural());
    assert!(details.has_factory());
}

#[tokio::test]
async fn non_structural_target_pushes_relatively() {
    let fixture = Fixture::new();
    assert!(fixture.navigator.navigate("main").await.success());

    let result = fixture.navigator.navigate("details?id=3").await;

    assert!(result.success());
    assert_eq!(fixture.shell.history(), ["//main", "details"]);
    assert_eq!(fixture.shell.stack_routes(), ["main", "details"]);
}

#[tokio::test]
async fn section_anchor_presents_its_first_tab() {
    let fixture = Fixture::new();

    let result = fixture.navigator.navigate("shell/details?id=3").await;

    assert!(result.success());
    assert_eq!(fixture.shell.history(), ["//shell/details"]);
    assert_eq!(fixture.shell.stack_routes(), ["main", "details"]);
    let seen = fixture.journal.parameters("details:navigated_to").unwrap();
    assert_eq!(seen.get::<i32>("id").unwrap(), 3);
    fixture.drain();

    assert!(fixture.navigator.navigate("home").await.success());
    assert_eq!(fixture.shell.stack_routes(), ["main"]);
    assert_eq!(
        fixture.drain(),
        [
            "details:can_navigate",
            "details:navigated_from",
            "main:navigated_to"
        ]
    );
}

#[tokio::test]
async fn scheme_prefix_is_ignored() {
    let fixture = Fixture::new();

    let result = fixture.navigator.navigate("app://settings/reviews").await;

    assert!(result.success());
    assert_eq!(fixture.shell.history(), ["//settings/reviews"]);
}

#[tokio::test]
async fn repeated_navigation_registers_routes_once() {
    let fixture = Fixture::new();
    let registry = Arc::clone(fixture.navigator.registry());

    assert!(fixture.navigator.navigate("main/details").await.success());
    let known = registry.all_known_routes();

    assert!(fixture.navigator.navigate("details").await.success());
    assert!(fixture.navigator.navigate("main/details?id=9").await.success());
    assert_eq!(registry.all_known_routes(), known);
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lifecycle_runs_from_then_to_once() {
    let fixture = Fixture::new();
    fixture.navigator.navigate("main").await;
    assert_eq!(fixture.drain(), ["main:navigated_to"]);

    fixture.navigator.navigate("details?id=3").await;

    assert_eq!(
        fixture.drain(),
        [
            "main:can_navigate",
            "main:navigated_from",
            "details:navigated_to"
        ]
    );
}

#[tokio::test]
async fn page_released_by_the_host_still_hears_navigated_from() {
    let fixture = Fixture::new();
    assert!(fixture.navigator.navigate("main/details").await.success());
    fixture.drain();

    // The absolute jump drops `details` from the shell's stack on commit
    let result = fixture.navigator.navigate("settings").await;

    assert!(result.success());
    assert_eq!(fixture.shell.stack_routes(), ["settings"]);
    assert_eq!(
        fixture.drain(),
        [
            "details:can_navigate",
            "details:navigated_from",
            "settings:navigated_to"
        ]
    );
}

#[tokio::test]
async fn parameters_merge_segment_query_over_caller_values() {
    let fixture = Fixture::new();
    fixture.navigator.navigate("main").await;

    let parameters = NavigationParameters::new().with("user", "ada").with("id", 1);
    fixture
        .navigator
        .navigate_with("details?id=3", parameters)
        .await;

    let seen = fixture.journal.parameters("details:navigated_to").unwrap();
    assert_eq!(seen.get::<i32>("id").unwrap(), 3);
    assert_eq!(seen.get::<String>("user").unwrap(), "ada");
    assert_eq!(seen.navigation_mode(), Some(NavigationMode::New));

    let from = fixture.journal.parameters("main:navigated_from").unwrap();
    assert_eq!(from, seen);
}

#[tokio::test]
async fn veto_cancels_without_error_and_keeps_destination() {
    let fixture = Fixture::new();
    let events = record_events(fixture.navigator.hooks());
    fixture.navigator.navigate("editor").await;
    fixture.drain();

    let result = fixture.navigator.navigate("details").await;

    assert!(!result.success());
    assert!(result.is_cancelled());
    assert!(result.error().is_none());
    assert!(!fixture.navigator.is_navigating());
    assert_eq!(fixture.shell.stack_routes(), ["editor"]);
    assert_eq!(fixture.drain(), ["editor:can_navigate"]);
    assert_eq!(events.lock()[3..], ["started", "resolved", "cancelled"]);
}

#[tokio::test]
async fn binding_context_follows_its_destination() {
    let fixture = Fixture::new();
    fixture.navigator.navigate("profile").await;
    fixture.navigator.navigate("details").await;

    assert_eq!(
        fixture.drain(),
        [
            "profile:navigated_to",
            "profile-vm:navigated_to",
            "profile:can_navigate",
            "profile-vm:can_navigate",
            "profile:navigated_from",
            "profile-vm:navigated_from",
            "details:navigated_to",
        ]
    );
}

#[tokio::test]
async fn binding_context_can_be_left_out() {
    let fixture =
        Fixture::with_config(NavigatorConfig::default().with_notify_binding_context(false));
    fixture.navigator.navigate("profile").await;
    fixture.navigator.navigate("details").await;

    assert!(
        fixture
            .drain()
            .iter()
            .all(|entry| !entry.starts_with("profile-vm"))
    );
}

#[tokio::test]
async fn host_initiated_selection_is_wired_and_notified() {
    let fixture = Fixture::new();
    fixture.navigator.shell();

    fixture
        .shell
        .select("main", fixture.navigator.registry())
        .unwrap();
    fixture
        .shell
        .select("settings", fixture.navigator.registry())
        .unwrap();

    let seen = fixture.journal.parameters("settings:navigated_to").unwrap();
    assert_eq!(seen.len(), 0);
    assert_eq!(
        fixture.drain(),
        [
            "main:navigated_to",
            "main:can_navigate",
            "main:navigated_from",
            "settings:navigated_to"
        ]
    );
    assert!(!fixture.navigator.is_navigating());
}

#[tokio::test]
async fn host_initiated_selection_without_wiring_fails() {
    let fixture =
        Fixture::with_config(NavigatorConfig::default().with_wire_on_host_navigation(false));
    fixture.navigator.shell();

    let err = fixture
        .shell
        .select("main", fixture.navigator.registry())
        .err()
        .unwrap();

    assert!(matches!(
        err,
        TransitionError::Destination(ref e) if e.kind() == ErrorKind::NoPageIsRegistered
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unregistered_name_is_no_page_registered() {
    let fixture = Fixture::new();

    let result = fixture.navigator.navigate("nowhere").await;

    assert!(!result.success());
    assert_eq!(result.error_kind(), Some(ErrorKind::NoPageIsRegistered));
    assert!(!fixture.navigator.is_navigating());
    assert!(fixture.shell.stack_routes().is_empty());
}

#[tokio::test]
async fn throwing_constructor_is_error_creating_page() {
    let fixture = Fixture::new();

    let result = fixture.navigator.navigate("broken").await;

    let error = result.error().unwrap();
    assert_eq!(error.kind(), ErrorKind::ErrorCreatingPage);
    assert_eq!(
        error.inner().map(ToString::to_string).as_deref(),
        Some("database unavailable")
    );
}

#[tokio::test]
async fn non_destination_is_no_page_registered() {
    let fixture = Fixture::new();

    let result = fixture.navigator.navigate("number").await;

    assert_eq!(result.error_kind(), Some(ErrorKind::NoPageIsRegistered));
}

#[tokio::test]
async fn empty_target_is_unknown_exception() {
    let fixture = Fixture::new();
    let events = record_events(fixture.navigator.hooks());

    for target in ["", "/", "app://"] {
        let result = fixture.navigator.navigate(target).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownException));
    }
    assert_eq!(*events.lock(), ["failed", "failed", "failed"]);
}

#[tokio::test]
async fn host_failure_is_unknown_exception_and_clears_state() {
    let fixture = Fixture::new();
    fixture.shell.fail_next("renderer crashed");

    let result = fixture.navigator.navigate("main").await;

    assert_eq!(result.error_kind(), Some(ErrorKind::UnknownException));
    assert!(!fixture.navigator.is_navigating());
    assert!(fixture.navigator.navigate("main").await.success());
}

#[tokio::test]
#[should_panic(expected = "malformed presentation tree")]
async fn content_without_route_is_fatal() {
    let journal = LifecycleJournal::new();
    let shell = Arc::new(InMemoryShell::new(vec![StructuralItem::content("")]));
    let navigator = Navigator::new(shell, container(&journal));

    navigator.navigate("main").await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Wiring and observers
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn wiring_runs_once_per_constructed_destination() {
    let journal = LifecycleJournal::new();
    let wiring = Arc::new(CountingWiring::default());
    let navigator = Navigator::builder()
        .with_host(Arc::new(InMemoryShell::new(tabs())))
        .with_container(container(&journal))
        .with_wiring(wiring.clone())
        .build()
        .unwrap();

    navigator.navigate("main/details").await;
    navigator.navigate("main").await;

    // `main` is structural and reused by the shell
    assert_eq!(*wiring.autowired.lock(), ["main", "details"]);
    assert_eq!(*wiring.behaviors.lock(), 2);
}

#[tokio::test]
async fn observers_see_the_whole_episode() {
    let fixture = Fixture::new();
    let events = record_events(fixture.navigator.hooks());

    fixture.navigator.navigate("main").await;
    fixture.navigator.navigate("nowhere").await;

    assert_eq!(
        *events.lock(),
        [
            "started",
            "resolved",
            "completed",
            "started",
            "resolved",
            "failed"
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Single flight
// ─────────────────────────────────────────────────────────────────────────────

fn gated() -> (Arc<GatedShell>, Arc<Navigator>) {
    let journal = LifecycleJournal::new();
    let gate = Arc::new(GatedShell::new(Arc::new(InMemoryShell::new(tabs()))));
    let navigator = Arc::new(Navigator::new(gate.clone(), container(&journal)));
    (gate, navigator)
}

#[tokio::test]
async fn concurrent_navigation_is_rejected() {
    let (gate, navigator) = gated();

    let first = tokio::spawn({
        let navigator = Arc::clone(&navigator);
        async move { navigator.navigate("main").await }
    });
    gate.entered.notified().await;
    assert!(navigator.is_navigating());

    let second = navigator.navigate("settings").await;
    assert_eq!(second.error_kind(), Some(ErrorKind::NavigationInProgress));

    gate.release.notify_one();
    assert!(first.await.unwrap().success());
    assert!(!navigator.is_navigating());
    assert_eq!(gate.inner.history(), ["//main"]);
}

#[tokio::test]
async fn dropped_navigation_clears_state() {
    let (gate, navigator) = gated();

    let first = tokio::spawn({
        let navigator = Arc::clone(&navigator);
        async move { navigator.navigate("main").await }
    });
    gate.entered.notified().await;
    assert!(navigator.is_navigating());

    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    assert!(!navigator.is_navigating());

    gate.release.notify_one();
    assert!(navigator.navigate("settings").await.success());
}
