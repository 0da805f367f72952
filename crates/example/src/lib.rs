//! Example storefront navigation built with Wayfinder.
//!
//! The storefront shell has two tabs. Product and review pages are not part
//! of the shell; they are registered the first time a URI mentions them.
//!
//! ```text
//! shop (item)
//! └── browse (section)
//!     ├── catalog (content)   ◀── tab
//!     └── cart    (content)   ◀── tab
//!
//! on demand: product?id=..   review?product=..
//! ```
//!
//! The review editor's view model refuses to be left while a draft is
//! unsaved, which cancels the navigation without an error.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use wayfinder_navigation::testing::InMemoryShell;
use wayfinder_navigation::{ContainerRegistry, DestinationWiring, Navigator, NavigatorBuilder};
use wayfinder_routing::{Destination, NavigationAware, NavigationParameters, StructuralItem};

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// State shared by every page of one storefront session.
#[derive(Debug, Default)]
pub struct Session {
    unsaved_review: AtomicBool,
    visited: Mutex<Vec<String>>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns `true` while a review draft has not been saved.
    #[must_use]
    pub fn has_unsaved_review(&self) -> bool {
        self.unsaved_review.load(Ordering::SeqCst)
    }

    /// Saves the pending review draft.
    pub fn save_review(&self) {
        if self.unsaved_review.swap(false, Ordering::SeqCst) {
            tracing::info!("review draft saved");
        }
    }

    /// Returns a description of every page shown, in order.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }

    fn visit(&self, page: impl Into<String>) {
        let page = page.into();
        tracing::info!(%page, "showing page");
        self.visited.lock().push(page);
    }
}

/// Catalog filter passed as a structured parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Category to show.
    pub category: String,
    /// Show only discounted products.
    pub on_sale: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages
// ─────────────────────────────────────────────────────────────────────────────

struct CatalogPage {
    session: Arc<Session>,
}

impl NavigationAware for CatalogPage {
    fn on_navigated_to(&self, parameters: &NavigationParameters) {
        match parameters.try_get::<CatalogFilter>("filter") {
            Some(filter) => self.session.visit(format!(
                "catalog:{}{}",
                filter.category,
                if filter.on_sale { ":sale" } else { "" }
            )),
            None => self.session.visit("catalog"),
        }
    }
}

impl Destination for CatalogPage {}

struct CartPage {
    session: Arc<Session>,
}

impl NavigationAware for CartPage {
    fn on_navigated_to(&self, _parameters: &NavigationParameters) {
        self.session.visit("cart");
    }
}

impl Destination for CartPage {}

struct ProductPage {
    session: Arc<Session>,
}

impl NavigationAware for ProductPage {
    fn on_navigated_to(&self, parameters: &NavigationParameters) {
        match parameters.get::<u32>("id") {
            Ok(id) => self.session.visit(format!("product:{id}")),
            Err(err) => {
                tracing::warn!(error = %err, "product page opened without a usable id");
                self.session.visit("product:unknown");
            }
        }
    }
}

impl Destination for ProductPage {}

/// View model behind the review editor.
struct ReviewViewModel {
    session: Arc<Session>,
}

impl NavigationAware for ReviewViewModel {
    fn can_navigate(&self, _parameters: &NavigationParameters) -> bool {
        let allowed = !self.session.has_unsaved_review();
        if !allowed {
            tracing::info!("leaving the review editor is blocked by an unsaved draft");
        }
        allowed
    }

    fn on_navigated_to(&self, parameters: &NavigationParameters) {
        if parameters.try_get::<bool>("draft").unwrap_or(false) {
            self.session.unsaved_review.store(true, Ordering::SeqCst);
        }
    }
}

struct ReviewPage {
    session: Arc<Session>,
    view_model: Arc<ReviewViewModel>,
}

impl NavigationAware for ReviewPage {
    fn on_navigated_to(&self, parameters: &NavigationParameters) {
        let product = parameters.try_get::<u32>("product").unwrap_or_default();
        self.session.visit(format!("review:{product}"));
    }
}

impl Destination for ReviewPage {
    fn binding_context(&self) -> Option<Arc<dyn NavigationAware>> {
        Some(self.view_model.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────────────────────────────────────

/// Logs every destination handed to the shell.
#[derive(Debug, Default)]
pub struct LoggingWiring;

impl DestinationWiring for LoggingWiring {
    fn autowire_view_model(&self, destination: &Arc<dyn Destination>) {
        tracing::debug!(
            has_view_model = destination.binding_context().is_some(),
            "destination constructed"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the storefront's presentation tree.
#[must_use]
pub fn storefront_tree() -> Vec<StructuralItem> {
    vec![
        StructuralItem::item("shop"),
        StructuralItem::section("browse"),
        StructuralItem::content("catalog"),
        StructuralItem::content("cart"),
    ]
}

/// Registers every storefront page.
#[must_use]
pub fn container(session: &Arc<Session>) -> ContainerRegistry {
    let container = ContainerRegistry::new();

    let shared = Arc::clone(session);
    container.register_destination("catalog", move || CatalogPage {
        session: Arc::clone(&shared),
    });

    let shared = Arc::clone(session);
    container.register_destination("cart", move || CartPage {
        session: Arc::clone(&shared),
    });

    let shared = Arc::clone(session);
    container.register_destination("product", move || ProductPage {
        session: Arc::clone(&shared),
    });

    let shared = Arc::clone(session);
    container.register_destination("review", move || ReviewPage {
        session: Arc::clone(&shared),
        view_model: Arc::new(ReviewViewModel {
            session: Arc::clone(&shared),
        }),
    });

    container
}

/// Builds the in-memory shell and a navigator over it.
#[must_use]
pub fn storefront(session: &Arc<Session>) -> (Arc<InMemoryShell>, NavigatorBuilder) {
    let shell = Arc::new(InMemoryShell::new(storefront_tree()));
    let builder = Navigator::builder()
        .with_host(shell.clone())
        .with_container(Arc::new(container(session)))
        .with_wiring(Arc::new(LoggingWiring));
    (shell, builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_routing::ErrorKind;

    fn navigator(session: &Arc<Session>) -> (Arc<InMemoryShell>, Navigator) {
        let (shell, builder) = storefront(session);
        (shell, builder.build().unwrap())
    }

    #[tokio::test]
    async fn browsing_to_a_product_pushes_it_over_the_catalog() {
        let session = Session::new();
        let (shell, navigator) = navigator(&session);

        assert!(navigator.navigate("catalog/product?id=42").await.success());

        assert_eq!(shell.stack_routes(), ["catalog", "product"]);
        assert_eq!(session.visited(), ["product:42"]);
    }

    #[tokio::test]
    async fn structured_filter_reaches_the_catalog() {
        let session = Session::new();
        let (_shell, navigator) = navigator(&session);

        let mut parameters = NavigationParameters::new();
        parameters
            .insert_serialized(
                "filter",
                &CatalogFilter {
                    category: "lamps".into(),
                    on_sale: true,
                },
            )
            .unwrap();

        assert!(navigator.navigate_with("catalog", parameters).await.success());
        assert_eq!(session.visited(), ["catalog:lamps:sale"]);
    }

    #[tokio::test]
    async fn unsaved_review_blocks_leaving_until_saved() {
        let session = Session::new();
        let (shell, navigator) = navigator(&session);

        navigator.navigate("catalog").await;
        navigator.navigate("review?product=7&draft=true").await;
        assert!(session.has_unsaved_review());

        let blocked = navigator.navigate("cart").await;
        assert!(blocked.is_cancelled());
        assert_eq!(shell.stack_routes(), ["catalog", "review"]);

        session.save_review();
        assert!(navigator.navigate("cart").await.success());
        assert_eq!(shell.stack_routes(), ["cart"]);
        assert_eq!(session.visited(), ["catalog", "review:7", "cart"]);
    }

    #[tokio::test]
    async fn unknown_page_is_reported() {
        let session = Session::new();
        let (_shell, navigator) = navigator(&session);

        let result = navigator.navigate("checkout").await;
        assert_eq!(result.error_kind(), Some(ErrorKind::NoPageIsRegistered));
    }
}
