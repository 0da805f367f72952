//! URI-driven navigation for hierarchical UI shells.
//!
//! Wayfinder turns targets such as `"main/details?id=3"` into host transitions,
//! builds destinations lazily through a container, and runs a veto-capable
//! lifecycle (`can_navigate`, `on_navigated_from`, `on_navigated_to`) around
//! every transition.

pub use wayfinder_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use wayfinder_internal::prelude::*;
}
