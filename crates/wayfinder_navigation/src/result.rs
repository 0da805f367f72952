//! Outcome of a navigation request.

use std::sync::Arc;
use wayfinder_routing::{ErrorKind, NavigationError};

/// Outcome reported by [`Navigator::navigate`](crate::Navigator::navigate).
///
/// | `success` | `error` | Meaning |
/// |-----------|---------|---------|
/// | `true` | `None` | the host committed the transition |
/// | `false` | `None` | the active destination vetoed the transition |
/// | `false` | `Some` | the navigation failed |
#[derive(Debug, Clone)]
pub struct NavigationResult {
    success: bool,
    error: Option<Arc<NavigationError>>,
}

impl NavigationResult {
    /// A committed navigation.
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A navigation vetoed by the active destination.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            success: false,
            error: None,
        }
    }

    /// A failed navigation.
    #[must_use]
    pub fn failed(error: impl Into<Arc<NavigationError>>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if the transition was committed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns `true` if the active destination vetoed the transition.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.success && self.error.is_none()
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&NavigationError> {
        self.error.as_deref()
    }

    /// Returns the failure kind, if any.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|error| error.kind())
    }

    /// Converts into a `Result`, treating a veto as `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns the shared failure if the navigation failed.
    pub fn into_result(self) -> Result<bool, Arc<NavigationError>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.success),
        }
    }
}
