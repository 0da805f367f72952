//! Typed navigation parameters.
//!
//! [`NavigationParameters`] is an ordered `String -> serde_json::Value` map.
//! Callers pass arbitrary values; query strings contribute string values.
//! Reads go through [`get`](NavigationParameters::get), which converts to the
//! requested type and parses string values when the stored JSON type does not
//! match (`"3"` reads as `3i32`).

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// How the destination receiving a set of parameters was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationMode {
    /// Forward navigation to a newly entered destination.
    New,
}

/// Errors returned when reading a parameter.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    /// No value is stored under the key.
    #[error("parameter '{0}' is missing")]
    Missing(String),

    /// The stored value cannot be converted to the requested type.
    #[error("parameter '{key}' cannot be read as {type_name}: {source}")]
    Conversion {
        /// The parameter key.
        key: String,
        /// The requested type.
        type_name: &'static str,
        /// The underlying conversion error.
        #[source]
        source: serde_json::Error,
    },

    /// The value could not be serialized on insert.
    #[error("parameter '{key}' cannot be serialized: {source}")]
    Serialization {
        /// The parameter key.
        key: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Parameters delivered to destinations during a navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationParameters {
    values: IndexMap<String, Value>,
    mode: Option<NavigationMode>,
}

impl NavigationParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Inserts a value and returns `self`, for chained construction.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Serializes `value` and inserts it.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Serialization`] if `value` cannot be
    /// represented as JSON.
    pub fn insert_serialized<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), ParameterError> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|source| {
            ParameterError::Serialization {
                key: key.clone(),
                source,
            }
        })?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Reads a value as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if the key is absent, or
    /// [`ParameterError::Conversion`] if the value cannot be read as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ParameterError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ParameterError::Missing(key.to_string()))?;

        match serde_json::from_value::<T>(value.clone()) {
            Ok(converted) => Ok(converted),
            Err(source) => match value {
                // Query string values arrive as strings; parse them as JSON literals
                Value::String(raw) => {
                    serde_json::from_str::<T>(raw).map_err(|_| ParameterError::Conversion {
                        key: key.to_string(),
                        type_name: core::any::type_name::<T>(),
                        source,
                    })
                }
                _ => Err(ParameterError::Conversion {
                    key: key.to_string(),
                    type_name: core::any::type_name::<T>(),
                    source,
                }),
            },
        }
    }

    /// Reads a value as `T`, returning `None` when missing or not convertible.
    #[must_use]
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).ok()
    }

    /// Returns `true` if a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns how the receiving destination was reached, if recorded.
    #[must_use]
    pub fn navigation_mode(&self) -> Option<NavigationMode> {
        self.mode
    }

    /// Records how the receiving destination was reached.
    pub fn set_navigation_mode(&mut self, mode: NavigationMode) {
        self.mode = Some(mode);
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for NavigationParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
