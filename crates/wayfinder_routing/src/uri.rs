//! Navigation target tokenizer.
//!
//! A navigation target is either an absolute URI (`app://main/details?id=3`)
//! or a bare relative path (`main/details?id=3`). Both forms are split into an
//! ordered list of [`SegmentDescriptor`]s, one per non-empty `/` component.
//!
//! Each component may carry its own query string. Parameters are attached to
//! the segment they follow, so `a?x=1/b?y=2` produces two segments with one
//! parameter each.
//!
//! # Example
//!
//! ```
//! use wayfinder_routing::uri;
//!
//! let segments = uri::parse("app://main/details?id=3&name=dan");
//!
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].name(), "main");
//! assert_eq!(segments[1].name(), "details");
//! assert_eq!(segments[1].query().get("id").map(String::as_str), Some("3"));
//! ```

use crate::parameters::NavigationParameters;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;

/// Ordered query parameters of a single segment.
pub type QueryParameters = IndexMap<String, String>;

/// One `/`-delimited component of a navigation target.
///
/// The name is never empty. Descriptors are immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    name: String,
    query: QueryParameters,
}

impl SegmentDescriptor {
    /// Parses a single path component such as `details?id=3`.
    ///
    /// Returns `None` when the component has no name (`""` or `"?id=3"`).
    #[must_use]
    pub fn parse(component: &str) -> Option<Self> {
        let (name, query) = match component.split_once('?') {
            Some((name, query)) => (name, parse_query(query)),
            None => (component, QueryParameters::new()),
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            query,
        })
    }

    /// Returns the route name of this segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the query parameters attached to this segment.
    #[must_use]
    pub fn query(&self) -> &QueryParameters {
        &self.query
    }

    /// Returns `true` if the segment carries query parameters.
    #[must_use]
    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }
}

/// Splits a navigation target into segment descriptors.
///
/// - A `scheme://` prefix is dropped; everything after it is path.
/// - Empty components (leading, trailing or doubled `/`) are discarded.
/// - Each component is split at its first `?` into a name and a query string.
///
/// Empty input yields an empty sequence.
#[must_use]
pub fn parse(target: &str) -> Vec<SegmentDescriptor> {
    strip_scheme(target)
        .split('/')
        .filter_map(SegmentDescriptor::parse)
        .collect()
}

/// Joins segment names with `/`, dropping query parameters.
#[must_use]
pub fn join_names(segments: &[SegmentDescriptor]) -> String {
    segments
        .iter()
        .map(SegmentDescriptor::name)
        .collect::<Vec<_>>()
        .join("/")
}

/// Merges a segment's query parameters over `fallback`.
///
/// Segment values take precedence over fallback values with the same key.
/// The fallback's navigation mode is preserved.
#[must_use]
pub fn parse_segment_parameters(
    segment: &SegmentDescriptor,
    fallback: &NavigationParameters,
) -> NavigationParameters {
    let mut merged = fallback.clone();
    for (key, value) in segment.query() {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn strip_scheme(target: &str) -> &str {
    match target.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => target,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Parses `key=value&key2=value2`. Later duplicates overwrite earlier values.
fn parse_query(query: &str) -> QueryParameters {
    let mut params = QueryParameters::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        // Split on the first '=' only so values may contain '='
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            continue;
        }
        params.insert(decode(key), decode(value));
    }
    params
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
