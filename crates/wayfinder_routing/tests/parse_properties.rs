//! Property tests for target parsing and resolution.

use indexmap::IndexSet;
use proptest::prelude::*;
use wayfinder_routing::{resolver, uri};

fn segment_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{0,11}"
}

fn query() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,6}", "[A-Za-z0-9]{0,6}"), 0..3)
}

fn render(name: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return name.to_string();
    }
    let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{name}?{}", pairs.join("&"))
}

proptest! {
    #[test]
    fn rejoined_names_reproduce_path(
        names in prop::collection::vec(segment_name(), 0..6),
        leading in any::<bool>(),
        trailing in any::<bool>(),
    ) {
        let mut target = names.join("/");
        if leading {
            target.insert(0, '/');
        }
        if trailing {
            target.push('/');
        }

        let segments = uri::parse(&target);
        prop_assert_eq!(uri::join_names(&segments), names.join("/"));
    }

    #[test]
    fn query_strings_never_leak_into_names(
        parts in prop::collection::vec((segment_name(), query()), 1..5),
    ) {
        let target = parts
            .iter()
            .map(|(name, query)| render(name, query))
            .collect::<Vec<_>>()
            .join("/");

        let segments = uri::parse(&target);
        prop_assert_eq!(segments.len(), parts.len());
        for (segment, (name, query)) in segments.iter().zip(&parts) {
            prop_assert_eq!(segment.name(), name.as_str());
            for (key, _) in query {
                prop_assert!(segment.query().contains_key(key));
            }
        }
    }

    #[test]
    fn absolute_prefix_tracks_structural_match(
        names in prop::collection::vec(segment_name(), 1..5),
        structural in prop::collection::vec(segment_name(), 0..4),
    ) {
        let structural: IndexSet<String> = structural.into_iter().collect();
        let segments = uri::parse(&names.join("/"));
        let resolution = resolver::resolve(&segments, &structural);

        let matched = structural.contains(&names[0]);
        prop_assert_eq!(resolution.is_absolute(), matched);
        prop_assert_eq!(resolution.path().starts_with("//"), matched);
        prop_assert_eq!(resolution.path().trim_start_matches('/'), names.join("/"));
        prop_assert_eq!(resolution.on_demand().len(), names.len() - usize::from(matched));
    }
}
