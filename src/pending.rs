//! Pending-work detection.
//!
//! A resource entry whose value is byte-identical to its key has not been
//! translated yet. This cannot tell a never-translated placeholder from a
//! translation that happens to equal the source text ("OK", "Email", brand
//! names); those are flagged again on every run.
//!
//! Source strings with no entry at all are *not* pending: they need an
//! identity placeholder in the resource file before any tool picks them up.

use std::collections::{BTreeSet, HashMap};

/// Source strings present in `existing` whose value still equals the key, sorted
pub fn pending_strings(
    source: &BTreeSet<String>,
    existing: &HashMap<String, String>,
) -> Vec<String> {
    source
        .iter()
        .filter(|s| existing.get(*s).is_some_and(|value| value == *s))
        .cloned()
        .collect()
}

/// Source strings with no entry in `existing`, sorted
pub fn missing_strings(
    source: &BTreeSet<String>,
    existing: &HashMap<String, String>,
) -> Vec<String> {
    source
        .iter()
        .filter(|s| !existing.contains_key(*s))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn source(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn existing(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pending_only_identity_entries() {
        let pending = pending_strings(
            &source(&["Hello", "Save %@"]),
            &existing(&[("Hello", "Hello"), ("Save %@", "Guardar %@")]),
        );

        assert_eq!(pending, vec!["Hello"]);
    }

    #[test]
    fn test_pending_skips_absent_keys() {
        let pending = pending_strings(&source(&["Hello", "New"]), &existing(&[("Hello", "Hello")]));
        assert_eq!(pending, vec!["Hello"]);
    }

    #[test]
    fn test_pending_ignores_entries_not_in_source() {
        let pending = pending_strings(&source(&["Hello"]), &existing(&[("Stale", "Stale")]));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_pending_is_sorted() {
        let pending = pending_strings(
            &source(&["b", "a", "c"]),
            &existing(&[("c", "c"), ("a", "a"), ("b", "b")]),
        );
        assert_eq!(pending, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pending_identical_translation_is_still_pending() {
        // "OK" is a valid French translation of "OK", but it looks untranslated
        let pending = pending_strings(&source(&["OK"]), &existing(&[("OK", "OK")]));
        assert_eq!(pending, vec!["OK"]);
    }

    #[test]
    fn test_missing_strings() {
        let missing = missing_strings(
            &source(&["Hello", "New", "Save"]),
            &existing(&[("Hello", "Hola"), ("Save", "Save")]),
        );
        assert_eq!(missing, vec!["New"]);
    }

    #[test]
    fn test_missing_strings_empty_file() {
        let missing = missing_strings(&source(&["a", "b"]), &HashMap::new());
        assert_eq!(missing, vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_pending_entries_exist_and_are_identity(
            keys in proptest::collection::btree_set("[a-d]{1,2}", 0..10),
            entries in proptest::collection::hash_map("[a-d]{1,2}", "[a-d]{1,2}", 0..10),
        ) {
            for s in pending_strings(&keys, &entries) {
                prop_assert!(keys.contains(&s));
                prop_assert_eq!(entries.get(&s), Some(&s));
            }
        }

        #[test]
        fn prop_pending_and_missing_are_disjoint(
            keys in proptest::collection::btree_set("[a-d]{1,2}", 0..10),
            entries in proptest::collection::hash_map("[a-d]{1,2}", "[a-d]{1,2}", 0..10),
        ) {
            let missing = missing_strings(&keys, &entries);
            for s in pending_strings(&keys, &entries) {
                prop_assert!(!missing.contains(&s));
            }
        }
    }
}
