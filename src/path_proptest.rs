//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{clean, join_clean, relative_to, to_label};
    use proptest::prelude::*;
    use std::path::{Component, PathBuf};

    /// Strategy producing relative paths made of names, `.` and `..`.
    fn relative_path() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                4 => prop::string::string_regex("[a-z]{1,6}").unwrap(),
                1 => Just(".".to_string()),
                1 => Just("..".to_string()),
            ],
            0..8,
        )
        .prop_map(|parts| parts.join("/"))
    }

    /// Strategy producing relative paths made of names only.
    fn plain_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,6}", 1..6).prop_map(|parts| parts.join("/"))
    }

    // ============================================================================
    // clean property tests
    // ============================================================================

    proptest! {
        /// Property: cleaning is idempotent
        #[test]
        fn clean_is_idempotent(input in relative_path()) {
            let once = clean(&input);
            let twice = clean(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: a cleaned path never contains `.` and only leads with `..`
        #[test]
        fn clean_leaves_no_inner_dots(input in relative_path()) {
            let cleaned = clean(&input);
            let mut seen_normal = false;
            for component in cleaned.components() {
                match component {
                    Component::CurDir => prop_assert!(false, "found '.' in {:?}", cleaned),
                    Component::ParentDir => prop_assert!(!seen_normal, "inner '..' in {:?}", cleaned),
                    Component::Normal(_) => seen_normal = true,
                    _ => {}
                }
            }
        }

        /// Property: absolute paths never escape the root
        #[test]
        fn clean_absolute_stays_absolute(input in relative_path()) {
            let cleaned = clean(format!("/{}", input));
            prop_assert!(cleaned.starts_with("/"));
            prop_assert!(!cleaned.components().any(|c| c == Component::ParentDir));
        }
    }

    // ============================================================================
    // relative_to property tests
    // ============================================================================

    proptest! {
        /// Property: joining a base with the relative path leads back to the target
        #[test]
        fn relative_to_round_trips(base in plain_path(), target in plain_path()) {
            let base = PathBuf::from("/root").join(base);
            let target = PathBuf::from("/root").join(target);
            let relative = relative_to(&base, &target).unwrap();
            prop_assert_eq!(join_clean(&base, &relative), clean(&target));
        }

        /// Property: a path below the base is labelled without any `..`
        #[test]
        fn relative_to_descendant_has_no_parent_dirs(base in plain_path(), rest in plain_path()) {
            let target = format!("{}/{}", base, rest);
            let relative = relative_to(&base, &target).unwrap();
            prop_assert_eq!(to_label(&relative), rest);
        }
    }
}
