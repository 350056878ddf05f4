//! Property-based tests for the substitution engine and replacement nodes.
//!
//! Patterns are drawn from a delimiter alphabet (`@@A@@`) and values, as well
//! as surrounding text, from lowercase letters, so values can never recreate
//! a pattern.

#[cfg(test)]
mod proptest_tests {
    use crate::placeholder::Placeholder;
    use crate::replacement::ReplacementSet;
    use crate::substitute::{apply_all, apply_ranges, contains_any, find_ranges, Literal};
    use proptest::prelude::*;

    const NAMES: [&str; 4] = ["A", "B", "C", "D"];

    fn pattern(name: &str) -> String {
        format!("@@{}@@", name)
    }

    /// Text made of plain words and pattern occurrences.
    fn template_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-z ]{0,8}",
                (0..NAMES.len()).prop_map(|i| pattern(NAMES[i])),
            ],
            0..12,
        )
        .prop_map(|parts| parts.concat())
    }

    fn literals(values: &[String]) -> Vec<Literal> {
        NAMES
            .iter()
            .zip(values)
            .map(|(name, value)| Literal::new(pattern(name), value.clone()))
            .collect()
    }

    // ============================================================================
    // apply_all property tests
    // ============================================================================

    proptest! {
        /// Property: no pattern survives a pass when values contain no patterns
        #[test]
        fn apply_all_removes_every_pattern(
            text in template_text(),
            values in prop::collection::vec("[a-z]{0,6}", 4),
        ) {
            let replacements = literals(&values);
            let output = apply_all(&text, &replacements);
            prop_assert!(!contains_any(&output, &replacements));
        }

        /// Property: a second pass over substituted text is a no-op
        #[test]
        fn apply_all_is_idempotent(
            text in template_text(),
            values in prop::collection::vec("[a-z]{0,6}", 4),
        ) {
            let replacements = literals(&values);
            let once = apply_all(&text, &replacements);
            let twice = apply_all(&once, &replacements);
            prop_assert_eq!(once, twice);
        }

        /// Property: the single pass agrees with sequential str::replace for
        /// patterns that cannot overlap
        #[test]
        fn apply_all_matches_sequential_replace(
            text in template_text(),
            values in prop::collection::vec("[a-z]{0,6}", 4),
        ) {
            let replacements = literals(&values);
            let mut expected = text.clone();
            for literal in &replacements {
                expected = expected.replace(&literal.pattern, &literal.value);
            }
            prop_assert_eq!(apply_all(&text, &replacements), expected);
        }

        /// Property: text without patterns is returned unchanged
        #[test]
        fn apply_all_leaves_plain_text(text in "[a-z ]{0,40}") {
            let replacements = literals(&["x".to_string(), "y".to_string()]);
            prop_assert_eq!(apply_all(&text, &replacements), text);
        }
    }

    // ============================================================================
    // find_ranges / apply_ranges property tests
    // ============================================================================

    proptest! {
        /// Property: ranges are sorted, disjoint and point at the pattern
        #[test]
        fn find_ranges_are_disjoint_matches(text in "[ab]{0,30}", pat in "[ab]{1,3}") {
            let ranges = find_ranges(&text, &pat);
            for window in ranges.windows(2) {
                prop_assert!(window[0].end <= window[1].start);
            }
            for range in &ranges {
                prop_assert_eq!(&text[range.clone()], pat.as_str());
            }
        }

        /// Property: the output length equals the input length plus the
        /// length drift of every replaced range
        #[test]
        fn apply_ranges_accounts_for_length_drift(
            text in template_text(),
            value in "[a-z]{0,10}",
        ) {
            let literal = Literal::new(pattern("A"), value.clone());
            let ranges = find_ranges(&text, &literal.pattern);
            let expected_len = text.len() + ranges.len() * value.len()
                - ranges.len() * literal.pattern.len();

            let matches = ranges.into_iter().map(|r| (r, &literal)).collect();
            prop_assert_eq!(apply_ranges(&text, matches).len(), expected_len);
        }
    }

    // ============================================================================
    // ReplacementSet property tests
    // ============================================================================

    proptest! {
        /// Property: a chain D -> C -> B -> A expands to a fixed point
        #[test]
        fn chained_nodes_reach_fixed_point(
            base in "[a-z]{1,6}",
            prefixes in prop::collection::vec("[a-z]{0,4}", 3),
            text in template_text(),
        ) {
            let mut placeholders = vec![Placeholder::new("A", pattern("A")).resolve_with(base)];
            for (i, prefix) in prefixes.iter().enumerate() {
                let name = NAMES[i + 1];
                let value = format!("{}{}", prefix, pattern(NAMES[i]));
                placeholders.push(Placeholder::new(name, pattern(name)).resolve_with(value));
            }
            let set = ReplacementSet::compile(&placeholders).unwrap();

            let output = set.apply(&text);
            prop_assert!(!set.matches(&output));
            prop_assert_eq!(set.apply(&output), output);
        }

        /// Property: every node shares the single node compiled for A
        #[test]
        fn references_share_one_node(values in prop::collection::vec("[a-z]{0,4}", 3)) {
            let mut placeholders = vec![Placeholder::new("A", pattern("A")).resolve_with("base")];
            for (i, value) in values.iter().enumerate() {
                let name = NAMES[i + 1];
                placeholders.push(
                    Placeholder::new(name, pattern(name))
                        .resolve_with(format!("{}{}", value, pattern("A"))),
                );
            }
            let set = ReplacementSet::compile(&placeholders).unwrap();
            let a = set.get("A").unwrap();

            prop_assert_eq!(set.len(), 4);
            for name in &NAMES[1..] {
                let node = set.node(set.get(name).unwrap());
                prop_assert!(node.references().iter().all(|(_, id)| *id == a));
            }
        }
    }
}
