//! # Text and Path Substitution
//!
//! The substitution engine applies a set of replacements to a string in a
//! single pass. It is used for file contents, for relative file paths and
//! by composite replacement nodes to expand their own values.
//!
//! ## Algorithm
//!
//! 1. For every replacement, find all non-overlapping occurrences of its
//!    pattern with a left-to-right scan. The cursor skips past each match, so
//!    a pattern is never re-found inside itself or inside text that was
//!    produced by a replacement.
//! 2. Collect the `(range, replacement)` pairs and stable-sort them by range
//!    start. Ties keep discovery order.
//! 3. Walk the sorted pairs once, keeping the running length difference
//!    between the output buffer and the original text, and splice each
//!    computed value into the buffer at the shifted range.
//!
//! Ranges are half-open byte ranges `[start, start + pattern.len())`. A range
//! that starts before the end of the previously applied range is dropped, so
//! when two matches overlap the one that starts first wins.
//!
//! The engine does no I/O and no logging; callers observe the returned
//! string.

use std::ops::Range;

/// Something that can be substituted into text.
pub trait Replacement {
    /// The literal token to search for.
    fn pattern(&self) -> &str;

    /// The text inserted in place of every occurrence of the pattern.
    fn compute(&self) -> String;
}

impl<T: Replacement + ?Sized> Replacement for &T {
    fn pattern(&self) -> &str {
        (**self).pattern()
    }

    fn compute(&self) -> String {
        (**self).compute()
    }
}

/// A fixed pattern/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub pattern: String,
    pub value: String,
}

impl Literal {
    pub fn new(pattern: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            value: value.into(),
        }
    }
}

impl Replacement for Literal {
    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn compute(&self) -> String {
        self.value.clone()
    }
}

/// Find every non-overlapping occurrence of `pattern` in `text`.
///
/// An empty pattern matches nothing.
pub fn find_ranges(text: &str, pattern: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    if pattern.is_empty() {
        return ranges;
    }

    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(pattern) {
        let start = cursor + offset;
        let end = start + pattern.len();
        ranges.push(start..end);
        cursor = end;
    }
    ranges
}

/// Collect the match ranges of every replacement, in discovery order.
pub fn collect_matches<'a, R: Replacement>(
    text: &str,
    replacements: &'a [R],
) -> Vec<(Range<usize>, &'a R)> {
    let mut matches = Vec::new();
    for replacement in replacements {
        for range in find_ranges(text, replacement.pattern()) {
            matches.push((range, replacement));
        }
    }
    matches
}

/// Splice computed values into `text` at the given ranges.
///
/// The ranges refer to positions in the original `text`. They do not have
/// to be sorted; overlapping ranges are resolved in favour of the earliest
/// start.
pub fn apply_ranges<R: Replacement>(text: &str, mut matches: Vec<(Range<usize>, R)>) -> String {
    // sort_by_key is stable, so equal starts keep discovery order
    matches.sort_by_key(|(range, _)| range.start);

    let mut output = text.to_string();
    let mut delta: isize = 0;
    let mut applied_end = 0;

    for (range, replacement) in matches {
        if range.start < applied_end {
            continue;
        }
        debug_assert!(range.end <= text.len());

        let value = replacement.compute();
        let start = shift(range.start, delta);
        let end = shift(range.end, delta);
        output.replace_range(start..end, &value);

        delta += value.len() as isize - (range.end - range.start) as isize;
        applied_end = range.end;
    }

    output
}

/// Apply every replacement to `text` in one pass.
pub fn apply_all<R: Replacement>(text: &str, replacements: &[R]) -> String {
    let matches = collect_matches(text, replacements);
    if matches.is_empty() {
        return text.to_string();
    }
    apply_ranges(text, matches)
}

/// Whether any replacement pattern occurs in `text`.
pub fn contains_any<R: Replacement>(text: &str, replacements: &[R]) -> bool {
    replacements
        .iter()
        .any(|r| !r.pattern().is_empty() && text.contains(r.pattern()))
}

fn shift(position: usize, delta: isize) -> usize {
    (position as isize + delta) as usize
}
