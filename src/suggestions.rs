//! # Error Suggestions
//!
//! Helpers that build errors carrying hints. Errors should say what went
//! wrong AND how to fix it, so every constructor here attaches at least one
//! hint for the user.

use std::path::Path;

use crate::defaults::DESCRIPTOR_CANDIDATES;
use crate::error::Error;

/// The template does not contain a descriptor at any known location.
pub fn descriptor_not_found(template_root: &Path) -> Error {
    Error::ConfigParse {
        message: format!(
            "No template descriptor found in {}",
            template_root.display()
        ),
        hint: Some(format!(
            "Add one of {} to the template repository",
            DESCRIPTOR_CANDIDATES.join(", ")
        )),
    }
}

/// A `--set` value names a placeholder the template does not declare.
pub fn unknown_placeholder(name: &str, known: &[&str]) -> Error {
    let hint = match find_similar(name, known) {
        Some(similar) => format!("Did you mean '{}'?", similar),
        None if known.is_empty() => "The template declares no placeholders".to_string(),
        None => format!("Known placeholders: {}", known.join(", ")),
    };
    Error::UnknownPlaceholder {
        name: name.to_string(),
        hint: Some(hint),
    }
}

/// A `--set` argument is not of the form `NAME=VALUE`.
pub fn malformed_assignment(raw: &str) -> Error {
    Error::ConfigParse {
        message: format!("Invalid placeholder assignment '{}'", raw),
        hint: Some("Use --set NAME=VALUE, for example --set PROJECT=demo".to_string()),
    }
}

/// Two placeholders use patterns where one contains the other.
pub fn overlapping_patterns(outer: &str, inner: &str) -> Error {
    Error::OverlappingPatterns {
        outer: outer.to_string(),
        inner: inner.to_string(),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(&input.to_lowercase(), &candidate.to_lowercase());
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
