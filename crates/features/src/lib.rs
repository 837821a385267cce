//! Feature extraction for patent comparison.
//!
//! Provides pure functions for turning patent text fields into comparable
//! features:
//! - Keyword term sets
//! - Abstract word sequences
//! - Primary classification class
//! - Case-folded applicant names

use std::collections::{BTreeSet, HashSet};

/// Case-fold text for comparison.
///
/// Both sides of every comparison go through this function so that
/// Unicode lower-casing is applied identically.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Split a comma-separated keyword field into a set of case-folded terms.
///
/// Empty terms (from ",," or trailing commas) are dropped.
pub fn keyword_terms(text: &str) -> BTreeSet<String> {
    fold_case(text)
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Terms present in both keyword sets, in sorted order.
pub fn keyword_overlap(terms1: &BTreeSet<String>, terms2: &BTreeSet<String>) -> Vec<String> {
    terms1.intersection(terms2).cloned().collect()
}

/// Split an abstract into case-folded words. Duplicates are kept.
pub fn abstract_words(text: &str) -> Vec<String> {
    fold_case(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Count the words of `words` that occur anywhere in `other`.
///
/// Membership-based: a repeated word counts once per occurrence in `words`
/// as long as it appears at least once in `other`.
pub fn common_word_count(words: &[String], other: &[String]) -> usize {
    let lookup: HashSet<&str> = other.iter().map(String::as_str).collect();
    words.iter().filter(|w| lookup.contains(w.as_str())).count()
}

/// Extract the primary class of an IPC/CPC code: the text before the first space.
pub fn primary_class(code: &str) -> Option<&str> {
    code.trim()
        .split(' ')
        .next()
        .filter(|class| !class.is_empty())
}

/// Case-insensitive applicant equality.
pub fn same_applicant(applicant1: &str, applicant2: &str) -> bool {
    fold_case(applicant1) == fold_case(applicant2)
}
