//! Utility functions for label quoting in phylogenetic data formats.
//!
//! Writers use these to make sure a label re-reads to the same text:
//! labels containing whitespace or punctuation are wrapped in single
//! quotes, internal single quotes doubled.

use crate::parser::scanner::{is_punctuation, is_whitespace};
use std::borrow::Cow;

/// Checks whether a label must be quoted, i.e. contains any whitespace
/// or punctuation character.
///
/// # Arguments
/// * `label` - The label string to check
///
/// # Returns
/// `true` if the label has to be wrapped in single quotes
///
/// # Examples
/// ```
/// # use phylonex::parser::utils::needs_quotes;
/// assert_eq!(needs_quotes("Pukeko"), false);
/// assert_eq!(needs_quotes("Porphyrio_melanotus"), false);
/// assert_eq!(needs_quotes("Australasian Swamphen"), true);
/// assert_eq!(needs_quotes("Pu[ke]ko"), true);
/// assert_eq!(needs_quotes("Baillon's"), true);
/// ```
pub fn needs_quotes(label: &str) -> bool {
    label
        .bytes()
        .any(|b| is_whitespace(b) || is_punctuation(b))
}

/// Quotes a label for NEXUS and Newick output if necessary.
///
/// Labels without whitespace and punctuation are returned unchanged;
/// all others are wrapped in single quotes, with internal single quotes
/// doubled.
///
/// # Examples
/// ```
/// # use phylonex::parser::utils::quote_label;
/// assert_eq!(quote_label("Pukeko"), "Pukeko");
/// assert_eq!(quote_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(quote_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn quote_label(label: &str) -> Cow<'_, str> {
    if needs_quotes(label) {
        Cow::Owned(format!("'{}'", label.replace('\'', "''")))
    } else {
        Cow::Borrowed(label)
    }
}
