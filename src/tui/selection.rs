//! Applying accepted candidates to the query text.
//!
//! Also holds the set of tokens that were inserted through the dropdown, which
//! is what the input highlights and what the chip list shows.

use crate::tui::autocomplete::Candidate;
use crate::tui::text::{split_whitespace_runs, trailing_token};

/// Result of applying a candidate to the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// The proposed new text, always ending in a single space.
    pub text: String,
    /// The token that was inserted (`table` or `table.column`).
    pub inserted: String,
}

/// Replaces the trailing token of `text` with `candidate`.
///
/// The trailing token is re-derived from `text` itself, so a candidate list
/// computed against an older value can never clobber unrelated text.
pub fn apply(text: &str, candidate: &Candidate) -> Applied {
    match candidate {
        Candidate::Table { name } => {
            let mut words = split_whitespace_runs(text);
            if let Some(last) = words.last_mut() {
                *last = name.as_str();
            }
            let mut text = words.join(" ");
            text.push(' ');
            Applied {
                text,
                inserted: name.clone(),
            }
        }
        Candidate::Column { table, name, .. } => {
            let token = trailing_token(text);
            let prefix = &text[..text.len() - token.len()];
            let inserted = format!("{table}.{name}");
            Applied {
                text: format!("{prefix}{inserted} "),
                inserted,
            }
        }
    }
}

/// Tokens inserted through the dropdown, in insertion order.
///
/// Every member is a case-insensitive substring of the current text once
/// [`SelectedTokens::prune`] has run for that text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedTokens {
    tokens: Vec<String>,
}

impl SelectedTokens {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token. Returns false if it was already present.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.tokens.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Drops every token that no longer occurs in `text`, ignoring case.
    ///
    /// Returns true if anything was removed.
    pub fn prune(&mut self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        let before = self.tokens.len();
        self.tokens
            .retain(|token| haystack.contains(&token.to_lowercase()));
        self.tokens.len() != before
    }

    /// Returns true if `token` is a member.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}
