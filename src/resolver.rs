//! Placeholder substitution for request fields
//!
//! Replaces `{{name}}` placeholders in the URL, body and header values with
//! variables from the `VariableStore` before a request is sent.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::cache::{StoreError, VariableStore};

/// Shortest `{{...}}` span, at least one character between the braces
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.+?\}\}").expect("placeholder regex is valid"));

/// Errors that can occur while resolving placeholders
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A placeholder names a variable that is not stored
    #[error("Unresolved placeholder {{{{{0}}}}}: variable {0:?} does not exist")]
    Unresolved(String),

    /// The store could not be read
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => ResolveError::Unresolved(name),
            other => ResolveError::Store(other),
        }
    }
}

/// Returns the distinct placeholders in `input`, in order of first appearance.
pub fn placeholders(input: &str) -> Vec<&str> {
    let mut found: Vec<&str> = Vec::new();
    for m in PLACEHOLDER_REGEX.find_iter(input) {
        if !found.contains(&m.as_str()) {
            found.push(m.as_str());
        }
    }
    found
}

/// Extracts the variable name from a matched placeholder
fn variable_name(placeholder: &str) -> &str {
    placeholder
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
        .unwrap_or(placeholder)
}

/// Substitutes every `{{name}}` placeholder in `input` with its stored value.
///
/// Each distinct placeholder is looked up once and all of its occurrences
/// are replaced. Input without placeholders (including the empty string) is
/// returned unchanged and never loads the store.
///
/// # Returns
/// * `Ok(String)` with all placeholders substituted
/// * `Err(ResolveError::Unresolved)` naming the first missing variable; no
///   partially substituted text is returned
pub fn resolve(input: &str, store: &mut VariableStore) -> Result<String, ResolveError> {
    let mut resolved = input.to_string();

    for placeholder in placeholders(input) {
        let value = store.get(variable_name(placeholder))?;
        resolved = resolved.replace(placeholder, &value);
    }

    Ok(resolved)
}
