//! Dataset key mapping
//!
//! `data-*` attribute names to camelCase dataset keys and back.

use crate::attributes::is_valid_attribute_name;
use crate::{DomError, DomResult};

/// Map a camelCase dataset key to its `data-*` attribute name.
///
/// Keys containing a `-` followed by an ASCII lowercase letter have no
/// attribute form and are rejected, as are keys whose attribute name could
/// not be written in markup.
pub fn attribute_name_for_key(key: &str) -> DomResult<String> {
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' && chars.peek().is_some_and(char::is_ascii_lowercase) {
            return Err(DomError::InvalidDataKey(key.to_string()));
        }
    }
    let name = format!("data-{}", to_kebab_case(key));
    if !is_valid_attribute_name(&name) {
        return Err(DomError::InvalidDataKey(key.to_string()));
    }
    Ok(name)
}

/// Map a `data-*` attribute name to its camelCase dataset key, if it is one
pub fn key_for_attribute_name(name: &str) -> Option<String> {
    name.strip_prefix("data-").map(to_camel_case)
}

/// Convert kebab-case to camelCase
fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                result.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

/// Convert camelCase to kebab-case
fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
