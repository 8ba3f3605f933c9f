//! Class token list
//!
//! Space-separated token handling behind `classList`.

use crate::{DomError, DomResult};

/// Ordered, duplicate-free set of tokens parsed from a `class` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<String>,
}

impl TokenList {
    /// Parse from space-separated string
    pub fn parse(s: &str) -> Self {
        let mut list = Self::default();
        for token in s.split_whitespace() {
            if !list.contains(token) {
                list.tokens.push(token.to_string());
            }
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Returns false if it was already present.
    pub fn add(&mut self, token: &str) -> DomResult<bool> {
        validate(token)?;
        if self.contains(token) {
            return Ok(false);
        }
        self.tokens.push(token.to_string());
        Ok(true)
    }

    /// Remove a token. Returns false if it was absent.
    pub fn remove(&mut self, token: &str) -> DomResult<bool> {
        validate(token)?;
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        Ok(self.tokens.len() != before)
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str) -> DomResult<bool> {
        if self.remove(token)? {
            Ok(false)
        } else {
            self.add(token)
        }
    }

    /// Serialized attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

fn validate(token: &str) -> DomResult<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidToken(token.to_string()));
    }
    Ok(())
}

impl std::fmt::Display for TokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}
