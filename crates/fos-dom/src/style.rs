//! Inline style declarations
//!
//! The `style` attribute viewed as an ordered list of `property: value`
//! pairs. Separators inside quoted strings, parentheses or after a
//! backslash escape belong to the value.

use crate::{DomError, DomResult};

/// Parsed inline style
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl StyleDeclaration {
    /// Parse a `style` attribute. Malformed declarations are dropped.
    pub fn parse(css: &str) -> Self {
        let mut style = Self::default();
        for declaration in scan(css).pieces {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if !is_valid_property(property) || value.is_empty() {
                continue;
            }
            style.insert(property.to_ascii_lowercase(), value);
        }
        style
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Get a property value
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it.
    ///
    /// A value that would not read back as one declaration (a `;` outside
    /// quotes and parentheses, an unclosed string or bracket) is rejected.
    pub fn set(&mut self, property: &str, value: &str) -> DomResult<()> {
        let property = property.trim();
        if !is_valid_property(property) {
            return Err(DomError::InvalidToken(property.to_string()));
        }
        let value = value.trim();
        if value.is_empty() {
            self.remove(property);
            return Ok(());
        }
        let scanned = scan(value);
        if scanned.pieces.len() != 1 || !scanned.balanced {
            return Err(DomError::InvalidStyleValue {
                property: property.to_string(),
                value: value.to_string(),
            });
        }
        self.insert(property.to_ascii_lowercase(), value);
        Ok(())
    }

    /// Remove a property, returning its old value
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self
            .declarations
            .iter()
            .position(|(p, _)| p.eq_ignore_ascii_case(property))?;
        Some(self.declarations.remove(index).1)
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn insert(&mut self, property: String, value: &str) {
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
    }
}

fn is_valid_property(property: &str) -> bool {
    !property.is_empty()
        && property
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
}

struct Scan<'a> {
    pieces: Vec<&'a str>,
    balanced: bool,
}

/// Split on `;` outside quotes and parentheses
fn scan(css: &str) -> Scan<'_> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut stray_close = false;
    let mut escaped = false;

    for (i, c) in css.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => stray_close = true,
            },
            (None, ';') if depth == 0 => {
                pieces.push(&css[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&css[start..]);

    Scan {
        pieces,
        balanced: quote.is_none() && depth == 0 && !stray_close && !escaped,
    }
}
