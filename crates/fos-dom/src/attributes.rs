//! Element Attributes
//!
//! Ordered attribute storage: get, set, remove, has.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Whether `name` can be written as an attribute name in markup
pub(crate) fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
}

/// Named node map (attribute collection)
///
/// Attributes keep insertion order; setting an existing name replaces the
/// value in place. Names are stored ASCII-lowercased, as for HTML elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.attributes[i].value.as_str())
    }

    /// Set attribute by name/value
    pub fn set(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(i) => self.attributes[i].value = value.to_string(),
            None => self.attributes.push(Attr::new(name.to_ascii_lowercase(), value)),
        }
    }

    /// Remove attribute by name, returning its old value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.attributes.remove(i).value)
    }

    /// Check if attribute exists
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate over attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }
}
