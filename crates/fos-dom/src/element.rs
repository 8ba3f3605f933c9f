//! Element Query and Methods
//!
//! Attribute, class, dataset and inline style primitives plus
//! querySelectorAll, matches and closest.

use crate::attributes::is_valid_attribute_name;
use crate::{
    attribute_name_for_key, DomError, DomResult, DomTree, NodeId, SelectorList, StyleDeclaration,
    TokenList,
};

impl DomTree {
    /// Get an attribute value
    pub fn attribute(&self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.element(node)?.get_attr(name).map(str::to_string))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        if !is_valid_attribute_name(name) {
            return Err(DomError::InvalidToken(name.to_string()));
        }
        self.element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    /// Remove an attribute. Removing an absent attribute is not an error.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        self.element_mut(node)?.attrs.remove(name);
        Ok(())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element(node)?.attrs.contains(name))
    }

    /// Current class list of an element
    pub fn class_list(&self, node: NodeId) -> DomResult<TokenList> {
        Ok(TokenList::parse(self.element(node)?.get_attr("class").unwrap_or_default()))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        self.update_class_list(node, |list| list.add(class).map(|_| ()))
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        self.update_class_list(node, |list| list.remove(class).map(|_| ()))
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        let mut present = false;
        self.update_class_list(node, |list| {
            present = list.toggle(class)?;
            Ok(())
        })?;
        Ok(present)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.element(node)?.has_class(class))
    }

    fn update_class_list(
        &mut self,
        node: NodeId,
        update: impl FnOnce(&mut TokenList) -> DomResult<()>,
    ) -> DomResult<()> {
        let element = self.element_mut(node)?;
        let had_attribute = element.attrs.contains("class");
        let mut list = TokenList::parse(element.get_attr("class").unwrap_or_default());
        update(&mut list)?;
        // classList leaves a missing attribute missing when nothing was added
        if had_attribute || !list.is_empty() {
            element.set_attr("class", &list.value());
        }
        Ok(())
    }

    /// Read `data-*` attribute by camelCase key
    pub fn data(&self, node: NodeId, key: &str) -> DomResult<Option<String>> {
        let name = attribute_name_for_key(key)?;
        self.attribute(node, &name)
    }

    /// Write `data-*` attribute by camelCase key
    pub fn set_data(&mut self, node: NodeId, key: &str, value: &str) -> DomResult<()> {
        let name = attribute_name_for_key(key)?;
        self.element_mut(node)?.set_attr(&name, value);
        Ok(())
    }

    /// Inline style declarations of an element
    pub fn style(&self, node: NodeId) -> DomResult<StyleDeclaration> {
        Ok(StyleDeclaration::parse(self.element(node)?.get_attr("style").unwrap_or_default()))
    }

    /// Inline style property value, empty when unset
    pub fn style_property(&self, node: NodeId, property: &str) -> DomResult<String> {
        Ok(self.style(node)?.get(property).unwrap_or_default().to_string())
    }

    /// Set an inline style property. An empty value removes the property
    /// and an emptied declaration block drops the `style` attribute.
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        let mut style = self.style(node)?;
        style.set(property, value)?;
        let element = self.element_mut(node)?;
        if style.is_empty() {
            element.attrs.remove("style");
        } else {
            element.set_attr("style", &style.css_text());
        }
        Ok(())
    }

    /// All descendants of `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        self.node(root)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .filter(|&id| list.matches(self, id))
            .collect())
    }

    /// First descendant of `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        self.node(root)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .find(|&id| list.matches(self, id)))
    }

    /// Check if element matches selector
    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        let list = SelectorList::parse(selector)?;
        self.element(node)?;
        Ok(list.matches(self, node))
    }

    /// Find closest inclusive ancestor matching selector
    pub fn closest(&self, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        self.element(node)?;
        Ok(std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&id| list.matches(self, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(tag: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let el = tree.create_element(tag);
        tree.append_child(tree.root(), el).unwrap();
        (tree, el)
    }

    #[test]
    fn test_class_mutations() {
        let (mut tree, el) = tree_with("div");

        tree.add_class(el, "a").unwrap();
        tree.add_class(el, "b").unwrap();
        tree.add_class(el, "a").unwrap();
        assert_eq!(tree.attribute(el, "class").unwrap().as_deref(), Some("a b"));

        assert!(!tree.toggle_class(el, "a").unwrap());
        assert!(tree.toggle_class(el, "c").unwrap());
        tree.remove_class(el, "b").unwrap();
        assert_eq!(tree.attribute(el, "class").unwrap().as_deref(), Some("c"));
    }

    #[test]
    fn test_remove_class_without_attribute() {
        let (mut tree, el) = tree_with("div");
        tree.remove_class(el, "missing").unwrap();
        assert!(!tree.has_attribute(el, "class").unwrap());
    }

    #[test]
    fn test_element_only_operations() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hi");
        assert_eq!(tree.add_class(text, "x"), Err(DomError::InvalidNodeType(text)));
        assert_eq!(tree.attribute(text, "id"), Err(DomError::InvalidNodeType(text)));
        let stale = NodeId::from_raw(42);
        assert_eq!(tree.set_attribute(stale, "id", "x"), Err(DomError::NotFound(stale)));
    }

    #[test]
    fn test_invalid_attribute_name() {
        let (mut tree, el) = tree_with("div");
        assert!(tree.set_attribute(el, "", "x").is_err());
        assert!(tree.set_attribute(el, "a b", "x").is_err());
    }

    #[test]
    fn test_dataset() {
        let (mut tree, el) = tree_with("div");
        tree.set_data(el, "userId", "42").unwrap();
        assert_eq!(tree.attribute(el, "data-user-id").unwrap().as_deref(), Some("42"));
        assert_eq!(tree.data(el, "userId").unwrap().as_deref(), Some("42"));
        assert_eq!(tree.data(el, "missing").unwrap(), None);
        assert!(tree.set_data(el, "user-id", "1").is_err());
    }

    #[test]
    fn test_style_properties() {
        let (mut tree, el) = tree_with("div");
        assert_eq!(tree.style_property(el, "display").unwrap(), "");

        tree.set_style_property(el, "display", "none").unwrap();
        tree.set_style_property(el, "color", "red").unwrap();
        assert_eq!(
            tree.attribute(el, "style").unwrap().as_deref(),
            Some("display: none; color: red;")
        );

        tree.set_style_property(el, "display", "").unwrap();
        tree.set_style_property(el, "color", "").unwrap();
        assert!(!tree.has_attribute(el, "style").unwrap());
    }

    #[test]
    fn test_queries() {
        let mut tree = DomTree::new();
        let section = tree.create_element("section");
        let article = tree.create_element("article");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), section).unwrap();
        tree.append_child(section, article).unwrap();
        tree.append_child(article, span).unwrap();
        tree.add_class(article, "card").unwrap();

        assert_eq!(tree.query_selector_all(tree.root(), "section *").unwrap(), vec![article, span]);
        assert_eq!(tree.query_selector(section, "span").unwrap(), Some(span));
        assert!(tree.matches(article, ".card").unwrap());
        assert_eq!(tree.closest(span, ".card").unwrap(), Some(article));
        assert_eq!(tree.closest(span, "span").unwrap(), Some(span));
        assert_eq!(tree.closest(span, "ul").unwrap(), None);
        assert!(tree.query_selector_all(tree.root(), "[").is_err());
    }
}
