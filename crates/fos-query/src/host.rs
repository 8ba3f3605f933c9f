//! Host document boundary
//!
//! The native per-node primitives a [`Wrapper`](crate::Wrapper) drives.
//! [`Document`] is the production host; tests wrap it to observe calls.

use std::rc::Rc;

use fos_dom::{Document, DomError, Event, ListenerId, NodeId, SelectorList};
use fos_html::HtmlError;

/// Listener as seen by a host: it receives the host the event fired in
pub type HostListener<H> = Rc<dyn Fn(&H, &mut Event)>;

/// A native rejection, passed through untranslated
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] HtmlError),
}

impl HostError {
    /// The underlying DOM error, if this is one
    pub fn as_dom(&self) -> Option<&DomError> {
        match self {
            Self::Dom(err) | Self::Html(HtmlError::Dom(err)) => Some(err),
            Self::Html(_) => None,
        }
    }
}

/// Native document operations
pub trait Host: Clone + 'static {
    /// Every element matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, HostError>;

    fn add_class(&self, node: NodeId, class: &str) -> Result<(), HostError>;
    fn remove_class(&self, node: NodeId, class: &str) -> Result<(), HostError>;
    fn toggle_class(&self, node: NodeId, class: &str) -> Result<bool, HostError>;
    fn has_class(&self, node: NodeId, class: &str) -> Result<bool, HostError>;

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, HostError>;
    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), HostError>;
    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), HostError>;

    fn data(&self, node: NodeId, key: &str) -> Result<Option<String>, HostError>;
    fn set_data(&self, node: NodeId, key: &str, value: &str) -> Result<(), HostError>;

    fn text_content(&self, node: NodeId) -> Result<String, HostError>;
    fn set_text_content(&self, node: NodeId, text: &str) -> Result<(), HostError>;

    fn inner_html(&self, node: NodeId) -> Result<String, HostError>;
    fn set_inner_html(&self, node: NodeId, html: &str) -> Result<(), HostError>;

    /// Inline style value, empty when unset
    fn style_property(&self, node: NodeId, property: &str) -> Result<String, HostError>;
    /// Set an inline style value. An empty value removes the property.
    fn set_style_property(&self, node: NodeId, property: &str, value: &str) -> Result<(), HostError>;

    fn create_text(&self, text: &str) -> NodeId;
    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    fn prepend_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    /// Detach `node` from its parent
    fn remove(&self, node: NodeId) -> Result<(), HostError>;

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, HostError>;
    /// Whether `node` matches a parsed selector. Stale ids never match.
    fn matches_selector(&self, node: NodeId, selector: &SelectorList) -> bool;

    fn add_event_listener(
        &self,
        node: NodeId,
        event_type: &str,
        listener: HostListener<Self>,
    ) -> Result<ListenerId, HostError>;
    fn remove_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool;
    /// Dispatch `event` at `target`, returning `false` if its default was prevented
    fn dispatch_event(&self, target: NodeId, event: Event) -> Result<bool, HostError>;
}

impl Host for Document {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, HostError> {
        Ok(Document::query_selector_all(self, selector)?)
    }

    fn add_class(&self, node: NodeId, class: &str) -> Result<(), HostError> {
        Ok(Document::add_class(self, node, class)?)
    }

    fn remove_class(&self, node: NodeId, class: &str) -> Result<(), HostError> {
        Ok(Document::remove_class(self, node, class)?)
    }

    fn toggle_class(&self, node: NodeId, class: &str) -> Result<bool, HostError> {
        Ok(Document::toggle_class(self, node, class)?)
    }

    fn has_class(&self, node: NodeId, class: &str) -> Result<bool, HostError> {
        Ok(Document::has_class(self, node, class)?)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, HostError> {
        Ok(Document::attribute(self, node, name)?)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        Ok(Document::set_attribute(self, node, name, value)?)
    }

    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), HostError> {
        Ok(Document::remove_attribute(self, node, name)?)
    }

    fn data(&self, node: NodeId, key: &str) -> Result<Option<String>, HostError> {
        Ok(Document::data(self, node, key)?)
    }

    fn set_data(&self, node: NodeId, key: &str, value: &str) -> Result<(), HostError> {
        Ok(Document::set_data(self, node, key, value)?)
    }

    fn text_content(&self, node: NodeId) -> Result<String, HostError> {
        Ok(Document::text_content(self, node)?)
    }

    fn set_text_content(&self, node: NodeId, text: &str) -> Result<(), HostError> {
        Ok(Document::set_text_content(self, node, text)?)
    }

    fn inner_html(&self, node: NodeId) -> Result<String, HostError> {
        Ok(fos_html::inner_html(self, node)?)
    }

    fn set_inner_html(&self, node: NodeId, html: &str) -> Result<(), HostError> {
        Ok(fos_html::set_inner_html(self, node, html)?)
    }

    fn style_property(&self, node: NodeId, property: &str) -> Result<String, HostError> {
        Ok(Document::style_property(self, node, property)?)
    }

    fn set_style_property(&self, node: NodeId, property: &str, value: &str) -> Result<(), HostError> {
        Ok(Document::set_style_property(self, node, property, value)?)
    }

    fn create_text(&self, text: &str) -> NodeId {
        Document::create_text(self, text)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        Ok(Document::append_child(self, parent, child)?)
    }

    fn prepend_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        Ok(Document::prepend_child(self, parent, child)?)
    }

    fn remove(&self, node: NodeId) -> Result<(), HostError> {
        Ok(Document::remove(self, node)?)
    }

    fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, HostError> {
        Ok(Document::closest(self, node, selector)?)
    }

    fn matches_selector(&self, node: NodeId, selector: &SelectorList) -> bool {
        Document::matches_selector(self, node, selector)
    }

    fn add_event_listener(
        &self,
        node: NodeId,
        event_type: &str,
        listener: HostListener<Self>,
    ) -> Result<ListenerId, HostError> {
        Ok(Document::add_event_listener(self, node, event_type, listener)?)
    }

    fn remove_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        Document::remove_event_listener(self, node, event_type, id)
    }

    fn dispatch_event(&self, target: NodeId, event: Event) -> Result<bool, HostError> {
        Ok(Document::dispatch_event(self, target, event)?)
    }
}
