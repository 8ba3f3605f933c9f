//! Chainable wrapper
//!
//! Mutating operations make one ordered pass over the selection, one
//! native call per node, and return the wrapper itself. Accessors read the
//! first selected node only.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, Event, ListenerId, NodeId, SelectorList};

use crate::{
    Config, FailurePolicy, Handler, Host, HostError, HostListener, Locator, NodeFailure,
    QueryError, Selection,
};

/// Something to insert with [`Wrapper::append`] or [`Wrapper::prepend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A new text node is created for every selected node
    Text(String),
    /// An existing node. Inserting moves it, so with several selected
    /// nodes the last one ends up holding it.
    Node(NodeId),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

struct Registration {
    node: NodeId,
    event_type: String,
    id: ListenerId,
}

/// Chainable handle over one [`Selection`]
pub struct Wrapper<H: Host = Document> {
    host: H,
    locator: Locator,
    selection: Selection,
    config: Config,
    registrations: RefCell<Vec<Registration>>,
}

impl<H: Host> Wrapper<H> {
    /// Resolve `locator` and wrap the resulting selection
    pub fn new(host: H, locator: Locator, config: Config) -> Result<Self, QueryError> {
        let selection = Selection::resolve(&host, &locator)?;
        Ok(Self {
            host,
            locator,
            selection,
            config,
            registrations: RefCell::new(Vec::new()),
        })
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        self.selection.as_slice()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.selection.first()
    }

    /// Call `f(node, index)` for every selected node in order
    pub fn each(&self, mut f: impl FnMut(NodeId, usize)) -> &Self {
        for (index, node) in self.selection.iter().enumerate() {
            f(node, index);
        }
        self
    }

    // Classes

    pub fn add_class(&self, class: &str) -> Result<&Self, QueryError> {
        self.for_each_node("add_class", |host, node| host.add_class(node, class))
    }

    pub fn remove_class(&self, class: &str) -> Result<&Self, QueryError> {
        self.for_each_node("remove_class", |host, node| host.remove_class(node, class))
    }

    pub fn toggle_class(&self, class: &str) -> Result<&Self, QueryError> {
        self.for_each_node("toggle_class", |host, node| host.toggle_class(node, class).map(|_| ()))
    }

    // Visibility

    /// Clear the inline `display` override
    pub fn show(&self) -> Result<&Self, QueryError> {
        self.for_each_node("show", |host, node| host.set_style_property(node, "display", ""))
    }

    pub fn hide(&self) -> Result<&Self, QueryError> {
        self.for_each_node("hide", |host, node| host.set_style_property(node, "display", "none"))
    }

    /// Hide nodes whose inline `display` is not `none`, show the rest
    pub fn toggle(&self) -> Result<&Self, QueryError> {
        self.for_each_node("toggle", |host, node| {
            let display = if host.style_property(node, "display")? == "none" { "" } else { "none" };
            host.set_style_property(node, "display", display)
        })
    }

    // Attributes, data, content, style

    pub fn set_attr(&self, name: &str, value: &str) -> Result<&Self, QueryError> {
        self.for_each_node("set_attr", |host, node| host.set_attribute(node, name, value))
    }

    pub fn remove_attr(&self, name: &str) -> Result<&Self, QueryError> {
        self.for_each_node("remove_attr", |host, node| host.remove_attribute(node, name))
    }

    /// Set a `data-*` attribute by camelCase key
    pub fn set_data(&self, key: &str, value: &str) -> Result<&Self, QueryError> {
        self.for_each_node("set_data", |host, node| host.set_data(node, key, value))
    }

    pub fn set_text(&self, text: &str) -> Result<&Self, QueryError> {
        self.for_each_node("set_text", |host, node| host.set_text_content(node, text))
    }

    pub fn set_html(&self, html: &str) -> Result<&Self, QueryError> {
        self.for_each_node("set_html", |host, node| host.set_inner_html(node, html))
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_css(&self, property: &str, value: &str) -> Result<&Self, QueryError> {
        self.for_each_node("set_css", |host, node| host.set_style_property(node, property, value))
    }

    // Structure

    /// Insert `content` as the last child of every selected node
    pub fn append(&self, content: impl Into<Content>) -> Result<&Self, QueryError> {
        let content = content.into();
        self.for_each_node("append", |host, node| {
            let child = materialize(host, &content);
            host.append_child(node, child)
        })
    }

    /// Insert `content` as the first child of every selected node
    pub fn prepend(&self, content: impl Into<Content>) -> Result<&Self, QueryError> {
        let content = content.into();
        self.for_each_node("prepend", |host, node| {
            let child = materialize(host, &content);
            host.prepend_child(node, child)
        })
    }

    /// Detach every selected node from its parent. The selection keeps them.
    pub fn remove(&self) -> Result<&Self, QueryError> {
        self.for_each_node("remove", |host, node| host.remove(node))
    }

    // Events

    /// Attach `handler` for `event_type` on every selected node.
    ///
    /// A delegated selector is parsed up front, so a malformed one fails
    /// here with nothing attached.
    pub fn on(&self, event_type: &str, handler: Handler) -> Result<&Self, QueryError> {
        let mode = match &handler {
            Handler::Direct(_) => "direct",
            Handler::Delegated { .. } => "delegated",
        };
        let listener: HostListener<H> = match handler {
            Handler::Direct(callback) => Rc::new(move |_: &H, event: &mut Event| {
                let target = event.target();
                callback(target, event);
            }),
            Handler::Delegated { selector, callback } => {
                let selector = SelectorList::parse(&selector).map_err(HostError::from)?;
                Rc::new(move |host: &H, event: &mut Event| {
                    let target = event.target();
                    if host.matches_selector(target, &selector) {
                        callback(target, event);
                    }
                })
            }
        };

        tracing::debug!(locator = %self.locator, event_type, mode, nodes = self.len(), "attaching listeners");
        self.for_each_node("on", |host, node| {
            let id = host.add_event_listener(node, event_type, Rc::clone(&listener))?;
            self.registrations.borrow_mut().push(Registration {
                node,
                event_type: event_type.to_string(),
                id,
            });
            Ok(())
        })
    }

    /// Remove every listener this wrapper attached for `event_type`
    pub fn off(&self, event_type: &str) -> Result<&Self, QueryError> {
        let removed: Vec<Registration> = {
            let mut registrations = self.registrations.borrow_mut();
            let (removed, kept) = registrations
                .drain(..)
                .partition(|r| r.event_type == event_type);
            *registrations = kept;
            removed
        };
        for registration in &removed {
            self.host
                .remove_event_listener(registration.node, &registration.event_type, registration.id);
        }
        tracing::debug!(locator = %self.locator, event_type, removed = removed.len(), "detached listeners");
        Ok(self)
    }

    /// Dispatch a bubbling, cancelable event at every selected node
    pub fn trigger(&self, event_type: &str) -> Result<&Self, QueryError> {
        self.for_each_node("trigger", |host, node| {
            host.dispatch_event(node, Event::bubbling(event_type)).map(|_| ())
        })
    }

    /// Number of native listeners currently attached through this wrapper
    pub fn listener_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    // Accessors (first node only)

    pub fn attr(&self, name: &str) -> Result<Option<String>, QueryError> {
        Ok(self.host.attribute(self.first_node("attr")?, name)?)
    }

    /// Read a `data-*` attribute by camelCase key
    pub fn data(&self, key: &str) -> Result<Option<String>, QueryError> {
        Ok(self.host.data(self.first_node("data")?, key)?)
    }

    pub fn text(&self) -> Result<String, QueryError> {
        Ok(self.host.text_content(self.first_node("text")?)?)
    }

    pub fn html(&self) -> Result<String, QueryError> {
        Ok(self.host.inner_html(self.first_node("html")?)?)
    }

    /// Inline style value, empty when unset
    pub fn css(&self, property: &str) -> Result<String, QueryError> {
        Ok(self.host.style_property(self.first_node("css")?, property)?)
    }

    pub fn has_class(&self, class: &str) -> Result<bool, QueryError> {
        Ok(self.host.has_class(self.first_node("has_class")?, class)?)
    }

    /// Nearest inclusive ancestor of the first node matching `selector`
    pub fn closest(&self, selector: &str) -> Result<Option<NodeId>, QueryError> {
        Ok(self.host.closest(self.first_node("closest")?, selector)?)
    }

    fn first_node(&self, operation: &'static str) -> Result<NodeId, QueryError> {
        self.selection
            .first()
            .ok_or(QueryError::EmptySelection { operation })
    }

    fn for_each_node(
        &self,
        operation: &'static str,
        mut action: impl FnMut(&H, NodeId) -> Result<(), HostError>,
    ) -> Result<&Self, QueryError> {
        let mut failures = Vec::new();

        for (index, node) in self.selection.iter().enumerate() {
            let Err(error) = action(&self.host, node) else {
                continue;
            };
            let failure = NodeFailure { index, node, error };
            match self.config.failure_policy {
                FailurePolicy::Abort => return Err(QueryError::Aborted { operation, failure }),
                FailurePolicy::Isolate => {
                    tracing::warn!(operation, %node, index, error = %failure.error, "node rejected operation");
                    failures.push(failure);
                }
            }
        }

        if failures.is_empty() {
            Ok(self)
        } else {
            Err(QueryError::Partial { operation, failures })
        }
    }
}

fn materialize<H: Host>(host: &H, content: &Content) -> NodeId {
    match content {
        Content::Text(text) => host.create_text(text),
        Content::Node(node) => *node,
    }
}

impl<H: Host> fmt::Debug for Wrapper<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("locator", &self.locator)
            .field("selection", &self.selection)
            .field("config", &self.config)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
