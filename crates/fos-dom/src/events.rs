//! DOM Events
//!
//! Event objects and per-node listener storage. Dispatch itself lives on
//! [`Document`](crate::Document) because listeners receive the document.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Native event listener
pub type Listener = Rc<dyn Fn(&Document, &mut Event)>;

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    AtTarget,
    Bubbling,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    target: NodeId,
    current_target: NodeId,
    bubbles: bool,
    cancelable: bool,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create a non-bubbling, non-cancelable event
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            bubbles: false,
            cancelable: false,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Create a bubbling, cancelable event such as `click`
    pub fn bubbling(event_type: impl Into<String>) -> Self {
        Self::new(event_type).with_bubbles(true).with_cancelable(true)
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Node the event was dispatched to
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation to further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining listeners on this node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub(crate) fn begin(&mut self, target: NodeId) {
        self.target = target;
        self.current_target = target;
        self.phase = EventPhase::AtTarget;
    }

    pub(crate) fn enter(&mut self, node: NodeId) {
        self.current_target = node;
        self.phase = if node == self.target {
            EventPhase::AtTarget
        } else {
            EventPhase::Bubbling
        };
    }

    pub(crate) fn finish(&mut self) {
        self.current_target = NodeId::NONE;
        self.phase = EventPhase::None;
    }
}

/// Listeners keyed by node, then event type, in registration order
#[derive(Default)]
pub struct EventListenerRegistry {
    listeners: HashMap<NodeId, HashMap<String, Vec<(ListenerId, Listener)>>>,
    next_id: u64,
}

impl EventListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&mut self, node: NodeId, event_type: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(node)
            .or_default()
            .entry(event_type.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    /// Unregister a listener, returning whether it was registered
    pub fn remove(&mut self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        let Some(by_type) = self.listeners.get_mut(&node) else {
            return false;
        };
        let Some(list) = by_type.get_mut(event_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            by_type.remove(event_type);
        }
        if by_type.is_empty() {
            self.listeners.remove(&node);
        }
        removed
    }

    pub fn contains(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        self.listeners
            .get(&node)
            .and_then(|by_type| by_type.get(event_type))
            .is_some_and(|list| list.iter().any(|(lid, _)| *lid == id))
    }

    /// Copy of the listeners for `node`/`event_type` at this moment
    pub fn snapshot(&self, node: NodeId, event_type: &str) -> Vec<(ListenerId, Listener)> {
        self.listeners
            .get(&node)
            .and_then(|by_type| by_type.get(event_type))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of listeners for `node`/`event_type`
    pub fn count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&node)
            .and_then(|by_type| by_type.get(event_type))
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self
            .listeners
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum();
        f.debug_struct("EventListenerRegistry")
            .field("nodes", &self.listeners.len())
            .field("listeners", &total)
            .finish()
    }
}
