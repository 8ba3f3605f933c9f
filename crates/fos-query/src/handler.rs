//! Event handlers

use std::fmt;
use std::rc::Rc;

use fos_dom::{Event, NodeId};

/// Caller event callback. The node argument is the event's original
/// target; for delegated handlers it is the node that matched.
pub type Callback = Rc<dyn Fn(NodeId, &mut Event)>;

/// How [`Wrapper::on`](crate::Wrapper::on) attaches a callback
#[derive(Clone)]
pub enum Handler {
    /// Fire for every event reaching a selected node
    Direct(Callback),
    /// Fire only when the event's original target matches `selector`
    Delegated { selector: String, callback: Callback },
}

impl Handler {
    pub fn direct(callback: impl Fn(NodeId, &mut Event) + 'static) -> Self {
        Self::Direct(Rc::new(callback))
    }

    pub fn delegated(selector: impl Into<String>, callback: impl Fn(NodeId, &mut Event) + 'static) -> Self {
        Self::Delegated {
            selector: selector.into(),
            callback: Rc::new(callback),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Direct"),
            Self::Delegated { selector, .. } => f.debug_struct("Delegated").field("selector", selector).finish(),
        }
    }
}
