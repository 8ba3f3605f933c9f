//! fOS Query
//!
//! A chainable handle over a fixed selection of document nodes.
//!
//! A [`Registry`] resolves a [`Locator`] (a selector string or a node) once
//! into a [`Selection`] and memoizes the resulting [`Wrapper`]; acquiring
//! the same locator again returns the same wrapper without re-querying.
//! Mutating wrapper operations apply one native primitive per selected
//! node and return the wrapper for chaining. [`Handler::Delegated`]
//! listeners react to events from descendants matched at fire time.
//!
//! ```
//! use fos_query::{Document, Registry};
//!
//! let doc = Document::new("about:blank");
//! let body = doc.body().unwrap();
//! for _ in 0..3 {
//!     let item = doc.create_element("li");
//!     doc.add_class(item, "item").unwrap();
//!     doc.append_child(body, item).unwrap();
//! }
//!
//! let mut registry = Registry::new(doc.clone());
//! let items = registry.acquire(".item").unwrap();
//! items.add_class("active").unwrap().hide().unwrap();
//! assert!(items.has_class("active").unwrap());
//!
//! let same = registry.acquire(".item").unwrap();
//! assert!(std::rc::Rc::ptr_eq(&items, &same));
//! ```

mod config;
mod error;
mod handler;
mod host;
mod locator;
mod registry;
mod selection;
mod wrapper;

pub use config::{Config, FailurePolicy};
pub use error::{NodeFailure, QueryError};
pub use handler::{Callback, Handler};
pub use host::{Host, HostError, HostListener};
pub use locator::Locator;
pub use registry::Registry;
pub use selection::Selection;
pub use wrapper::{Content, Wrapper};

pub use fos_dom::{Document, Event, NodeId};
