//! Memoizing wrapper registry
//!
//! One wrapper per distinct locator for the registry's lifetime. A cached
//! wrapper is returned as-is, without re-resolving its selection, even if
//! the document changed since it was built. Entries are only dropped by
//! [`Registry::clear`] or by dropping the registry.

use std::collections::HashMap;
use std::rc::Rc;

use fos_dom::Document;

use crate::{Config, Host, Locator, QueryError, Wrapper};

/// Locator to wrapper cache bound to one host document
pub struct Registry<H: Host = Document> {
    host: H,
    config: Config,
    entries: HashMap<Locator, Rc<Wrapper<H>>>,
    resolutions: usize,
}

impl<H: Host> Registry<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config(host: H, config: Config) -> Self {
        Self {
            host,
            config,
            entries: HashMap::new(),
            resolutions: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrapper for `locator`, resolving its selection on first use only.
    ///
    /// A locator that fails to resolve is not cached.
    pub fn acquire(&mut self, locator: impl Into<Locator>) -> Result<Rc<Wrapper<H>>, QueryError> {
        let locator = locator.into();
        if let Some(wrapper) = self.entries.get(&locator) {
            tracing::debug!(%locator, "registry hit");
            return Ok(Rc::clone(wrapper));
        }

        tracing::debug!(%locator, "registry miss");
        let wrapper = Rc::new(Wrapper::new(self.host.clone(), locator.clone(), self.config.clone())?);
        self.resolutions += 1;
        self.entries.insert(locator, Rc::clone(&wrapper));
        Ok(wrapper)
    }

    pub fn contains(&self, locator: &Locator) -> bool {
        self.entries.contains_key(locator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selections resolved over the registry's lifetime
    pub fn resolutions(&self) -> usize {
        self.resolutions
    }

    /// Forget every cached wrapper. Handles already given out stay valid,
    /// and listeners they attached stay attached.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.entries.len(), "clearing registry");
        self.entries.clear();
    }
}

impl<H: Host> std::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .field("resolutions", &self.resolutions)
            .finish()
    }
}
