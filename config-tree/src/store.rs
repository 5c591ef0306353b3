//! Key-path queries over a configuration tree.
//!
//! Consumers address configuration by path segments (`["service", "upnp",
//! "listen-on"]`) and never see the backing representation. [`ScopedStore`]
//! narrows a store to a base level so feature code can use short relative
//! paths.

use crate::tree::ConfigNode;

/// Read-only access to configuration values by key path.
pub trait ConfigStore {
    /// Return true if a node exists at `path`. An empty path always exists.
    fn exists(&self, path: &[&str]) -> bool;

    /// Return the value of a single-valued leaf.
    fn return_value(&self, path: &[&str]) -> Option<String>;

    /// Return every value of a multi-valued leaf in stored order.
    fn return_values(&self, path: &[&str]) -> Vec<String>;
}

impl ConfigStore for ConfigNode {
    fn exists(&self, path: &[&str]) -> bool {
        self.get_path(path).is_some()
    }

    fn return_value(&self, path: &[&str]) -> Option<String> {
        self.get_text(path).map(ToOwned::to_owned)
    }

    fn return_values(&self, path: &[&str]) -> Vec<String> {
        self.get_texts(path)
            .into_iter()
            .map(ToOwned::to_owned)
            .collect()
    }
}

/// A view of another store rooted at a fixed level.
#[derive(Debug, Clone)]
pub struct ScopedStore<'a, S: ConfigStore + ?Sized> {
    inner: &'a S,
    level: Vec<String>,
}

impl<'a, S: ConfigStore + ?Sized> ScopedStore<'a, S> {
    /// Scope `inner` to `level`. Paths passed to the view are appended to it.
    pub fn new(inner: &'a S, level: &[&str]) -> Self {
        Self {
            inner,
            level: level.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// The base level this view is rooted at.
    pub fn level(&self) -> Vec<&str> {
        self.level.iter().map(String::as_str).collect()
    }

    fn full_path<'p>(&'p self, path: &[&'p str]) -> Vec<&'p str> {
        let mut full = self.level();
        full.extend_from_slice(path);
        full
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for ScopedStore<'_, S> {
    fn exists(&self, path: &[&str]) -> bool {
        self.inner.exists(&self.full_path(path))
    }

    fn return_value(&self, path: &[&str]) -> Option<String> {
        self.inner.return_value(&self.full_path(path))
    }

    fn return_values(&self, path: &[&str]) -> Vec<String> {
        self.inner.return_values(&self.full_path(path))
    }
}
