//! Method Table
//!
//! Read-only mapping from method name (`flickr.photos.search`) to its
//! descriptor. The table is data supplied from outside; nothing here
//! validates it beyond deserialization.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::{FlickrError, Result};
use crate::methods::MethodDescriptor;

// == Method Table ==
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: BTreeMap<String, MethodDescriptor>,
}

impl MethodTable {
    pub fn new(methods: BTreeMap<String, MethodDescriptor>) -> Self {
        Self { methods }
    }

    /// Parses a JSON object keyed by method name.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let methods: BTreeMap<String, MethodDescriptor> = serde_json::from_str(json)?;
        debug!(methods = methods.len(), "loaded method table");
        Ok(Self { methods })
    }

    /// Reads and parses a JSON method table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    /// Like `get`, failing with `UnknownMethod`.
    pub fn require(&self, name: &str) -> Result<&MethodDescriptor> {
        self.get(name)
            .ok_or_else(|| FlickrError::UnknownMethod(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// All method names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Every method below the dotted namespace `prefix`.
    pub fn children<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + 'a {
        let prefix = format!("{}.", prefix);
        self.methods
            .range(prefix.clone()..)
            .map(|(name, _)| name.as_str())
            .take_while(move |name| name.starts_with(&prefix))
    }

    /// Direct sub-namespaces and methods of `prefix`, one segment deep, sorted
    /// and without repeats.
    ///
    /// `child_nodes("flickr.photos")` yields `comments`, `search`, ...
    pub fn child_nodes(&self, prefix: &str) -> Vec<String> {
        let offset = prefix.len() + 1;
        let nodes: BTreeSet<&str> = self
            .children(prefix)
            .filter_map(|name| name[offset..].split('.').next())
            .collect();
        nodes.into_iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
