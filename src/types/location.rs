//! Namespaced resource identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that prefixes model-local texture variables (e.g. `#side`).
pub const LOCAL_MARKER: char = '#';

/// A namespaced resource identifier such as `minecraft:block/stone`.
///
/// Identifiers without a namespace default to `minecraft`, so `block/stone`
/// and `minecraft:block/stone` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";

    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parse a resource location string.
    /// "mod:block/bricks" -> ("mod", "block/bricks")
    /// "block/bricks" -> ("minecraft", "block/bricks")
    pub fn parse(location: &str) -> Self {
        let (namespace, path) = split_location(location);
        Self::new(namespace, path)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this names a model-local texture variable rather than a real resource.
    pub fn is_local_reference(&self) -> bool {
        self.path.starts_with(LOCAL_MARKER)
    }

    /// The variable name of a local reference (`#side` -> `side`).
    pub fn local_name(&self) -> Option<&str> {
        self.path.strip_prefix(LOCAL_MARKER)
    }
}

/// Split a resource location into namespace and path, defaulting the namespace.
pub(crate) fn split_location(location: &str) -> (&str, &str) {
    if let Some((namespace, path)) = location.split_once(':') {
        (namespace, path)
    } else {
        (ResourceLocation::DEFAULT_NAMESPACE, location)
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl From<&str> for ResourceLocation {
    fn from(location: &str) -> Self {
        Self::parse(location)
    }
}

impl From<String> for ResourceLocation {
    fn from(location: String) -> Self {
        Self::parse(&location)
    }
}

impl From<ResourceLocation> for String {
    fn from(location: ResourceLocation) -> Self {
        location.to_string()
    }
}
