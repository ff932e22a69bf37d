//! Namespaced item keys.
//!
//! A [`Key`] names an item or block as `namespace:identifier`. The namespace
//! is one of the aliases a provider group registered; the identifier is free
//! text owned by that provider.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator between namespace and identifier in the combined form.
pub const SEPARATOR: char = ':';

/// Namespace used when a combined string carries no namespace.
pub const VANILLA_NAMESPACE: &str = "minecraft";

/// An immutable `(namespace, identifier)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    namespace: String,
    identifier: String,
}

impl Key {
    /// Build a key. Fails if `namespace` contains the separator.
    pub fn new(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let namespace = namespace.into();
        if namespace.contains(SEPARATOR) {
            return Err(KeyError::NamespaceContainsSeparator(namespace));
        }
        Ok(Self {
            namespace,
            identifier: identifier.into(),
        })
    }

    /// A key in the vanilla namespace.
    pub fn vanilla(identifier: impl Into<String>) -> Self {
        Self {
            namespace: VANILLA_NAMESPACE.to_string(),
            identifier: identifier.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.namespace, self.identifier)
    }
}

/// Split a combined string on its first separator.
///
/// Returns `(None, s)` when there is no separator.
pub fn split_combined(s: &str) -> (Option<&str>, &str) {
    match s.split_once(SEPARATOR) {
        Some((namespace, identifier)) => (Some(namespace), identifier),
        None => (None, s),
    }
}

impl FromStr for Key {
    type Err = KeyError;

    /// Parses `namespace:identifier`. A bare identifier lands in the vanilla
    /// namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_combined(s) {
            (Some(namespace), identifier) => Key::new(namespace, identifier),
            (None, identifier) => Ok(Key::vanilla(identifier)),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("namespace cannot contain ':': '{0}'")]
    NamespaceContainsSeparator(String),
}
