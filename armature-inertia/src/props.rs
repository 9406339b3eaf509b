//! Page props and deferred prop resolution

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

type Producer = dyn Fn() -> Result<Value> + Send + Sync;

/// A prop whose value is computed only when it is included in a response.
#[derive(Clone)]
pub struct DeferredProp {
    producer: Arc<Producer>,
}

impl DeferredProp {
    pub fn new<F, T>(producer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        Self {
            producer: Arc::new(move || -> Result<Value> {
                Ok(serde_json::to_value(producer())?)
            }),
        }
    }

    /// Invoke the producer.
    pub fn resolve(&self) -> Result<Value> {
        (self.producer)()
    }
}

impl fmt::Debug for DeferredProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredProp(..)")
    }
}

/// A single page prop: either a concrete JSON value or a deferred producer.
#[derive(Debug, Clone)]
pub enum PropValue {
    Value(Value),
    Deferred(DeferredProp),
}

impl PropValue {
    /// Serialize a concrete value.
    pub fn value<T: Serialize>(value: T) -> Result<Self> {
        Ok(PropValue::Value(serde_json::to_value(value)?))
    }

    /// Wrap a producer that runs only if the prop is selected.
    pub fn lazy<F, T>(producer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        PropValue::Deferred(DeferredProp::new(producer))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, PropValue::Deferred(_))
    }

    /// Resolve to a JSON value, invoking the producer of a deferred prop.
    pub fn resolve(self) -> Result<Value> {
        match self {
            PropValue::Value(value) => Ok(value),
            PropValue::Deferred(deferred) => deferred.resolve(),
        }
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        PropValue::Value(value)
    }
}

impl From<DeferredProp> for PropValue {
    fn from(deferred: DeferredProp) -> Self {
        PropValue::Deferred(deferred)
    }
}

/// Ordered collection of page props.
///
/// Inserting a key that already exists replaces its value but keeps the
/// position where the key was first inserted.
#[derive(Debug, Clone, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a concrete prop, serializing it immediately.
    pub fn with<T: Serialize>(mut self, key: impl Into<String>, value: T) -> Result<Self> {
        self.insert(key, PropValue::value(value)?);
        Ok(self)
    }

    /// Add a deferred prop.
    pub fn with_lazy<F, T>(mut self, key: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        self.insert(key, PropValue::lazy(producer));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert every entry of `other`, overriding keys already present.
    pub fn merge(&mut self, other: Props) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every prop, in insertion order.
    pub fn resolve_all(self) -> Result<Map<String, Value>> {
        let mut resolved = Map::with_capacity(self.entries.len());
        for (key, value) in self.entries {
            resolved.insert(key, value.resolve()?);
        }
        Ok(resolved)
    }

    /// Resolve only the listed keys; every other prop is dropped unresolved.
    pub fn resolve_only(self, only: &[String]) -> Result<Map<String, Value>> {
        let mut resolved = Map::new();
        for (key, value) in self.entries {
            if only.iter().any(|wanted| *wanted == key) {
                resolved.insert(key, value.resolve()?);
            }
        }
        Ok(resolved)
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<PropValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
