//! The application-supplied map/reduce pair and the registry that resolves
//! a transform identifier to one.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{MapReduceError, Result, TransformError};
use crate::kv_store::KeyValue;

pub type MapFn = fn(&str, &str) -> Vec<KeyValue>;
pub type ReduceFn = fn(&str, &[String]) -> String;

/// A map/reduce pair. Both functions must be pure: the engine calls `map`
/// once per input and `reduce` once per distinct key, and never retries.
pub trait Transform {
    /// `name` identifies the input unit, `contents` is its full text.
    fn map(&self, name: &str, contents: &str) -> std::result::Result<Vec<KeyValue>, TransformError>;

    /// `values` holds every value emitted for `key`, in no guaranteed order.
    fn reduce(&self, key: &str, values: &[String]) -> std::result::Result<String, TransformError>;
}

impl<T: Transform + ?Sized> Transform for Arc<T> {
    fn map(&self, name: &str, contents: &str) -> std::result::Result<Vec<KeyValue>, TransformError> {
        (**self).map(name, contents)
    }

    fn reduce(&self, key: &str, values: &[String]) -> std::result::Result<String, TransformError> {
        (**self).reduce(key, values)
    }
}

impl<T: Transform + ?Sized> Transform for &T {
    fn map(&self, name: &str, contents: &str) -> std::result::Result<Vec<KeyValue>, TransformError> {
        (**self).map(name, contents)
    }

    fn reduce(&self, key: &str, values: &[String]) -> std::result::Result<String, TransformError> {
        (**self).reduce(key, values)
    }
}

/// Infallible transform built from two plain functions.
#[derive(Clone, Copy)]
pub struct FnTransform {
    map_fn: MapFn,
    reduce_fn: ReduceFn,
}

impl FnTransform {
    pub fn new(map_fn: MapFn, reduce_fn: ReduceFn) -> Self {
        FnTransform { map_fn, reduce_fn }
    }
}

impl Transform for FnTransform {
    fn map(&self, name: &str, contents: &str) -> std::result::Result<Vec<KeyValue>, TransformError> {
        Ok((self.map_fn)(name, contents))
    }

    fn reduce(&self, key: &str, values: &[String]) -> std::result::Result<String, TransformError> {
        Ok((self.reduce_fn)(key, values))
    }
}

#[derive(Default)]
pub struct TransformRegistry {
    entries: BTreeMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        TransformRegistry::default()
    }

    /// Registers `transform` under every name in `names`. Later
    /// registrations replace earlier ones with the same name.
    pub fn register<T>(&mut self, names: &[&str], transform: T) -> &mut Self
    where
        T: Transform + 'static,
    {
        let shared: Arc<dyn Transform> = Arc::new(transform);
        for name in names {
            self.entries.insert(name.to_string(), Arc::clone(&shared));
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Accepts a bare name (`wc`) or a plugin-style path (`../mrapps/wc.so`).
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn Transform>> {
        let name = normalize_identifier(identifier);
        self.entries.get(name).cloned().ok_or_else(|| {
            let known: Vec<&str> = self.names().collect();
            MapReduceError::Configuration(format!(
                "cannot load transform {identifier:?}: no map/reduce pair registered as {name:?} (known: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }
}

fn normalize_identifier(identifier: &str) -> &str {
    Path::new(identifier)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(identifier)
}
