//! Mapping view over an [`Environment`] that hides reserved keys.
//!
//! Hidden keys never show up through the view. Reads and writes that name
//! one fail with [`EnvError::ProtectedKey`]; containment checks, iteration
//! and the display form skip them silently. The only exceptions are
//! [`ProtectedEnv::get_or`] and [`ProtectedEnv::pop_or`], which answer with
//! the caller's default as if the key were absent.

use core::fmt;

use tracing::trace;

use super::{EnvError, Environment, is_hidden, write_entries};
use crate::values::Value;

pub struct ProtectedEnv<'a> {
    env: &'a mut Environment,
}

impl<'a> ProtectedEnv<'a> {
    pub fn new(env: &'a mut Environment) -> Self {
        Self { env }
    }

    fn check(key: &str) -> Result<(), EnvError> {
        if is_hidden(key) {
            return Err(EnvError::protected(key));
        }
        Ok(())
    }

    /// Number of visible entries.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn get(&self, key: &str) -> Result<&Value, EnvError> {
        Self::check(key)?;
        self.env.get(key).ok_or_else(|| EnvError::missing(key))
    }

    /// Value of `key`, or `default` when it is absent or hidden.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        match self.get(key) {
            Ok(value) => value.clone(),
            Err(_) => default,
        }
    }

    /// Bind `key`, returning its previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, EnvError> {
        let key = key.into();
        Self::check(&key)?;
        Ok(self.env.insert(key, value))
    }

    pub fn remove(&mut self, key: &str) -> Result<Value, EnvError> {
        Self::check(key)?;
        self.env.remove(key).ok_or_else(|| EnvError::missing(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        !is_hidden(key) && self.env.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.env.keys().filter(|k| !is_hidden(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.env.iter().filter(|(k, _)| !is_hidden(k))
    }

    /// Remove every visible entry. Hidden entries stay in place.
    pub fn clear(&mut self) {
        let visible: Vec<String> = self.keys().map(str::to_string).collect();
        for key in visible {
            self.env.remove(&key);
        }
    }

    pub fn pop(&mut self, key: &str) -> Result<Value, EnvError> {
        self.remove(key)
    }

    /// Remove `key` and return its value, or `default` when it is absent or
    /// hidden. Hidden entries are left untouched.
    pub fn pop_or(&mut self, key: &str, default: Value) -> Value {
        if is_hidden(key) {
            return default;
        }
        self.env.remove(key).unwrap_or(default)
    }

    /// Remove and return the most recently inserted visible entry.
    ///
    /// Hidden entries inserted after it are taken off the tail and put back
    /// in their original order, so the backing store only loses the entry
    /// that is returned.
    pub fn pop_last(&mut self) -> Result<(String, Value), EnvError> {
        let mut hidden = Vec::new();

        let found = loop {
            match self.env.pop_last() {
                Some((key, value)) if is_hidden(&key) => hidden.push((key, value)),
                other => break other,
            }
        };

        if !hidden.is_empty() {
            trace!(count = hidden.len(), "restoring hidden entries");
        }
        for (key, value) in hidden.into_iter().rev() {
            self.env.insert(key, value);
        }

        found.ok_or(EnvError::Empty)
    }

    /// Value of `key`, inserting `default` first if the key is absent.
    pub fn set_default(&mut self, key: &str, default: Value) -> Result<&Value, EnvError> {
        Self::check(key)?;
        if !self.env.contains_key(key) {
            self.env.insert(key, default);
        }
        self.env.get(key).ok_or_else(|| EnvError::missing(key))
    }

    /// Insert every entry of `entries` whose key is visible. Hidden keys are
    /// dropped without error.
    pub fn update<K: Into<String>>(&mut self, entries: impl IntoIterator<Item = (K, Value)>) {
        for (key, value) in entries {
            let key = key.into();
            if !is_hidden(&key) {
                self.env.insert(key, value);
            }
        }
    }
}

impl fmt::Display for ProtectedEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProtectedEnv(")?;
        write_entries(f, self.iter())?;
        write!(f, ")")
    }
}

impl fmt::Debug for ProtectedEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
