//! Persistent name-to-value storage shared by every submission.
//!
//! [`Environment`] is the raw, insertion-ordered store owned by the host.
//! Code that must not see interpreter internals goes through
//! [`ProtectedEnv`], which hides every key matched by [`is_hidden`].

mod error;
mod protected;

#[cfg(test)]
mod protected_test;

pub use error::EnvError;
pub use protected::ProtectedEnv;

use core::fmt;

use hashbrown::HashMap;

use crate::values::{Value, escape_string};

/// Marker that opens and closes hidden key names.
pub const HIDDEN_MARKER: &str = "__";

/// A key is hidden when it starts and ends with [`HIDDEN_MARKER`] and the two
/// markers do not overlap.
pub fn is_hidden(key: &str) -> bool {
    key.len() >= 2 * HIDDEN_MARKER.len()
        && key.starts_with(HIDDEN_MARKER)
        && key.ends_with(HIDDEN_MARKER)
}

/// Insertion-ordered mapping from names to values.
///
/// Entries live in a vector in insertion order; `index` maps each name to its
/// position. Replacing the value of an existing name keeps its position.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Bind `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(core::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for (name, _) in &self.entries[position..] {
            if let Some(i) = self.index.get_mut(name.as_str()) {
                *i -= 1;
            }
        }
        Some(value)
    }

    /// Remove and return the most recently inserted entry.
    pub fn pop_last(&mut self) -> Option<(String, Value)> {
        let (key, value) = self.entries.pop()?;
        self.index.remove(&key);
        Some((key, value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut env = Environment::new();
        env.extend(iter);
        env
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Environment {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Value); N]> for Environment {
    fn from(entries: [(K, Value); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Every entry, hidden ones included.
impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entries(f, self.iter())
    }
}

pub(crate) fn write_entries<'a>(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a str, &'a Value)>,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        escape_string(f, key)?;
        write!(f, ": {}", value)?;
    }
    write!(f, "}}")
}
