//! Immutable two-level storage for scripted return values.

use std::collections::HashMap;

use crate::error::ConfigurationError;

/// Configuration input: component name → method name → ordered values.
pub type PlaybackScript<V> = HashMap<String, HashMap<String, Vec<V>>>;

// ---------------------------------------------------------------------------
// ValueSequenceTable
// ---------------------------------------------------------------------------

/// Holds the scripted value sequences supplied at harness construction.
///
/// The table is immutable once built; consumption position lives in
/// [`SequenceCursor`](crate::cursor::SequenceCursor)s owned by the
/// dispatchers, never here. Lookups never mutate.
#[derive(Debug)]
pub struct ValueSequenceTable<V> {
    entries: PlaybackScript<V>,
}

impl<V> ValueSequenceTable<V> {
    /// Build a table from a two-level script, validating every key.
    ///
    /// Fails with a [`ConfigurationError`] if any component or method name
    /// is not identifier-like (see [`is_identifier_like`]). Value sequence
    /// order is preserved as supplied; sequences may be empty.
    pub fn new(script: PlaybackScript<V>) -> Result<Self, ConfigurationError> {
        for (component, methods) in &script {
            if !is_identifier_like(component) {
                return Err(ConfigurationError::InvalidComponentName(component.clone()));
            }
            for method in methods.keys() {
                if !is_identifier_like(method) {
                    return Err(ConfigurationError::InvalidMethodName {
                        component: component.clone(),
                        method: method.clone(),
                    });
                }
            }
        }
        Ok(Self { entries: script })
    }

    /// The configured sequence for `(component, method)`, if any.
    #[must_use]
    pub fn lookup(&self, component: &str, method: &str) -> Option<&[V]> {
        self.entries
            .get(component)
            .and_then(|methods| methods.get(method))
            .map(Vec::as_slice)
    }

    /// Component names appearing in the script, in arbitrary order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of configured components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for ValueSequenceTable<V> {
    /// An empty table; every lookup misses.
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

/// Whether `name` is acceptable as a component or method key: non-empty,
/// starting with a letter or `_`, remaining characters alphanumeric,
/// `_` or `-`.
#[must_use]
pub fn is_identifier_like(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
