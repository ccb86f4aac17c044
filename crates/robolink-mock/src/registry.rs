//! Construction of a full mock harness from one playback script.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::cursor::ExhaustionPolicy;
use crate::dispatcher::MockDispatcher;
use crate::error::ConfigurationError;
use crate::table::{PlaybackScript, ValueSequenceTable};

// ---------------------------------------------------------------------------
// HarnessRegistry
// ---------------------------------------------------------------------------

/// All dispatchers of one mock harness, built from a single script.
///
/// The registry shares one validated [`ValueSequenceTable`] across every
/// dispatcher, so a fixture is checked once and replayed from one place.
/// Dispatchers exist for the union of the components named in the script
/// and the components the harness declares up front; a declared component
/// with no scripted entries simply resolves every call to its default.
#[derive(Debug)]
pub struct HarnessRegistry<V> {
    dispatchers: HashMap<String, Arc<MockDispatcher<V>>>,
}

impl<V: Clone> HarnessRegistry<V> {
    /// Build dispatchers for `declared` components plus every component
    /// the script mentions, all under the same exhaustion `policy`.
    ///
    /// Fails with a [`ConfigurationError`] when the script carries an
    /// invalid component or method name.
    pub fn build(
        script: PlaybackScript<V>,
        declared: &[&str],
        policy: ExhaustionPolicy,
    ) -> Result<Self, ConfigurationError> {
        let table = Arc::new(ValueSequenceTable::new(script)?);

        let mut names: Vec<String> = declared.iter().map(ToString::to_string).collect();
        for component in table.components() {
            if !names.iter().any(|n| n == component) {
                names.push(component.to_string());
            }
        }

        let mut dispatchers = HashMap::with_capacity(names.len());
        for name in names {
            debug!("mock dispatcher ready: {name}");
            let dispatcher = MockDispatcher::new(name.clone(), Arc::clone(&table), policy);
            dispatchers.insert(name, Arc::new(dispatcher));
        }
        Ok(Self { dispatchers })
    }

    /// The dispatcher for `component`, if one was built.
    #[must_use]
    pub fn dispatcher(&self, component: &str) -> Option<Arc<MockDispatcher<V>>> {
        self.dispatchers.get(component).map(Arc::clone)
    }

    /// Component names with a dispatcher, in arbitrary order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.dispatchers.keys().map(String::as_str)
    }

    /// Number of dispatchers in the harness.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dispatchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dispatchers.is_empty()
    }

    /// Rewind every cursor in every dispatcher.
    pub fn reset(&self) {
        for dispatcher in self.dispatchers.values() {
            dispatcher.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn script(entries: &[(&str, &str, &[i32])]) -> PlaybackScript<i32> {
        let mut script: PlaybackScript<i32> = HashMap::new();
        for (component, method, values) in entries {
            script
                .entry((*component).to_string())
                .or_default()
                .insert((*method).to_string(), values.to_vec());
        }
        script
    }

    #[test]
    fn builds_dispatchers_for_declared_and_scripted_components() {
        let registry = HarnessRegistry::build(
            script(&[("arm", "state", &[1, 2])]),
            &["arm", "vacuum"],
            ExhaustionPolicy::Signal,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.dispatcher("arm").is_some());
        assert!(registry.dispatcher("vacuum").is_some());
        assert!(registry.dispatcher("camera").is_none());
    }

    #[test]
    fn scripted_component_not_declared_still_gets_dispatcher() {
        let registry = HarnessRegistry::build(
            script(&[("surprise", "state", &[9])]),
            &["arm"],
            ExhaustionPolicy::Signal,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        let dispatcher = registry.dispatcher("surprise").unwrap();
        assert_eq!(dispatcher.resolve("state", 0).unwrap(), 9);
    }

    #[test]
    fn empty_script_declared_only() {
        let registry: HarnessRegistry<i32> =
            HarnessRegistry::build(HashMap::new(), &["arm"], ExhaustionPolicy::Signal).unwrap();
        let dispatcher = registry.dispatcher("arm").unwrap();
        // everything falls through to defaults
        assert_eq!(dispatcher.resolve("state", 7).unwrap(), 7);
        assert_eq!(dispatcher.resolve("state", 7).unwrap(), 7);
    }

    #[test]
    fn invalid_script_fails_build() {
        let err = HarnessRegistry::build(
            script(&[("not a name", "state", &[1])]),
            &[],
            ExhaustionPolicy::Signal,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidComponentName(_)));
    }

    #[test]
    fn dispatchers_share_one_table_but_not_cursors() {
        let registry = HarnessRegistry::build(
            script(&[("arm", "state", &[1, 2]), ("vacuum", "state", &[5])]),
            &[],
            ExhaustionPolicy::Signal,
        )
        .unwrap();
        let arm = registry.dispatcher("arm").unwrap();
        let vacuum = registry.dispatcher("vacuum").unwrap();

        assert_eq!(arm.resolve("state", 0).unwrap(), 1);
        assert_eq!(arm.resolve("state", 0).unwrap(), 2);
        assert_eq!(vacuum.consumed("state"), 0);
        assert_eq!(vacuum.resolve("state", 0).unwrap(), 5);
    }

    #[test]
    fn reset_rewinds_every_dispatcher() {
        let registry = HarnessRegistry::build(
            script(&[("arm", "state", &[1]), ("vacuum", "state", &[5])]),
            &[],
            ExhaustionPolicy::Signal,
        )
        .unwrap();
        let arm = registry.dispatcher("arm").unwrap();
        let vacuum = registry.dispatcher("vacuum").unwrap();
        arm.resolve("state", 0).unwrap();
        vacuum.resolve("state", 0).unwrap();

        registry.reset();
        assert_eq!(arm.resolve("state", 0).unwrap(), 1);
        assert_eq!(vacuum.resolve("state", 0).unwrap(), 5);
    }

    #[test]
    fn components_lists_all() {
        let registry: HarnessRegistry<i32> =
            HarnessRegistry::build(HashMap::new(), &["a", "b"], ExhaustionPolicy::Signal).unwrap();
        let mut names: Vec<&str> = registry.components().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_declared_names_collapse() {
        let registry: HarnessRegistry<i32> =
            HarnessRegistry::build(HashMap::new(), &["arm", "arm"], ExhaustionPolicy::Signal)
                .unwrap();
        assert_eq!(registry.len(), 1);
    }
}
