//! Per-component resolution of scripted or default return values.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cursor::{ExhaustionPolicy, SequenceCursor};
use crate::error::PlaybackExhaustedError;
use crate::table::ValueSequenceTable;

// ---------------------------------------------------------------------------
// MockDispatcher
// ---------------------------------------------------------------------------

/// The callable surface for one mocked component.
///
/// Test doubles invoke [`resolve`](Self::resolve) in place of the real
/// device call. Methods with a scripted sequence replay it one value per
/// call; everything else returns the caller-supplied default on every
/// call. Cursor state is the only mutable state and is guarded by a
/// mutex so concurrent callers cannot corrupt the increment.
#[derive(Debug)]
pub struct MockDispatcher<V> {
    component: String,
    table: Arc<ValueSequenceTable<V>>,
    policy: ExhaustionPolicy,
    cursors: Mutex<HashMap<String, SequenceCursor>>,
}

impl<V: Clone> MockDispatcher<V> {
    /// Create a dispatcher for `component` over a shared table.
    ///
    /// Cursors are created lazily, one per configured method, each under
    /// `policy`. Two dispatchers never share cursors even when their
    /// components script the same method names.
    #[must_use]
    pub fn new(
        component: impl Into<String>,
        table: Arc<ValueSequenceTable<V>>,
        policy: ExhaustionPolicy,
    ) -> Self {
        Self {
            component: component.into(),
            table,
            policy,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    /// The component this dispatcher stands in for.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Resolve one call against `method`.
    ///
    /// Returns the next scripted value when the method is configured, or
    /// `default` when it is not (no cursor is created in that case). When
    /// a [`ExhaustionPolicy::Signal`] cursor runs out, fails with a
    /// [`PlaybackExhaustedError`] naming the component and method.
    pub fn resolve(&self, method: &str, default: V) -> Result<V, PlaybackExhaustedError> {
        let Some(values) = self.table.lookup(&self.component, method) else {
            return Ok(default);
        };

        let mut cursors = self.cursors.lock();
        let cursor = cursors
            .entry(method.to_string())
            .or_insert_with(|| SequenceCursor::new(self.policy));
        match cursor.next(values) {
            (Some(value), _) => Ok(value.clone()),
            (None, _) => Err(PlaybackExhaustedError {
                component: self.component.clone(),
                method: method.to_string(),
                consumed: cursor.offset(),
            }),
        }
    }

    /// Number of scripted values consumed from `method` so far.
    ///
    /// Zero for methods never resolved or not configured.
    #[must_use]
    pub fn consumed(&self, method: &str) -> usize {
        self.cursors
            .lock()
            .get(method)
            .map_or(0, SequenceCursor::offset)
    }

    /// Rewind every cursor to the start of its sequence.
    pub fn reset(&self) {
        for cursor in self.cursors.lock().values_mut() {
            cursor.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
