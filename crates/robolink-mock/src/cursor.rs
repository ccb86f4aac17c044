//! Consumption position tracking for one scripted sequence.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExhaustionPolicy
// ---------------------------------------------------------------------------

/// What a cursor does once its sequence runs out.
///
/// Declared at cursor creation and applied on every subsequent call; the
/// behavior never varies per call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Keep returning the final scripted element.
    StickyLast,
    /// Report exhaustion; the caller turns this into an error.
    #[default]
    Signal,
}

// ---------------------------------------------------------------------------
// SequenceCursor
// ---------------------------------------------------------------------------

/// Position tracker for one (component, method) pair.
///
/// The cursor does not own its sequence; the dispatcher passes the
/// table's slice on every call. The offset advances by exactly one per
/// resolved call and never exceeds the sequence length.
#[derive(Debug, Clone)]
pub struct SequenceCursor {
    offset: usize,
    policy: ExhaustionPolicy,
}

impl SequenceCursor {
    /// A fresh cursor at offset zero under the given policy.
    #[must_use]
    pub const fn new(policy: ExhaustionPolicy) -> Self {
        Self { offset: 0, policy }
    }

    /// Number of values consumed so far.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The policy declared at creation.
    #[must_use]
    pub const fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    /// Resolve the next value from `values`.
    ///
    /// Returns the element at the current offset and advances when one
    /// remains. At the end of the sequence: under
    /// [`ExhaustionPolicy::StickyLast`] the final element is returned on
    /// every further call (`exhausted = false`); under
    /// [`ExhaustionPolicy::Signal`] no value is returned and
    /// `exhausted = true`. A sticky cursor over an empty sequence has
    /// nothing to stick to and also signals exhaustion.
    pub fn next<'a, V>(&mut self, values: &'a [V]) -> (Option<&'a V>, bool) {
        if self.offset < values.len() {
            let value = &values[self.offset];
            self.offset += 1;
            return (Some(value), false);
        }
        match self.policy {
            ExhaustionPolicy::StickyLast => match values.last() {
                Some(last) => (Some(last), false),
                None => (None, true),
            },
            ExhaustionPolicy::Signal => (None, true),
        }
    }

    /// Rewind to the first scripted element.
    ///
    /// Only meaningful when a harness is explicitly reused across test
    /// cases; fresh harnesses start rewound.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
