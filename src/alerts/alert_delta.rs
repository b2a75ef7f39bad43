//! Difference between two consecutive alert sets.

use std::fmt;

use crate::alerts::AlertSet;

/// Alerts that appeared and disappeared between two refreshes.
///
/// This is the single event shape handed to every subscriber. Subscribers
/// that only care about one kind check `added` or `removed` themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertDelta {
    /// Alerts active now that were not active before
    pub added: AlertSet,
    /// Alerts active before that are no longer active
    pub removed: AlertSet,
}

impl AlertDelta {
    /// Computes the delta going from `previous` to `next`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let previous = AlertSet::from([AlertKind::Storm]);
    /// let next = AlertSet::from([AlertKind::Hail]);
    /// let delta = AlertDelta::between(&previous, &next);
    /// assert_eq!(delta.added, AlertSet::from([AlertKind::Hail]));
    /// assert_eq!(delta.removed, AlertSet::from([AlertKind::Storm]));
    /// ```
    pub fn between(previous: &AlertSet, next: &AlertSet) -> Self {
        AlertDelta {
            added: next.difference(previous).copied().collect(),
            removed: previous.difference(next).copied().collect(),
        }
    }

    /// Returns `true` when nothing changed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl fmt::Display for AlertDelta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "added={:?}, removed={:?}", self.added, self.removed)
    }
}
