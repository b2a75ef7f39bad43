//! Registry of the weather alerts currently active.
//!
//! This module provides the [`AlertRegistry`], the single source of truth for
//! "which alerts are active right now". It is a live snapshot, not a log.

use log::{debug, info};
use tokio::sync::Mutex;

use crate::alerts::{AlertDelta, AlertSet};

/// Holds the current set of active alerts and computes what changed on refresh.
///
/// The registry does not fetch alerts and does not notify anybody: the caller
/// hands it the latest set and decides what to do with the returned
/// [`AlertDelta`].
///
/// # Thread Safety
///
/// The current set lives behind a mutex held for the whole read-modify-write
/// of [`AlertRegistry::refresh`], so concurrent refreshes never interleave and
/// a delta is always computed against the snapshot it replaces.
///
/// # Examples
///
/// ```no_run
/// let registry = AlertRegistry::new();
/// let delta = registry.refresh(AlertSet::from([AlertKind::Storm])).await;
/// assert!(delta.added.contains(&AlertKind::Storm));
/// ```
#[derive(Debug, Default)]
pub struct AlertRegistry {
    /// Alerts active since the last refresh
    current: Mutex<AlertSet>,
}

impl AlertRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        AlertRegistry {
            current: Mutex::new(AlertSet::new()),
        }
    }

    /// Replaces the current alerts with `new_alerts` and returns what changed.
    ///
    /// # Arguments
    ///
    /// * `new_alerts` - The alerts the weather provider reports as active now
    ///
    /// # Returns
    ///
    /// The [`AlertDelta`] between the previous set and `new_alerts`. It is
    /// empty when both sets are identical.
    pub async fn refresh(&self, new_alerts: AlertSet) -> AlertDelta {
        let mut current = self.current.lock().await;

        let delta = AlertDelta::between(&current, &new_alerts);
        *current = new_alerts;

        if delta.is_empty() {
            debug!("alerts unchanged {:?}", *current);
        } else {
            info!("alerts changed: {}", delta);
        }

        delta
    }

    /// Returns a copy of the alerts currently active.
    pub async fn current(&self) -> AlertSet {
        self.current.lock().await.clone()
    }
}
