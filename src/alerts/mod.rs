//! Weather alert catalog and registry.
//!
//! This module provides the value types describing weather alerts and the
//! registry tracking which of them are active:
//!
//! - [`AlertKind`]: One member of the closed catalog of alerts (storm, hail)
//! - [`AlertSet`]: The alerts active at one point in time
//! - [`AlertDelta`]: What appeared and disappeared between two refreshes
//! - [`AlertRegistry`]: Owns the current [`AlertSet`] and computes deltas
//!
//! # Example Usage
//!
//! ```no_run
//! let registry = AlertRegistry::new();
//!
//! registry.refresh(AlertSet::from([AlertKind::Storm])).await;
//! let delta = registry
//!     .refresh(AlertSet::from([AlertKind::Storm, AlertKind::Hail]))
//!     .await;
//!
//! assert_eq!(delta.added, AlertSet::from([AlertKind::Hail]));
//! ```

mod alert_delta;
mod alert_kind;
mod alert_registry;

pub use crate::alerts::alert_delta::AlertDelta;
pub use crate::alerts::{
    alert_kind::{AlertKind, AlertSet},
    alert_registry::AlertRegistry,
};
