//! Weather alert kinds.
//!
//! This module provides the [`AlertKind`] enum, the closed catalog of weather
//! alerts the notifier knows about, and the [`AlertSet`] alias used to carry
//! the alerts active at one point in time.

use std::{collections::BTreeSet, fmt};

use serde::Deserialize;

/// A weather alert kind.
///
/// Kinds are plain values: they carry no notification text. Every channel
/// formats its own message from the kinds it receives.
///
/// # Examples
///
/// ```no_run
/// let kind = AlertKind::Storm;
/// assert_eq!(kind.to_string(), "storm");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Storm or thunderstorm warning
    Storm,
    /// Hail warning
    Hail,
}

impl AlertKind {
    /// Returns every known alert kind.
    pub fn all() -> &'static [AlertKind] {
        &[Self::Storm, Self::Hail]
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Storm => write!(f, "storm"),
            Self::Hail => write!(f, "hail"),
        }
    }
}

/// Set of alerts active at one point in time.
///
/// An ordered set is used so logs and messages list alerts in a stable order,
/// the order itself has no meaning.
pub type AlertSet = BTreeSet<AlertKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(AlertKind::Storm.to_string(), "storm");
        assert_eq!(AlertKind::Hail.to_string(), "hail");
    }

    #[test]
    fn test_all_contains_every_kind() {
        let all: AlertSet = AlertKind::all().iter().copied().collect();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&AlertKind::Storm));
        assert!(all.contains(&AlertKind::Hail));
    }

    #[test]
    fn test_alert_set_has_no_duplicates() {
        let alerts: AlertSet = [AlertKind::Hail, AlertKind::Storm, AlertKind::Hail]
            .into_iter()
            .collect();
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn test_deserialize_lowercase() {
        let kinds: Vec<AlertKind> = serde_json::from_str(r#"["storm", "hail"]"#).unwrap();
        assert_eq!(kinds, vec![AlertKind::Storm, AlertKind::Hail]);
    }
}
