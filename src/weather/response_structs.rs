//! Response structures for the weather service API.

use serde::Deserialize;
use std::fmt;

/// Response from `/api/alerts?location={location}`.
///
/// Alert identifiers are provider specific strings, they are mapped to
/// [`crate::alerts::AlertKind`] by [`crate::weather::WeatherSync`].
#[derive(Deserialize, Debug, Default)]
pub struct AlertsResponse {
    /// Identifiers of the alerts currently issued.
    #[serde(rename = "CurrentAlerts", default)]
    pub current_alerts: Vec<String>,
}

impl fmt::Display for AlertsResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "current_alerts={:?}", self.current_alerts)
    }
}
