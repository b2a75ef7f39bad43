//! Conversion of weather service alerts into alert kinds.
//!
//! This module provides the [`WeatherSync`] adapter: the only place that knows
//! how the weather service names its alerts.

use log::{debug, error, info, warn};

use crate::alerts::{AlertKind, AlertSet};
use crate::weather::requester::Requester;
use crate::weather::{WeatherError, WeatherProvider};

/// Reads the active alerts from the weather service.
///
/// It interacts with the weather service through a [Requester] implementation
/// and converts the provider identifiers into [`AlertKind`]. Unknown
/// identifiers are logged and dropped so one bad entry never masks the
/// known alerts of the same response.
///
/// # Examples
///
/// ```no_run
/// let requester = AlertsRequester::new("http://weather.example.com", "api_key", "Buenos Aires", 10).unwrap();
/// let weather_sync = WeatherSync::new(requester);
/// let alerts = weather_sync.fetch_current_alerts().await;
/// ```
pub struct WeatherSync<R: Requester> {
    /// Requester to interact with the weather service
    requester: R,
}

impl<R: Requester> WeatherSync<R> {
    /// Create a new [WeatherSync].
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [Requester] trait to interact with the weather service.
    pub fn new(requester: R) -> Self {
        WeatherSync { requester }
    }

    /// Converts a provider alert identifier into an [`AlertKind`].
    ///
    /// Matching is case insensitive and ignores surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::UnknownAlertKind`] when the identifier is not
    /// part of the catalog.
    fn convert_alert(&self, identifier: &str) -> Result<AlertKind, WeatherError> {
        match identifier.trim().to_lowercase().as_str() {
            "storm" | "thunderstorm" | "tormenta" => Ok(AlertKind::Storm),
            "hail" | "granizo" => Ok(AlertKind::Hail),
            _ => Err(WeatherError::UnknownAlertKind(identifier.to_owned())),
        }
    }

    /// Converts every identifier, dropping the ones that can't be mapped.
    fn convert_alerts(&self, identifiers: &[String]) -> AlertSet {
        identifiers
            .iter()
            .filter_map(|identifier| match self.convert_alert(identifier) {
                Ok(kind) => Some(kind),
                Err(e) => {
                    warn!("dropping alert from weather provider: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl<R: Requester> WeatherProvider for WeatherSync<R> {
    async fn fetch_current_alerts(&self) -> Result<AlertSet, WeatherError> {
        info!("request alerts from weather provider");

        let response = match self.requester.get_alerts().await {
            Ok(response) => response,
            Err(e) => {
                error!("error while requesting alerts: {}", e);
                return Err(WeatherError::ProviderUnavailable(e.to_string()));
            }
        };
        debug!("weather provider response {}", response);

        let alerts = self.convert_alerts(&response.current_alerts);

        info!("finished requesting alerts from weather provider: {:?}", alerts);
        Ok(alerts)
    }
}
