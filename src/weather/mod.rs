//! Weather provider integration.
//!
//! This module fetches the alerts currently issued by a weather service and
//! turns them into the notifier's own [`AlertSet`].
//!
//! # Modules
//!
//! - `requester` - HTTP client for the weather service alert endpoint
//! - `response_structs` - Data structures for the weather service responses
//! - `sync` - Adapter converting provider identifiers into [`crate::alerts::AlertKind`]
//!
//! # Examples
//!
//! ```no_run
//! let requester = AlertsRequester::new("https://weather.example.com", "api_key", "Buenos Aires", 10).unwrap();
//! let weather_sync = WeatherSync::new(requester);
//! let alerts = weather_sync.fetch_current_alerts().await.unwrap();
//! ```

mod requester;
mod response_structs;
mod sync;

use mockall::automock;
use thiserror::Error;

use crate::alerts::AlertSet;

pub use crate::weather::requester::AlertsRequester;
pub use crate::weather::sync::WeatherSync;

/// Errors that can occur while reading alerts from a weather provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// The weather service could not be reached or answered garbage.
    ///
    /// The refresh cycle is skipped and retried on the next tick.
    #[error("weather provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// The weather service reported an alert identifier with no known kind.
    ///
    /// Only the offending entry is dropped.
    #[error("unknown alert kind: {0}")]
    UnknownAlertKind(String),
}

/// Source of the alerts currently active.
#[automock]
pub trait WeatherProvider {
    /// Fetches the full set of alerts active right now.
    async fn fetch_current_alerts(&self) -> Result<AlertSet, WeatherError>;
}
