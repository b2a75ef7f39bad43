//! Configuration file structures for the nimbus notifier.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `NIMBUS_`. Nested keys are separated by a double
//! underscore, so `NIMBUS_WEATHER__API_KEY` overrides `weather.api_key`.
//!
//! # Configuration File Format
//!
//! ```yaml
//! weather:
//!   # Base URL of the weather alert service
//!   url: "https://weather.example.com"
//!   # Key sent with every alert request
//!   api_key: "secret"
//!   # Location the alerts are fetched for
//!   location: "Buenos Aires"
//!   # Seconds between two alert refreshes
//!   polling_interval: 86400
//!   # HTTP timeout in seconds (optional, default 10)
//!   timeout: 10
//!
//! mail:
//!   # Mail relay endpoint
//!   url: "https://mail-relay.example.com/send"
//!
//! push:
//!   # Push server, messages are posted to <url>/<topic>
//!   url: "https://ntfy.sh"
//!
//! dispatch:
//!   # Serve all users at once instead of one after the other (optional)
//!   concurrent_users: false
//!
//! users:
//!   - id: "alice"
//!     email: "alice@example.com"
//!     # Required when subscribing to push
//!     push_topic: "alice-weather"
//!     subscriptions: [mail, push, suggestion]
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Weather service settings
    pub weather: Weather,
    /// Mail relay settings
    pub mail: Mail,
    /// Push server settings
    pub push: Push,
    /// Dispatch settings
    #[serde(default)]
    pub dispatch: Dispatch,
    /// Users to notify
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// Weather service configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Weather {
    /// Base URL of the weather alert service
    pub url: String,

    /// Key sent with every alert request
    pub api_key: String,

    /// Location the alerts are fetched for
    pub location: String,

    /// Seconds between two alert refreshes
    pub polling_interval: u64,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    10
}

/// Mail relay configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Mail {
    pub url: String,
}

/// Push server configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Push {
    pub url: String,
}

/// Dispatch configuration.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Dispatch {
    /// Serve all users at once instead of one after the other
    pub concurrent_users: bool,
}

/// A user and the reactions they picked.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserConfig {
    pub id: String,

    pub email: String,

    /// Push topic of the user's device, required by [`SubscriptionKind::Push`]
    #[serde(default)]
    pub push_topic: Option<String>,

    /// Reactions, in notification order
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionKind>,
}

/// Reactions a user can subscribe to.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    Mail,
    Push,
    Suggestion,
}

impl Config {
    /// Loads the configuration from the YAML file at `path`, with `NIMBUS_`
    /// environment overrides applied on top.
    ///
    /// Trailing slashes are removed from every URL.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file can't be read or a required
    /// key is missing or malformed.
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("NIMBUS_").split("__"))
            .extract()?;

        for url in [
            &mut config.weather.url,
            &mut config.mail.url,
            &mut config.push.url,
        ] {
            trim_trailing_slashes(url);
        }

        Ok(config)
    }
}

fn trim_trailing_slashes(url: &mut String) {
    while url.ends_with('/') {
        url.pop();
    }
}
