//! HTTP client for the weather service API.
//!
//! This module provides the [`AlertsRequester`] struct for requesting the
//! alerts currently issued for a location.

use std::time::Duration;

use log::{debug, info};
use mockall::automock;
use reqwest::{Client, Error};

use crate::weather::response_structs::AlertsResponse;

/// HTTP client requesting alerts from the weather service.
///
/// # Examples
///
/// ```no_run
/// let requester = AlertsRequester::new("https://weather.example.com", "api_key", "Buenos Aires", 10)?;
/// let alerts = requester.get_alerts().await?;
/// println!("Alerts: {}", alerts);
/// ```
pub struct AlertsRequester {
    /// Weather service url
    url: String,
    /// Weather service api key
    api_key: String,
    /// Location the alerts are requested for
    location: String,
    /// HTTP client
    client: Client,
}

/// Trait for making requests to the weather service.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait Requester {
    /// Fetches the alerts currently issued for the configured location.
    async fn get_alerts(&self) -> Result<AlertsResponse, Error>;
}

impl AlertsRequester {
    /// Create a new [AlertsRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the weather service.
    /// * `api_key` - The key authenticating the requests.
    /// * `location` - The location the alerts are requested for.
    /// * `timeout` - Request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(url: &str, api_key: &str, location: &str, timeout: u64) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(AlertsRequester {
            url: url.to_string(),
            api_key: api_key.to_string(),
            location: location.to_string(),
            client,
        })
    }
}

impl Requester for AlertsRequester {
    /// Request `/api/alerts?location={location}&apikey={api_key}`.
    ///
    /// This api call returns a json object listing the active alerts:
    /// ```
    /// { "CurrentAlerts": ["STORM", "HAIL"] }
    /// ```
    /// This method transforms this json into an [`AlertsResponse`].
    /// Non-success HTTP statuses are turned into errors.
    async fn get_alerts(&self) -> Result<AlertsResponse, Error> {
        let url = format!("{}/api/alerts", &self.url);
        info!("request alerts for {}", &self.location);
        debug!("request {}?location={}", &url, &self.location);

        let alerts_response: AlertsResponse = self
            .client
            .get(&url)
            .query(&[("location", &self.location), ("apikey", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {:?}", &url, &alerts_response);

        Ok(alerts_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_alerts() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let body = r#"{"CurrentAlerts": ["STORM", "HAIL"]}"#;

        server
            .mock("GET", "/api/alerts")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("location".to_owned(), "Buenos Aires".to_owned()),
                mockito::Matcher::UrlEncoded("apikey".to_owned(), "abcd".to_owned()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = AlertsRequester::new(&url, "abcd", "Buenos Aires", 5).unwrap();
        let alerts = requester.get_alerts().await.unwrap();
        assert_eq!(alerts.current_alerts, vec!["STORM", "HAIL"]);
    }

    #[tokio::test]
    async fn test_get_alerts_missing_field_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/api/alerts")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let requester = AlertsRequester::new(&url, "abcd", "Rosario", 5).unwrap();
        let alerts = requester.get_alerts().await.unwrap();
        assert!(alerts.current_alerts.is_empty());
    }

    #[tokio::test]
    async fn test_get_alerts_server_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/api/alerts")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let requester = AlertsRequester::new(&url, "abcd", "Rosario", 5).unwrap();
        assert!(requester.get_alerts().await.is_err());
    }
}
