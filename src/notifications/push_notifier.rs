//! Push notifications through a topic based push server.

use std::time::Duration;

use futures::{FutureExt, future::BoxFuture};
use log::{debug, info};
use reqwest::Client;

use crate::notifications::{DeliveryError, Notifier};

const CHANNEL: &str = "push";

/// Pushes plain text messages to a topic of a push server.
///
/// Each message is posted as the request body to `{url}/{topic}`, the way
/// ntfy-like servers expect it. One notifier is bound to one topic, usually
/// the topic a single user listens on.
pub struct PushNotifier {
    /// Push server url
    url: String,
    /// Topic the messages are published to
    topic: String,
    /// HTTP client
    client: Client,
}

impl PushNotifier {
    /// Create a new [PushNotifier].
    ///
    /// # Arguments
    ///
    /// * `url` - Base URL of the push server.
    /// * `topic` - Topic to publish to.
    /// * `timeout` - Request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(url: &str, topic: &str, timeout: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(PushNotifier {
            url: url.to_string(),
            topic: topic.to_string(),
            client,
        })
    }

    async fn publish(&self, message: &str) -> Result<(), reqwest::Error> {
        let url = format!("{}/{}", &self.url, &self.topic);
        debug!("publish {:?} to {}", message, &url);

        self.client
            .post(&url)
            .body(message.to_owned())
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl Notifier for PushNotifier {
    fn notify<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<(), DeliveryError>> {
        async move {
            self.publish(message)
                .await
                .map_err(|e| DeliveryError::failed(CHANNEL, e))?;

            info!("push notification sent to topic {}", &self.topic);
            Ok(())
        }
        .boxed()
    }
}
