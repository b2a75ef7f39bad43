//! E-mail delivery through an HTTP mail relay.

use std::time::Duration;

use futures::{FutureExt, future::BoxFuture};
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::notifications::{DeliveryError, Mailer};

const CHANNEL: &str = "mail";

/// Payload posted to the mail relay.
#[derive(Serialize, Debug)]
struct MailRequest<'a> {
    recipient: &'a str,
    body: &'a str,
}

/// Sends e-mails by posting them as JSON to a mail relay.
///
/// The relay receives `{"recipient": "...", "body": "..."}` and is expected
/// to answer with a success status once the mail is queued.
///
/// # Examples
///
/// ```no_run
/// let mailer = HttpMailer::new("https://mail-relay.example.com/send", 10)?;
/// mailer.send_mail("alice@example.com", "New weather alerts: storm").await?;
/// ```
pub struct HttpMailer {
    /// Mail relay url
    url: String,
    /// HTTP client
    client: Client,
}

impl HttpMailer {
    /// Create a new [HttpMailer].
    ///
    /// # Arguments
    ///
    /// * `url` - Endpoint of the mail relay.
    /// * `timeout` - Request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(url: &str, timeout: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(HttpMailer {
            url: url.to_string(),
            client,
        })
    }

    async fn post(&self, recipient: &str, body: &str) -> Result<(), reqwest::Error> {
        debug!("post mail for {} to {}", recipient, &self.url);

        self.client
            .post(&self.url)
            .json(&MailRequest { recipient, body })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl Mailer for HttpMailer {
    fn send_mail<'a>(
        &'a self,
        recipient: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        async move {
            self.post(recipient, body)
                .await
                .map_err(|e| DeliveryError::failed(CHANNEL, e))?;

            info!("mail sent to {}", recipient);
            Ok(())
        }
        .boxed()
    }
}
